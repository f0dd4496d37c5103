use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, IntoActiveModel, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{clothing_item, outfit, personal_access_token};
use crate::auth::password::hash_password;
use crate::core::{CRUDResource, MergeIntoActiveModel, rules};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[schema(as = UserRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clothing_item::Entity")]
    ClothingItems,
    #[sea_orm(has_many = "super::outfit::Entity")]
    Outfits,
    #[sea_orm(has_many = "super::personal_access_token::Entity")]
    AccessTokens,
}

impl Related<clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItems.def()
    }
}

impl Related<outfit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outfits.def()
    }
}

impl Related<personal_access_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccessTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A user with their wardrobe loaded
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clothing_items: Vec<clothing_item::Model>,
    pub outfits: Vec<outfit::Model>,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            email_verified_at: model.email_verified_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
            clothing_items: Vec::new(),
            outfits: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    /// At least 8 characters
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    errors.check(validators::validate_required("name", name));
    errors.check(validators::validate_length("name", name, None, Some(255)));
}

pub(crate) fn check_password(errors: &mut ValidationErrors, field: &str, password: &str) {
    errors.check(validators::validate_length(
        field,
        password,
        Some(MIN_PASSWORD_LENGTH),
        None,
    ));
}

impl Validatable for UserCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        errors.check(validators::validate_email("email", &self.email));
        check_password(&mut errors, "password", &self.password);
        errors.result()
    }
}

impl Validatable for UserUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, name);
        }
        if let Some(email) = &self.email {
            errors.check(validators::validate_email("email", email));
        }
        if let Some(password) = &self.password {
            check_password(&mut errors, "password", password);
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for UserUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(email) = self.email {
            existing.email = Set(email);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

/// Insert a user after checking the email is free. Shared with registration.
///
/// # Errors
///
/// 422 when the email is taken, 500 on hashing or database failure.
pub async fn insert_user(db: &DatabaseConnection, create: UserCreate) -> Result<Model, ApiError> {
    let mut errors = ValidationErrors::new();
    rules::check_unique::<Entity, _>(db, &mut errors, "email", Column::Email, create.email.clone(), None)
        .await?;
    errors.result()?;

    let now = Utc::now();
    let user = ActiveModel {
        name: Set(create.name),
        email: Set(create.email),
        email_verified_at: Set(None),
        password: Set(hash_password(&create.password)?),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id = user.id, "Created user");
    Ok(user)
}

#[async_trait]
impl CRUDResource for User {
    type EntityType = Entity;
    type ColumnType = Column;
    type CreateModel = UserCreate;
    type UpdateModel = UserUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "user";
    const RESOURCE_NAME_PLURAL: &'static str = "users";
    const RESOURCE_DESCRIPTION: &'static str =
        "Wardrobe owners. Passwords are write-only and stored as Argon2 hashes.";

    async fn hydrate(db: &DatabaseConnection, models: Vec<Model>) -> Result<Vec<Self>, DbErr> {
        let mut users = Vec::with_capacity(models.len());
        for model in models {
            let clothing_items = model
                .find_related(clothing_item::Entity)
                .order_by_asc(clothing_item::Column::Id)
                .all(db)
                .await?;
            let outfits = model
                .find_related(outfit::Entity)
                .order_by_asc(outfit::Column::Id)
                .all(db)
                .await?;
            users.push(Self {
                clothing_items,
                outfits,
                ..Self::from(model)
            });
        }
        Ok(users)
    }

    async fn create(db: &DatabaseConnection, create_model: UserCreate) -> Result<Self, ApiError> {
        let user = insert_user(db, create_model).await?;
        Self::get_one(db, user.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, update_model: UserUpdate) -> Result<Self, ApiError> {
        let existing = Self::find_model(db, id).await?;

        if let Some(email) = &update_model.email {
            let mut errors = ValidationErrors::new();
            rules::check_unique::<Entity, _>(
                db,
                &mut errors,
                "email",
                Column::Email,
                email.clone(),
                Some((Column::Id, id)),
            )
            .await?;
            errors.result()?;
        }

        let new_password = update_model
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;
        let mut active = update_model.merge_into_activemodel(existing.into_active_model())?;
        if let Some(hash) = new_password {
            active.password = Set(hash);
        }
        active.update(db).await?;

        Self::get_one(db, id).await
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("email", Column::Email),
            ("email_verified_at", Column::EmailVerifiedAt),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name", "email"]
    }

    fn fulltext_searchable_columns() -> Vec<(&'static str, Column)> {
        vec![("name", Column::Name), ("email", Column::Email)]
    }
}

crate::crud_handlers!(User, UserCreate, UserUpdate);
