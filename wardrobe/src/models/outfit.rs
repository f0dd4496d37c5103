use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, IntoActiveModel, QueryOrder, TransactionTrait,
    entity::prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;

use super::{clothing_item, outfit_item, user};
use crate::core::{CRUDResource, MergeIntoActiveModel, rules};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "outfits")]
#[schema(as = OutfitRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::outfit_item::Entity")]
    OutfitItems,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<outfit_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutfitItems.def()
    }
}

impl Related<clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        outfit_item::Relation::ClothingItem.def()
    }

    fn via() -> Option<RelationDef> {
        Some(outfit_item::Relation::Outfit.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Outfit {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub occasion: Option<String>,
    /// Free text, e.g. `Spring/Summer`
    pub season: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<user::Model>,
    pub clothing_items: Vec<clothing_item::Model>,
}

impl From<Model> for Outfit {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            occasion: model.occasion,
            season: model.season,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
            user: None,
            clothing_items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct OutfitCreate {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub image_url: Option<String>,
    /// Clothing item ids making up the outfit
    pub clothing_items: Option<Vec<i32>>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct OutfitUpdate {
    pub user_id: Option<i32>,
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub occasion: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub season: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub image_url: Option<Option<String>>,
    /// Replaces the outfit's items when present; `[]` removes them all
    pub clothing_items: Option<Vec<i32>>,
}

fn check_fields(
    errors: &mut ValidationErrors,
    name: Option<&str>,
    occasion: Option<&str>,
    season: Option<&str>,
    image_url: Option<&str>,
) {
    if let Some(name) = name {
        errors.check(validators::validate_required("name", name));
        errors.check(validators::validate_length("name", name, None, Some(255)));
    }
    errors.check(validators::validate_optional_length("occasion", occasion, 100));
    errors.check(validators::validate_optional_length("season", season, 50));
    errors.check(validators::validate_optional_length("image_url", image_url, 500));
}

impl Validatable for OutfitCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_fields(
            &mut errors,
            Some(&self.name),
            self.occasion.as_deref(),
            self.season.as_deref(),
            self.image_url.as_deref(),
        );
        errors.result()
    }
}

impl Validatable for OutfitUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_fields(
            &mut errors,
            self.name.as_deref(),
            self.occasion.clone().flatten().as_deref(),
            self.season.clone().flatten().as_deref(),
            self.image_url.clone().flatten().as_deref(),
        );
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for OutfitUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(user_id) = self.user_id {
            existing.user_id = Set(user_id);
        }
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(occasion) = self.occasion {
            existing.occasion = Set(occasion);
        }
        if let Some(season) = self.season {
            existing.season = Set(season);
        }
        if let Some(image_url) = self.image_url {
            existing.image_url = Set(image_url);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

async fn check_references(
    db: &DatabaseConnection,
    user_id: Option<i32>,
    clothing_items: Option<&[i32]>,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrors::new();
    if let Some(user_id) = user_id {
        rules::check_exists::<user::Entity, _>(db, &mut errors, "user_id", user::Column::Id, user_id)
            .await?;
    }
    if let Some(ids) = clothing_items {
        rules::check_all_exist::<clothing_item::Entity, _>(
            db,
            &mut errors,
            "clothing_items",
            clothing_item::Column::Id,
            ids,
        )
        .await?;
    }
    errors.result().map_err(ApiError::from)
}

/// Make the outfit's join rows exactly `ids`, collapsing duplicates.
async fn sync_clothing_items<C: ConnectionTrait>(
    db: &C,
    outfit_id: i32,
    ids: &[i32],
) -> Result<(), DbErr> {
    outfit_item::Entity::delete_many()
        .filter(outfit_item::Column::OutfitId.eq(outfit_id))
        .exec(db)
        .await?;

    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let rows = ids.iter().map(|&clothing_item_id| outfit_item::ActiveModel {
        outfit_id: Set(outfit_id),
        clothing_item_id: Set(clothing_item_id),
    });
    outfit_item::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    tracing::debug!(outfit_id, count = ids.len(), "Synced outfit clothing items");
    Ok(())
}

#[async_trait]
impl CRUDResource for Outfit {
    type EntityType = Entity;
    type ColumnType = Column;
    type CreateModel = OutfitCreate;
    type UpdateModel = OutfitUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "outfit";
    const RESOURCE_NAME_PLURAL: &'static str = "outfits";
    const RESOURCE_DESCRIPTION: &'static str = "Named combinations of clothing items. \
        Sending `clothing_items` replaces the outfit's items with exactly that set.";

    async fn hydrate(db: &DatabaseConnection, models: Vec<Model>) -> Result<Vec<Self>, DbErr> {
        let mut outfits = Vec::with_capacity(models.len());
        for model in models {
            let user = model.find_related(user::Entity).one(db).await?;
            let clothing_items = model
                .find_related(clothing_item::Entity)
                .order_by_asc(clothing_item::Column::Id)
                .all(db)
                .await?;
            outfits.push(Self {
                user,
                clothing_items,
                ..Self::from(model)
            });
        }
        Ok(outfits)
    }

    async fn create(db: &DatabaseConnection, create_model: OutfitCreate) -> Result<Self, ApiError> {
        check_references(
            db,
            Some(create_model.user_id),
            create_model.clothing_items.as_deref(),
        )
        .await?;

        let now = Utc::now();
        let txn = db.begin().await?;
        let outfit = ActiveModel {
            user_id: Set(create_model.user_id),
            name: Set(create_model.name),
            description: Set(create_model.description),
            occasion: Set(create_model.occasion),
            season: Set(create_model.season),
            image_url: Set(create_model.image_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        if let Some(ids) = &create_model.clothing_items {
            sync_clothing_items(&txn, outfit.id, ids).await?;
        }
        txn.commit().await?;

        tracing::info!(outfit_id = outfit.id, user_id = outfit.user_id, "Created outfit");
        Self::get_one(db, outfit.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, mut update_model: OutfitUpdate) -> Result<Self, ApiError> {
        let existing = Self::find_model(db, id).await?;
        check_references(db, update_model.user_id, update_model.clothing_items.as_deref()).await?;

        let clothing_items = update_model.clothing_items.take();
        let txn = db.begin().await?;
        update_model
            .merge_into_activemodel(existing.into_active_model())?
            .update(&txn)
            .await?;
        if let Some(ids) = &clothing_items {
            sync_clothing_items(&txn, id, ids).await?;
        }
        txn.commit().await?;

        Self::get_one(db, id).await
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("occasion", Column::Occasion),
            ("season", Column::Season),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("user_id", Column::UserId),
            ("name", Column::Name),
            ("occasion", Column::Occasion),
            ("season", Column::Season),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name", "occasion", "season"]
    }

    fn fulltext_searchable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("name", Column::Name),
            ("description", Column::Description),
            ("occasion", Column::Occasion),
        ]
    }
}

crate::crud_handlers!(Outfit, OutfitCreate, OutfitUpdate);
