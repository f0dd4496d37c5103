use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, IntoActiveModel, Order, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;

use super::clothing_item;
use crate::core::{CRUDResource, MergeIntoActiveModel, rules};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "categories")]
#[schema(as = CategoryRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clothing_item::Entity")]
    ClothingItems,
}

impl Related<clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Stored reference (path or URL) to the category image
    pub image: Option<String>,
    pub icon: Option<String>,
    /// Hex colour such as `#3b82f6`
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clothing_items: Vec<clothing_item::Model>,
}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            image: model.image,
            icon: model.icon,
            color: model.color,
            sort_order: model.sort_order,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            clothing_items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CategoryCreate {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Defaults to 0
    pub sort_order: Option<i32>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub color: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) {
    errors.check(validators::validate_required(field, value));
    errors.check(validators::validate_length(field, value, None, Some(255)));
}

fn check_optional(
    errors: &mut ValidationErrors,
    image: Option<&str>,
    icon: Option<&str>,
    color: Option<&str>,
    sort_order: Option<i32>,
) {
    errors.check(validators::validate_optional_length("image", image, 255));
    errors.check(validators::validate_optional_length("icon", icon, 255));
    errors.check(validators::validate_optional_length("color", color, 7));
    if let Some(sort_order) = sort_order {
        errors.check(validators::validate_range("sort_order", sort_order, Some(0), None));
    }
}

impl Validatable for CategoryCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "title", &self.title);
        check_required(&mut errors, "slug", &self.slug);
        check_optional(
            &mut errors,
            self.image.as_deref(),
            self.icon.as_deref(),
            self.color.as_deref(),
            self.sort_order,
        );
        errors.result()
    }
}

impl Validatable for CategoryUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_required(&mut errors, "title", title);
        }
        if let Some(slug) = &self.slug {
            check_required(&mut errors, "slug", slug);
        }
        check_optional(
            &mut errors,
            self.image.clone().flatten().as_deref(),
            self.icon.clone().flatten().as_deref(),
            self.color.clone().flatten().as_deref(),
            self.sort_order,
        );
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for CategoryUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(title) = self.title {
            existing.title = Set(title);
        }
        if let Some(slug) = self.slug {
            existing.slug = Set(slug);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(image) = self.image {
            existing.image = Set(image);
        }
        if let Some(icon) = self.icon {
            existing.icon = Set(icon);
        }
        if let Some(color) = self.color {
            existing.color = Set(color);
        }
        if let Some(sort_order) = self.sort_order {
            existing.sort_order = Set(sort_order);
        }
        if let Some(is_active) = self.is_active {
            existing.is_active = Set(is_active);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

#[async_trait]
impl CRUDResource for Category {
    type EntityType = Entity;
    type ColumnType = Column;
    type CreateModel = CategoryCreate;
    type UpdateModel = CategoryUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "category";
    const RESOURCE_NAME_PLURAL: &'static str = "categories";
    const RESOURCE_DESCRIPTION: &'static str =
        "Clothing categories. Listed by `sort_order`, then `title`, unless a sort is requested.";

    async fn hydrate(db: &DatabaseConnection, models: Vec<Model>) -> Result<Vec<Self>, DbErr> {
        let mut categories = Vec::with_capacity(models.len());
        for model in models {
            let clothing_items = model
                .find_related(clothing_item::Entity)
                .order_by_asc(clothing_item::Column::Id)
                .all(db)
                .await?;
            categories.push(Self {
                clothing_items,
                ..Self::from(model)
            });
        }
        Ok(categories)
    }

    async fn create(db: &DatabaseConnection, create_model: CategoryCreate) -> Result<Self, ApiError> {
        let mut errors = ValidationErrors::new();
        rules::check_unique::<Entity, _>(db, &mut errors, "slug", Column::Slug, create_model.slug.clone(), None)
            .await?;
        errors.result()?;

        let now = Utc::now();
        let category = ActiveModel {
            title: Set(create_model.title),
            slug: Set(create_model.slug),
            description: Set(create_model.description),
            image: Set(create_model.image),
            icon: Set(create_model.icon),
            color: Set(create_model.color),
            sort_order: Set(create_model.sort_order.unwrap_or(0)),
            is_active: Set(create_model.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Self::get_one(db, category.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, update_model: CategoryUpdate) -> Result<Self, ApiError> {
        let existing = Self::find_model(db, id).await?;

        if let Some(slug) = &update_model.slug {
            let mut errors = ValidationErrors::new();
            rules::check_unique::<Entity, _>(
                db,
                &mut errors,
                "slug",
                Column::Slug,
                slug.clone(),
                Some((Column::Id, id)),
            )
            .await?;
            errors.result()?;
        }

        update_model
            .merge_into_activemodel(existing.into_active_model())?
            .update(db)
            .await?;
        Self::get_one(db, id).await
    }

    fn default_sort() -> Vec<(Column, Order)> {
        vec![(Column::SortOrder, Order::Asc), (Column::Title, Order::Asc)]
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("title", Column::Title),
            ("slug", Column::Slug),
            ("sort_order", Column::SortOrder),
            ("is_active", Column::IsActive),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("title", Column::Title),
            ("slug", Column::Slug),
            ("color", Column::Color),
            ("sort_order", Column::SortOrder),
            ("is_active", Column::IsActive),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["title"]
    }

    fn fulltext_searchable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("title", Column::Title),
            ("slug", Column::Slug),
            ("description", Column::Description),
        ]
    }
}

crate::crud_handlers!(Category, CategoryCreate, CategoryUpdate);
