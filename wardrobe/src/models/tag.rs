use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, IntoActiveModel, QueryOrder, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{clothing_item, clothing_item_tag};
use crate::core::{CRUDResource, MergeIntoActiveModel, rules};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "tags")]
#[schema(as = TagRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clothing_item_tag::Entity")]
    ClothingItemTags,
}

impl Related<clothing_item_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItemTags.def()
    }
}

impl Related<clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        clothing_item_tag::Relation::ClothingItem.def()
    }

    fn via() -> Option<RelationDef> {
        Some(clothing_item_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clothing_items: Vec<clothing_item::Model>,
}

impl From<Model> for Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
            clothing_items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct TagCreate {
    pub name: String,
}

/// Renaming is the only update a tag supports, so `name` stays required
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct TagUpdate {
    pub name: String,
}

fn check_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validators::validate_required("name", name));
    errors.check(validators::validate_length("name", name, None, Some(255)));
    errors.result()
}

impl Validatable for TagCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_name(&self.name)
    }
}

impl Validatable for TagUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_name(&self.name)
    }
}

impl MergeIntoActiveModel<ActiveModel> for TagUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.name = Set(self.name);
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

async fn check_name_free(db: &DatabaseConnection, name: &str, except: Option<i32>) -> Result<(), ApiError> {
    let mut errors = ValidationErrors::new();
    rules::check_unique::<Entity, _>(
        db,
        &mut errors,
        "name",
        Column::Name,
        name.to_string(),
        except.map(|id| (Column::Id, id)),
    )
    .await?;
    errors.result().map_err(ApiError::from)
}

#[async_trait]
impl CRUDResource for Tag {
    type EntityType = Entity;
    type ColumnType = Column;
    type CreateModel = TagCreate;
    type UpdateModel = TagUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "tag";
    const RESOURCE_NAME_PLURAL: &'static str = "tags";
    const RESOURCE_DESCRIPTION: &'static str = "Free-form labels attached to clothing items.";

    async fn hydrate(db: &DatabaseConnection, models: Vec<Model>) -> Result<Vec<Self>, DbErr> {
        let mut tags = Vec::with_capacity(models.len());
        for model in models {
            let clothing_items = model
                .find_related(clothing_item::Entity)
                .order_by_asc(clothing_item::Column::Id)
                .all(db)
                .await?;
            tags.push(Self {
                clothing_items,
                ..Self::from(model)
            });
        }
        Ok(tags)
    }

    async fn create(db: &DatabaseConnection, create_model: TagCreate) -> Result<Self, ApiError> {
        check_name_free(db, &create_model.name, None).await?;

        let now = Utc::now();
        let tag = ActiveModel {
            name: Set(create_model.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Self::get_one(db, tag.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, update_model: TagUpdate) -> Result<Self, ApiError> {
        let existing = Self::find_model(db, id).await?;
        check_name_free(db, &update_model.name, Some(id)).await?;

        update_model
            .merge_into_activemodel(existing.into_active_model())?
            .update(db)
            .await?;
        Self::get_one(db, id).await
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![("id", Column::Id), ("name", Column::Name)]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name"]
    }

    fn fulltext_searchable_columns() -> Vec<(&'static str, Column)> {
        vec![("name", Column::Name)]
    }
}

crate::crud_handlers!(Tag, TagCreate, TagUpdate);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(TagCreate { name: "Casual".to_string() }.validate().is_ok());
        assert!(TagCreate { name: " ".to_string() }.validate().is_err());
        assert!(TagUpdate { name: "x".repeat(256) }.validate().is_err());
    }

    #[tokio::test]
    async fn test_count_failure_is_reported() {
        let db = DatabaseConnection::Disconnected;
        assert!(Tag::total_count(&db, &sea_orm::Condition::all()).await.is_err());
    }

    #[test]
    fn test_update_requires_name() {
        assert!(serde_json::from_str::<TagUpdate>("{}").is_err());
    }
}
