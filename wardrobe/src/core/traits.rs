use async_trait::async_trait;
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, entity::prelude::*,
};
use serde::Serialize;

use crate::errors::ApiError;
use crate::validation::Validatable;

/// Apply a partial update payload onto an existing active model
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// A REST resource backed by one table, serialized with its relations loaded.
///
/// Implementors supply the per-resource pieces (payload types, validation
/// against the database, relation loading); listing, lookup, deletion and
/// counting are shared.
#[async_trait]
pub trait CRUDResource: Sized + Send + Sync + Serialize {
    type EntityType: EntityTrait<Model: Sync> + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug + Send + Sync;
    type CreateModel: Validatable + Send + Sync;
    type UpdateModel: Validatable + Send + Sync;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";

    /// Turn table rows into API records, loading the declared relations.
    async fn hydrate(
        db: &DatabaseConnection,
        models: Vec<<Self::EntityType as EntityTrait>::Model>,
    ) -> Result<Vec<Self>, DbErr>;

    /// Insert a validated payload and return the stored record.
    async fn create(db: &DatabaseConnection, create_model: Self::CreateModel)
    -> Result<Self, ApiError>;

    /// Apply a partial update and return the stored record.
    async fn update(
        db: &DatabaseConnection,
        id: i32,
        update_model: Self::UpdateModel,
    ) -> Result<Self, ApiError>;

    async fn get_all(
        db: &DatabaseConnection,
        condition: &Condition,
        order: &[(Self::ColumnType, Order)],
        page: Option<(u64, u64)>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Self::EntityType::find().filter(condition.clone());
        for (column, direction) in order {
            query = query.order_by(*column, direction.clone());
        }
        if let Some((offset, limit)) = page {
            query = query.offset(offset).limit(limit);
        }
        let models = query.all(db).await?;
        Self::hydrate(db, models).await
    }

    async fn find_model(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<<Self::EntityType as EntityTrait>::Model, ApiError> {
        Self::EntityType::find()
            .filter(Self::ID_COLUMN.eq(id))
            .one(db)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self, ApiError> {
        let model = Self::find_model(db, id).await?;
        Self::hydrate(db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<i32, ApiError> {
        let res = Self::EntityType::delete_many()
            .filter(Self::ID_COLUMN.eq(id))
            .exec(db)
            .await?;
        match res.rows_affected {
            0 => Err(Self::not_found(id)),
            _ => Ok(id),
        }
    }

    async fn total_count(db: &DatabaseConnection, condition: &Condition) -> Result<u64, DbErr> {
        let query = Self::EntityType::find().filter(condition.clone());
        PaginatorTrait::count(query, db).await
    }

    #[must_use]
    fn not_found(id: i32) -> ApiError {
        ApiError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string()))
    }

    /// Ordering used when the request does not ask for one.
    #[must_use]
    fn default_sort() -> Vec<(Self::ColumnType, Order)> {
        vec![(Self::ID_COLUMN, Order::Asc)]
    }

    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Filterable string fields that use substring matching instead of equality.
    #[must_use]
    fn like_filterable_columns() -> Vec<&'static str> {
        vec![]
    }

    /// Columns searched when the `q` filter key is used.
    #[must_use]
    fn fulltext_searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![]
    }
}
