//! Read-only dashboard figures.

use axum::{Json, extract::State};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::errors::ApiError;
use crate::models::{category, clothing_item, outfit, tag, user};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Overview {
    pub clothing_items: u64,
    pub outfits: u64,
    pub active_categories: u64,
    pub tags: u64,
    pub users: u64,
    pub favorite_items: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct CategoryCount {
    pub category_id: i32,
    pub title: String,
    pub count: i64,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = axum::http::StatusCode::OK, description = "Record counts", body = Overview),
        (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "stats",
    summary = "Wardrobe totals"
)]
pub async fn overview_handler(State(db): State<DatabaseConnection>) -> Result<Json<Overview>, ApiError> {
    let overview = Overview {
        clothing_items: clothing_item::Entity::find().count(&db).await?,
        outfits: outfit::Entity::find().count(&db).await?,
        active_categories: category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .count(&db)
            .await?,
        tags: tag::Entity::find().count(&db).await?,
        users: user::Entity::find().count(&db).await?,
        favorite_items: clothing_item::Entity::find()
            .filter(clothing_item::Column::IsFavorite.eq(true))
            .count(&db)
            .await?,
    };
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = axum::http::StatusCode::OK, description = "Clothing items per category", body = [CategoryCount]),
        (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "stats",
    summary = "Clothing item count per category",
    description = "Every category is listed, including empty ones, in `sort_order` then `title` order."
)]
pub async fn categories_handler(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let counts = category::Entity::find()
        .select_only()
        .column_as(category::Column::Id, "category_id")
        .column(category::Column::Title)
        .column_as(
            Expr::col((clothing_item::Entity, clothing_item::Column::Id)).count(),
            "count",
        )
        .join(JoinType::LeftJoin, category::Relation::ClothingItems.def())
        .group_by(category::Column::Id)
        .group_by(category::Column::Title)
        .group_by(category::Column::SortOrder)
        .order_by_asc(category::Column::SortOrder)
        .order_by_asc(category::Column::Title)
        .into_model::<CategoryCount>()
        .all(&db)
        .await?;
    Ok(Json(counts))
}

pub fn router(db: &DatabaseConnection) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(overview_handler))
        .routes(routes!(categories_handler))
        .with_state(db.clone())
}
