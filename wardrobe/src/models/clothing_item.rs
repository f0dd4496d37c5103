use async_trait::async_trait;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::Set, IntoActiveModel, QueryOrder, entity::prelude::*, sea_query::OnConflict,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_with::rust::double_option;
use utoipa::ToSchema;
use utoipa_axum::routes;

use super::{category, clothing_item_tag, outfit, outfit_item, tag, user};
use crate::core::{CRUDResource, MergeIntoActiveModel, Payload, rules};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationErrors, validators};

/// Largest value a `DECIMAL(10,2)` column holds
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Season {
    #[sea_orm(string_value = "Spring")]
    Spring,
    #[sea_orm(string_value = "Summer")]
    Summer,
    #[sea_orm(string_value = "Fall")]
    Fall,
    #[sea_orm(string_value = "Winter")]
    Winter,
    #[sea_orm(string_value = "All Season")]
    #[serde(rename = "All Season")]
    AllSeason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ItemCondition {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Like New")]
    #[serde(rename = "Like New")]
    LikeNew,
    #[sea_orm(string_value = "Good")]
    Good,
    #[sea_orm(string_value = "Fair")]
    Fair,
    #[sea_orm(string_value = "Worn")]
    Worn,
}

/// Prices always go out with two decimal places
#[allow(clippy::ref_option)]
fn serialize_price<S: Serializer>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(price) => {
            let mut price = price.round_dp(2);
            price.rescale(2);
            serializer.serialize_some(&price)
        }
        None => serializer.serialize_none(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "clothing_items")]
#[schema(as = ClothingItemRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    #[serde(serialize_with = "serialize_price")]
    pub price: Option<Decimal>,
    pub season: Option<Season>,
    pub condition: Option<ItemCondition>,
    pub purchase_date: Option<NaiveDate>,
    pub is_favorite: bool,
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
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::outfit_item::Entity")]
    OutfitItems,
    #[sea_orm(has_many = "super::clothing_item_tag::Entity")]
    ClothingItemTags,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<outfit_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutfitItems.def()
    }
}

impl Related<clothing_item_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItemTags.def()
    }
}

impl Related<outfit::Entity> for Entity {
    fn to() -> RelationDef {
        outfit_item::Relation::Outfit.def()
    }

    fn via() -> Option<RelationDef> {
        Some(outfit_item::Relation::ClothingItem.def().rev())
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        clothing_item_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(clothing_item_tag::Relation::ClothingItem.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A clothing item with its owner, category, outfits and tags
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ClothingItem {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    /// Stored reference (path or URL) to the item photo
    pub image: Option<String>,
    /// Decimal string with two places, e.g. `"29.99"`
    #[serde(serialize_with = "serialize_price")]
    pub price: Option<Decimal>,
    pub season: Option<Season>,
    pub condition: Option<ItemCondition>,
    pub purchase_date: Option<NaiveDate>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<user::Model>,
    pub category: Option<category::Model>,
    pub outfits: Vec<outfit::Model>,
    pub tags: Vec<tag::Model>,
}

impl From<Model> for ClothingItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            color: model.color,
            brand: model.brand,
            size: model.size,
            image: model.image,
            price: model.price,
            season: model.season,
            condition: model.condition,
            purchase_date: model.purchase_date,
            is_favorite: model.is_favorite,
            created_at: model.created_at,
            updated_at: model.updated_at,
            user: None,
            category: None,
            outfits: Vec::new(),
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ClothingItemCreate {
    pub user_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
    /// Non-negative; numbers and numeric strings are both accepted
    pub price: Option<Decimal>,
    pub season: Option<Season>,
    pub condition: Option<ItemCondition>,
    /// ISO date, e.g. `2024-03-01`
    pub purchase_date: Option<NaiveDate>,
    pub is_favorite: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ClothingItemUpdate {
    pub user_id: Option<i32>,
    pub category_id: Option<i32>,
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub color: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub brand: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub size: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub price: Option<Option<Decimal>>,
    #[serde(default, with = "double_option")]
    pub season: Option<Option<Season>>,
    #[serde(default, with = "double_option")]
    pub condition: Option<Option<ItemCondition>>,
    #[serde(default, with = "double_option")]
    pub purchase_date: Option<Option<NaiveDate>>,
    pub is_favorite: Option<bool>,
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    errors.check(validators::validate_required("name", name));
    errors.check(validators::validate_length("name", name, None, Some(255)));
}

fn check_details(
    errors: &mut ValidationErrors,
    color: Option<&str>,
    brand: Option<&str>,
    size: Option<&str>,
    image: Option<&str>,
    price: Option<Decimal>,
) {
    errors.check(validators::validate_optional_length("color", color, 50));
    errors.check(validators::validate_optional_length("brand", brand, 100));
    errors.check(validators::validate_optional_length("size", size, 20));
    errors.check(validators::validate_optional_length("image", image, 255));
    if let Some(price) = price {
        errors.check(validators::validate_range(
            "price",
            price,
            Some(Decimal::ZERO),
            Some(MAX_PRICE),
        ));
    }
}

impl Validatable for ClothingItemCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        check_details(
            &mut errors,
            self.color.as_deref(),
            self.brand.as_deref(),
            self.size.as_deref(),
            self.image.as_deref(),
            self.price,
        );
        errors.result()
    }
}

impl Validatable for ClothingItemUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, name);
        }
        check_details(
            &mut errors,
            self.color.clone().flatten().as_deref(),
            self.brand.clone().flatten().as_deref(),
            self.size.clone().flatten().as_deref(),
            self.image.clone().flatten().as_deref(),
            self.price.flatten(),
        );
        errors.result()
    }
}

impl MergeIntoActiveModel<ActiveModel> for ClothingItemUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(user_id) = self.user_id {
            existing.user_id = Set(user_id);
        }
        if let Some(category_id) = self.category_id {
            existing.category_id = Set(category_id);
        }
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(color) = self.color {
            existing.color = Set(color);
        }
        if let Some(brand) = self.brand {
            existing.brand = Set(brand);
        }
        if let Some(size) = self.size {
            existing.size = Set(size);
        }
        if let Some(image) = self.image {
            existing.image = Set(image);
        }
        if let Some(price) = self.price {
            existing.price = Set(price.map(|p| p.round_dp(2)));
        }
        if let Some(season) = self.season {
            existing.season = Set(season);
        }
        if let Some(condition) = self.condition {
            existing.condition = Set(condition);
        }
        if let Some(purchase_date) = self.purchase_date {
            existing.purchase_date = Set(purchase_date);
        }
        if let Some(is_favorite) = self.is_favorite {
            existing.is_favorite = Set(is_favorite);
        }
        existing.updated_at = Set(Utc::now());
        Ok(existing)
    }
}

/// Owner and category must exist before an item can point at them
async fn check_references(
    db: &DatabaseConnection,
    user_id: Option<i32>,
    category_id: Option<i32>,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrors::new();
    if let Some(user_id) = user_id {
        rules::check_exists::<user::Entity, _>(db, &mut errors, "user_id", user::Column::Id, user_id)
            .await?;
    }
    if let Some(category_id) = category_id {
        rules::check_exists::<category::Entity, _>(
            db,
            &mut errors,
            "category_id",
            category::Column::Id,
            category_id,
        )
        .await?;
    }
    errors.result().map_err(ApiError::from)
}

#[async_trait]
impl CRUDResource for ClothingItem {
    type EntityType = Entity;
    type ColumnType = Column;
    type CreateModel = ClothingItemCreate;
    type UpdateModel = ClothingItemUpdate;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "clothing item";
    const RESOURCE_NAME_PLURAL: &'static str = "clothing-items";
    const RESOURCE_DESCRIPTION: &'static str = "Pieces of clothing in a user's wardrobe. \
        `season` is one of Spring, Summer, Fall, Winter, All Season; \
        `condition` is one of New, Like New, Good, Fair, Worn.";

    async fn hydrate(db: &DatabaseConnection, models: Vec<Model>) -> Result<Vec<Self>, DbErr> {
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            let user = model.find_related(user::Entity).one(db).await?;
            let category = model.find_related(category::Entity).one(db).await?;
            let outfits = model
                .find_related(outfit::Entity)
                .order_by_asc(outfit::Column::Id)
                .all(db)
                .await?;
            let tags = model
                .find_related(tag::Entity)
                .order_by_asc(tag::Column::Id)
                .all(db)
                .await?;
            items.push(Self {
                user,
                category,
                outfits,
                tags,
                ..Self::from(model)
            });
        }
        Ok(items)
    }

    async fn create(db: &DatabaseConnection, create_model: ClothingItemCreate) -> Result<Self, ApiError> {
        check_references(db, Some(create_model.user_id), Some(create_model.category_id)).await?;

        let now = Utc::now();
        let item = ActiveModel {
            user_id: Set(create_model.user_id),
            category_id: Set(create_model.category_id),
            name: Set(create_model.name),
            description: Set(create_model.description),
            color: Set(create_model.color),
            brand: Set(create_model.brand),
            size: Set(create_model.size),
            image: Set(create_model.image),
            price: Set(create_model.price.map(|p| p.round_dp(2))),
            season: Set(create_model.season),
            condition: Set(create_model.condition),
            purchase_date: Set(create_model.purchase_date),
            is_favorite: Set(create_model.is_favorite.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(clothing_item_id = item.id, user_id = item.user_id, "Created clothing item");
        Self::get_one(db, item.id).await
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        update_model: ClothingItemUpdate,
    ) -> Result<Self, ApiError> {
        let existing = Self::find_model(db, id).await?;
        check_references(db, update_model.user_id, update_model.category_id).await?;

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
            ("brand", Column::Brand),
            ("color", Column::Color),
            ("price", Column::Price),
            ("season", Column::Season),
            ("condition", Column::Condition),
            ("purchase_date", Column::PurchaseDate),
            ("is_favorite", Column::IsFavorite),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("id", Column::Id),
            ("user_id", Column::UserId),
            ("category_id", Column::CategoryId),
            ("name", Column::Name),
            ("color", Column::Color),
            ("brand", Column::Brand),
            ("size", Column::Size),
            ("price", Column::Price),
            ("season", Column::Season),
            ("condition", Column::Condition),
            ("purchase_date", Column::PurchaseDate),
            ("is_favorite", Column::IsFavorite),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["name", "brand"]
    }

    fn fulltext_searchable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("name", Column::Name),
            ("description", Column::Description),
            ("brand", Column::Brand),
            ("color", Column::Color),
        ]
    }
}

/// Body for attaching a tag to a clothing item
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct AttachTag {
    pub tag_id: i32,
}

#[utoipa::path(
    get,
    path = "/{id}/tags",
    params(("id" = i32, Path, description = "Clothing item ID")),
    responses(
        (status = axum::http::StatusCode::OK, description = "Tags on the clothing item", body = [tag::Model]),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Clothing item not found")
    ),
    security(("bearer_auth" = [])),
    operation_id = "list_clothing_item_tags",
    summary = "List the tags on a clothing item"
)]
pub async fn list_tags_handler(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<tag::Model>>, ApiError> {
    let item = ClothingItem::find_model(&db, id).await?;
    let tags = item
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Id)
        .all(&db)
        .await?;
    Ok(Json(tags))
}

const LINK_COLUMNS: [clothing_item_tag::Column; 2] = [
    clothing_item_tag::Column::ClothingItemId,
    clothing_item_tag::Column::TagId,
];

/// Insert of a tag link that leaves an existing link untouched
fn link_tag(clothing_item_id: i32, tag_id: i32) -> sea_orm::Insert<clothing_item_tag::ActiveModel> {
    let link = clothing_item_tag::ActiveModel {
        clothing_item_id: Set(clothing_item_id),
        tag_id: Set(tag_id),
    };
    clothing_item_tag::Entity::insert(link).on_conflict(
        OnConflict::columns(LINK_COLUMNS)
            .do_nothing_on(LINK_COLUMNS)
            .to_owned(),
    )
}

#[utoipa::path(
    post,
    path = "/{id}/tags",
    params(("id" = i32, Path, description = "Clothing item ID")),
    request_body = AttachTag,
    responses(
        (status = axum::http::StatusCode::OK, description = "Clothing item with its tags", body = ClothingItem),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Clothing item not found"),
        (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Tag does not exist")
    ),
    security(("bearer_auth" = [])),
    operation_id = "attach_clothing_item_tag",
    summary = "Attach a tag to a clothing item",
    description = "Attaching a tag that is already attached leaves the item unchanged."
)]
pub async fn attach_tag_handler(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Payload(body): Payload<AttachTag>,
) -> Result<Json<ClothingItem>, ApiError> {
    ClothingItem::find_model(&db, id).await?;

    let mut errors = ValidationErrors::new();
    rules::check_exists::<tag::Entity, _>(&db, &mut errors, "tag_id", tag::Column::Id, body.tag_id)
        .await?;
    errors.result()?;

    link_tag(id, body.tag_id).exec_without_returning(&db).await?;
    tracing::debug!(clothing_item_id = id, tag_id = body.tag_id, "Attached tag");

    ClothingItem::get_one(&db, id).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/{id}/tags/{tag_id}",
    params(
        ("id" = i32, Path, description = "Clothing item ID"),
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = axum::http::StatusCode::OK, description = "Clothing item with its remaining tags", body = ClothingItem),
        (status = axum::http::StatusCode::NOT_FOUND, description = "Clothing item not found")
    ),
    security(("bearer_auth" = [])),
    operation_id = "detach_clothing_item_tag",
    summary = "Detach a tag from a clothing item"
)]
pub async fn detach_tag_handler(
    State(db): State<DatabaseConnection>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> Result<Json<ClothingItem>, ApiError> {
    ClothingItem::find_model(&db, id).await?;

    let removed = clothing_item_tag::Entity::delete_many()
        .filter(clothing_item_tag::Column::ClothingItemId.eq(id))
        .filter(clothing_item_tag::Column::TagId.eq(tag_id))
        .exec(&db)
        .await?;
    tracing::debug!(clothing_item_id = id, tag_id, removed = removed.rows_affected, "Detached tag");

    ClothingItem::get_one(&db, id).await.map(Json)
}

crate::crud_handlers!(
    ClothingItem,
    ClothingItemCreate,
    ClothingItemUpdate,
    routes!(list_tags_handler, attach_tag_handler),
    routes!(detach_tag_handler),
);
