//! Demo data for `wardrobe seed`.
//!
//! Safe to run repeatedly: the demo user, categories and tags are looked up
//! before being created, and the demo user's clothing items are replaced.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, TransactionTrait,
};

use crate::auth::password::hash_password;
use crate::models::{category, clothing_item, tag, user};

pub const DEMO_EMAIL: &str = "demo@wardrobe.com";
pub const DEMO_PASSWORD: &str = "password123";

/// (title, slug, description)
const CATEGORIES: [(&str, &str, &str); 6] = [
    ("Tops", "tops", "T-shirts, shirts, blouses"),
    ("Bottoms", "bottoms", "Pants, jeans, skirts"),
    ("Dresses", "dresses", "Casual and formal dresses"),
    ("Outerwear", "outerwear", "Jackets, coats, blazers"),
    ("Shoes", "shoes", "Sneakers, boots, heels"),
    ("Accessories", "accessories", "Bags, jewelry, hats"),
];

const TAGS: [&str; 8] = [
    "Casual", "Formal", "Summer", "Winter", "Vintage", "Modern", "Sporty", "Elegant",
];

struct CatalogueItem {
    name: &'static str,
    category: &'static str,
    color: &'static str,
    brand: &'static str,
    size: &'static str,
    image: &'static str,
}

macro_rules! item {
    ($name:literal, $category:literal, $color:literal, $brand:literal, $size:literal, $photo:literal) => {
        CatalogueItem {
            name: $name,
            category: $category,
            color: $color,
            brand: $brand,
            size: $size,
            image: concat!("https://images.unsplash.com/photo-", $photo, "?w=400"),
        }
    };
}

const CATALOGUE: [CatalogueItem; 17] = [
    item!("White Cotton T-Shirt", "tops", "White", "H&M", "M", "1521572163474-6864f9cf17ab"),
    item!("Blue Denim Shirt", "tops", "Blue", "Levi's", "L", "1596755094514-f87e34085b2c"),
    item!("Black Polo Shirt", "tops", "Black", "Ralph Lauren", "M", "1586790170083-2f9ceadc732d"),
    item!("Dark Blue Jeans", "bottoms", "Dark Blue", "Levi's", "32", "1542272604-787c3835535d"),
    item!("Black Chinos", "bottoms", "Black", "Zara", "32", "1624378439575-d8705ad7ae80"),
    item!("Grey Joggers", "bottoms", "Grey", "Nike", "M", "1517438476312-10d79c077509"),
    item!("Summer Floral Dress", "dresses", "Multicolor", "Zara", "S", "1595777457583-95e059d581b8"),
    item!("Black Evening Dress", "dresses", "Black", "H&M", "M", "1566174053879-31528523f8ae"),
    item!("Leather Jacket", "outerwear", "Black", "Zara", "L", "1551028719-00167b16eac5"),
    item!("Denim Jacket", "outerwear", "Blue", "Levi's", "M", "1576995853123-5a10305d93c0"),
    item!("Wool Coat", "outerwear", "Grey", "Uniqlo", "L", "1539533018447-63fcce2678e3"),
    item!("White Sneakers", "shoes", "White", "Adidas", "42", "1549298916-b41d501d3772"),
    item!("Brown Leather Boots", "shoes", "Brown", "Timberland", "43", "1638247025967-b4e38f787b76"),
    item!("Black Loafers", "shoes", "Black", "Clarks", "42", "1533867617858-e7b97e060509"),
    item!("Leather Watch", "accessories", "Brown", "Fossil", "One Size", "1524805444758-089113d48a6d"),
    item!("Black Backpack", "accessories", "Black", "Herschel", "One Size", "1553062407-98eeb64c6a62"),
    item!("Sunglasses", "accessories", "Black", "Ray-Ban", "One Size", "1572635196237-14b3f281503f"),
];

/// What a seed run left in the database
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub user_id: i32,
    pub categories: usize,
    pub tags: usize,
    pub clothing_items: usize,
}

async fn demo_user<C: ConnectionTrait>(db: &C) -> anyhow::Result<user::Model> {
    if let Some(existing) = user::Entity::find()
        .filter(user::Column::Email.eq(DEMO_EMAIL))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now();
    let created = user::ActiveModel {
        name: Set("Demo User".to_string()),
        email: Set(DEMO_EMAIL.to_string()),
        email_verified_at: Set(Some(now)),
        password: Set(hash_password(DEMO_PASSWORD)?),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(created)
}

async fn seed_categories<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<category::Model>> {
    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for (sort_order, (title, slug, description)) in (0..).zip(CATEGORIES) {
        let existing = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                let now = Utc::now();
                category::ActiveModel {
                    title: Set(title.to_string()),
                    slug: Set(slug.to_string()),
                    description: Set(Some(description.to_string())),
                    sort_order: Set(sort_order),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };
        categories.push(model);
    }
    Ok(categories)
}

async fn seed_tags<C: ConnectionTrait>(db: &C) -> anyhow::Result<usize> {
    for name in TAGS {
        let exists = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await?
            .is_some();
        if !exists {
            let now = Utc::now();
            tag::ActiveModel {
                name: Set(name.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(TAGS.len())
}

/// Create the demo account and its wardrobe.
///
/// # Errors
///
/// Fails if any database statement fails; nothing is committed in that case.
pub async fn run(db: &DatabaseConnection) -> anyhow::Result<SeedSummary> {
    let txn = db.begin().await?;

    let user = demo_user(&txn).await?;
    let removed = clothing_item::Entity::delete_many()
        .filter(clothing_item::Column::UserId.eq(user.id))
        .exec(&txn)
        .await?;
    tracing::info!(user_id = user.id, removed = removed.rows_affected, "Cleared demo clothing items");

    let categories = seed_categories(&txn).await?;
    let tags = seed_tags(&txn).await?;

    let mut clothing_items = 0;
    for entry in &CATALOGUE {
        let Some(category) = categories.iter().find(|c| c.slug == entry.category) else {
            tracing::warn!(category = entry.category, item = entry.name, "Category not found, skipping");
            continue;
        };
        let now = Utc::now();
        clothing_item::ActiveModel {
            user_id: Set(user.id),
            category_id: Set(category.id),
            name: Set(entry.name.to_string()),
            description: Set(Some("Added via seeder".to_string())),
            color: Set(Some(entry.color.to_string())),
            brand: Set(Some(entry.brand.to_string())),
            size: Set(Some(entry.size.to_string())),
            image: Set(Some(entry.image.to_string())),
            is_favorite: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        clothing_items += 1;
    }

    txn.commit().await?;

    Ok(SeedSummary {
        user_id: user.id,
        categories: categories.len(),
        tags,
        clothing_items,
    })
}
