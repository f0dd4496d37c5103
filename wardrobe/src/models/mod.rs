//! Tables and the API records built on them.
//!
//! Each resource module holds its `sea-orm` entity, the serialized record with
//! relations loaded, the create/update payloads and the generated `router`.
//! Join tables and access tokens have no endpoints of their own.

pub mod category;
pub mod clothing_item;
pub mod clothing_item_tag;
pub mod outfit;
pub mod outfit_item;
pub mod personal_access_token;
pub mod tag;
pub mod user;

pub use category::Category;
pub use clothing_item::ClothingItem;
pub use outfit::Outfit;
pub use tag::Tag;
pub use user::User;
