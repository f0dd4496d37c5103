//! # wardrobe
//!
//! REST backend for a personal wardrobe: users, clothing categories, tags,
//! clothing items and outfits, with bearer-token authentication.
//!
//! Each resource implements [`CRUDResource`] and gets its handlers and
//! `OpenApiRouter` from [`crud_handlers!`]. List endpoints share the
//! filtering, sorting and pagination rules in [`filtering`].
//!
//! ```rust,ignore
//! let db = sea_orm::Database::connect("sqlite::memory:").await?;
//! wardrobe::Migrator::up(&db, None).await?;
//! let app = wardrobe::build_app(&db, &[]);
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod errors;
pub mod filtering;
pub mod migration;
pub mod models;
pub mod router;
pub mod seed;
pub mod stats;
pub mod validation;

pub use crate::core::{CRUDResource, MergeIntoActiveModel, Payload};
pub use errors::ApiError;
pub use migration::Migrator;
pub use router::{api_router, build_app};
pub use validation::{Validatable, ValidationError, ValidationErrors};
