// Core traits, request extractors and the CRUD handler generator

pub mod handlers;
pub mod payload;
pub mod rules;
pub mod traits;

pub use payload::Payload;
pub use traits::{CRUDResource, MergeIntoActiveModel};
