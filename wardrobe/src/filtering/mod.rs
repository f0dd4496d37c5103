//! # Filtering, sorting and pagination
//!
//! Translates the list query parameters shared by every resource into
//! `sea-orm` conditions, orderings and page windows.
//!
//! ```text
//! GET /api/clothing-items?filter={"q":"denim","price_lte":50}
//! GET /api/clothing-items?filter={"season":"summer","is_favorite":true}
//! GET /api/outfits?sort=["name","DESC"]&range=[0,24]
//! GET /api/tags?sort_by=name&order=asc&page=2&per_page=10
//! ```
//!
//! Each resource decides which columns take part through
//! [`CRUDResource`](crate::core::CRUDResource): `filterable_columns`,
//! `like_filterable_columns`, `sortable_columns` and
//! `fulltext_searchable_columns`. Anything else in the request is ignored.

pub mod conditions;
pub mod pagination;
pub mod query_parser;
pub mod search;
pub mod sort;

pub use conditions::apply_filters;
pub use pagination::{MAX_PAGE_SIZE, calculate_content_range, parse_pagination, parse_range};
pub use query_parser::FilterOptions;
pub use search::{build_fulltext_condition, build_like_condition};
pub use sort::parse_sorting;
