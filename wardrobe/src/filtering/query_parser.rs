use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for filtering, pagination, and sorting resources.
///
/// # Filtering
/// The `filter` parameter accepts a JSON-encoded object:
/// - **Free text search:** `{"q": "denim"}`
/// - **Equality:** `{"season": "Summer"}` (strings match case-insensitively)
/// - **Comparisons:** `{"price_gte": 20, "purchase_date_lt": "2024-01-01"}`
/// - **Lists:** `{"id": [1, 2, 3]}`
/// - **Nulls:** `{"brand": null}`
///
/// # Pagination
/// - **React Admin format:** `range=[0,9]` (inclusive)
/// - **Standard REST format:** `page=1&per_page=10`
///
/// Without either, every matching record is returned.
///
/// # Sorting
/// - `sort=["name","DESC"]`
/// - `sort=name&order=DESC` or `sort_by=name&order=DESC`
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// JSON-encoded filter object.
    #[param(example = json!({"q": "denim", "season": "Summer"}))]
    pub filter: Option<String>,
    /// Range for pagination in the format "[start, end]".
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// Page number for standard REST pagination (1-based).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    #[param(example = 10)]
    pub per_page: Option<u64>,
    /// Sort order in the format `["column", "order"]`, or a bare column name.
    #[param(example = r#"["name", "ASC"]"#)]
    pub sort: Option<String>,
    /// Sort column for standard REST format.
    #[param(example = "name")]
    pub sort_by: Option<String>,
    /// Sort order for standard REST format (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
}
