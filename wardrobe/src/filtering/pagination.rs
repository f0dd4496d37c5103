use axum::http::header::HeaderMap;

use super::query_parser::FilterOptions;

/// Upper bound on a single page
pub const MAX_PAGE_SIZE: u64 = 1_000;

/// Largest offset the database drivers accept (a signed 64-bit integer)
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Parse a React Admin `[start, end]` range (inclusive)
#[must_use]
pub fn parse_range(range: &str) -> Option<(u64, u64)> {
    let [start, end] = serde_json::from_str::<[u64; 2]>(range).ok()?;
    (end >= start).then_some((start, end))
}

/// Resolve `(offset, limit)` from the query, or `None` to return everything.
///
/// `page`/`per_page` wins over `range`; both are capped at [`MAX_PAGE_SIZE`]
/// and the offset at [`MAX_OFFSET`].
#[must_use]
pub fn parse_pagination(params: &FilterOptions) -> Option<(u64, u64)> {
    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        let limit = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = page.saturating_sub(1).saturating_mul(limit).min(MAX_OFFSET);
        Some((offset, limit))
    } else if let Some(range) = &params.range {
        let (start, end) = parse_range(range)?;
        let limit = (end - start).saturating_add(1).min(MAX_PAGE_SIZE);
        Some((start.min(MAX_OFFSET), limit))
    } else {
        None
    }
}

/// Build the `Content-Range` header for a listing.
///
/// `returned` is the number of items in this response; an empty page is
/// rendered as `<name> */<total>`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    returned: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = if returned == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        let last = offset.saturating_add(returned - 1);
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
