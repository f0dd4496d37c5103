use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, Condition, Value,
    sea_query::{Expr, Func, SimpleExpr},
};
use std::collections::HashMap;

use super::search::{build_fulltext_condition, build_like_condition};
use crate::core::CRUDResource;

// Basic safety limits
const MAX_FIELD_VALUE_LENGTH: usize = 10_000;

/// Comparison requested through a `_gt`/`_gte`/`_lt`/`_lte`/`_neq` key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
    Neq,
}

/// Basic field name validation
fn is_valid_field_name(field_name: &str) -> bool {
    !field_name.is_empty()
        && field_name.len() <= 100
        && !field_name.starts_with('_')
        && !field_name.contains("..")
}

/// Split `price_gte` into `("price", Gte)`
fn parse_comparison_operator(field_name: &str) -> Option<(&str, Comparison)> {
    [
        ("_gte", Comparison::Gte),
        ("_lte", Comparison::Lte),
        ("_gt", Comparison::Gt),
        ("_lt", Comparison::Lt),
        ("_neq", Comparison::Neq),
    ]
    .into_iter()
    .find_map(|(suffix, op)| field_name.strip_suffix(suffix).map(|base| (base, op)))
}

fn compare(column: impl ColumnTrait, op: Comparison, value: Value) -> SimpleExpr {
    match op {
        Comparison::Gt => column.gt(value),
        Comparison::Gte => column.gte(value),
        Comparison::Lt => column.lt(value),
        Comparison::Lte => column.lte(value),
        Comparison::Neq => column.ne(value),
    }
}

/// Numbers bind as integers when they fit, floats otherwise
fn number_value(number: &serde_json::Number) -> Option<Value> {
    number
        .as_i64()
        .map(Value::from)
        .or_else(|| number.as_f64().map(Value::from))
}

/// Dates and RFC 3339 timestamps bind as typed values so range filters compare chronologically
fn temporal_value(value: &str) -> Option<Value> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Value::from(date));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| Value::from(dt.with_timezone(&Utc)))
}

fn scalar_value(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::String(s) => Some(Value::from(s.trim().to_string())),
        serde_json::Value::Number(n) => number_value(n),
        serde_json::Value::Bool(b) => Some(Value::from(*b)),
        _ => None,
    }
}

fn parse_filter_json(filter_str: Option<&str>) -> HashMap<String, serde_json::Value> {
    filter_str.map_or_else(HashMap::new, |filter| match serde_json::from_str(filter) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring invalid JSON in filter parameter");
            HashMap::new()
        }
    })
}

fn process_string_filter<T: CRUDResource>(
    key: &str,
    string_value: &str,
    column: T::ColumnType,
) -> Option<SimpleExpr> {
    if string_value.len() > MAX_FIELD_VALUE_LENGTH {
        return None;
    }

    let trimmed_value = string_value.trim();
    if trimmed_value.is_empty() {
        return None;
    }

    if T::like_filterable_columns().contains(&key) {
        return Some(build_like_condition(column, trimmed_value));
    }

    if let Some(temporal) = temporal_value(trimmed_value) {
        return Some(column.eq(temporal));
    }

    // Case-insensitive string equality, also covers the fixed-choice columns
    Some(Expr::expr(Func::upper(Expr::col(column))).eq(trimmed_value.to_uppercase()))
}

fn process_comparison(
    operator: Comparison,
    value: &serde_json::Value,
    column: impl ColumnTrait,
) -> Option<SimpleExpr> {
    let bound = match value {
        serde_json::Value::Number(number) => number_value(number)?,
        serde_json::Value::String(s) if s.len() <= MAX_FIELD_VALUE_LENGTH => {
            let trimmed = s.trim();
            temporal_value(trimmed).unwrap_or_else(|| Value::from(trimmed.to_string()))
        }
        serde_json::Value::Bool(b) if operator == Comparison::Neq => Value::from(*b),
        _ => return None,
    };
    Some(compare(column, operator, bound))
}

fn process_array_filter(array_values: &[serde_json::Value], column: impl ColumnTrait) -> Option<SimpleExpr> {
    let values: Vec<Value> = array_values.iter().filter_map(scalar_value).collect();
    if values.is_empty() {
        return None;
    }
    Some(column.is_in(values))
}

fn find_column<C: Copy>(columns: &[(&str, C)], name: &str) -> Option<C> {
    columns
        .iter()
        .find(|(col_name, _)| *col_name == name)
        .map(|(_, col)| *col)
}

/// Translate the JSON `filter` query parameter into a `Condition`.
///
/// Keys that aren't filterable columns, unsupported value shapes and invalid
/// JSON are ignored rather than rejected.
#[must_use]
pub fn apply_filters<T: CRUDResource>(filter_str: Option<&str>) -> Condition {
    let filters = parse_filter_json(filter_str);
    let filterable = T::filterable_columns();
    let mut condition = Condition::all();

    if let Some(q) = filters.get("q").and_then(serde_json::Value::as_str)
        && let Some(search) = build_fulltext_condition(q, &T::fulltext_searchable_columns())
    {
        condition = condition.add(search);
    }

    for (key, value) in &filters {
        if key == "q" || !is_valid_field_name(key) {
            continue;
        }

        let filter_condition = if let Some(column) = find_column(&filterable, key) {
            match value {
                serde_json::Value::String(string_value) => {
                    process_string_filter::<T>(key, string_value, column)
                }
                serde_json::Value::Number(number) => number_value(number).map(|v| column.eq(v)),
                serde_json::Value::Bool(bool_value) => Some(column.eq(*bool_value)),
                serde_json::Value::Array(array_values) => process_array_filter(array_values, column),
                serde_json::Value::Null => Some(column.is_null()),
                serde_json::Value::Object(_) => None,
            }
        } else if let Some((base_field, operator)) = parse_comparison_operator(key) {
            find_column(&filterable, base_field)
                .and_then(|column| process_comparison(operator, value, column))
        } else {
            None
        };

        if let Some(filter_expr) = filter_condition {
            condition = condition.add(filter_expr);
        }
    }

    condition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clothing_item::ClothingItem;

    #[test]
    fn test_field_name_validation() {
        assert!(is_valid_field_name("price"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_secret"));
        assert!(!is_valid_field_name("a..b"));
        assert!(!is_valid_field_name(&"x".repeat(101)));
    }

    #[test]
    fn test_comparison_suffixes() {
        assert_eq!(parse_comparison_operator("price_gte"), Some(("price", Comparison::Gte)));
        assert_eq!(parse_comparison_operator("price_gt"), Some(("price", Comparison::Gt)));
        assert_eq!(parse_comparison_operator("price_lte"), Some(("price", Comparison::Lte)));
        assert_eq!(parse_comparison_operator("price_lt"), Some(("price", Comparison::Lt)));
        assert_eq!(parse_comparison_operator("brand_neq"), Some(("brand", Comparison::Neq)));
        assert_eq!(parse_comparison_operator("price"), None);
    }

    #[test]
    fn test_temporal_values() {
        assert!(matches!(temporal_value("2024-03-01"), Some(Value::ChronoDate(_))));
        assert!(matches!(
            temporal_value("2024-03-01T10:00:00Z"),
            Some(Value::ChronoDateTimeUtc(_))
        ));
        assert!(temporal_value("Summer").is_none());
    }

    #[test]
    fn test_invalid_json_is_ignored() {
        let condition = apply_filters::<ClothingItem>(Some("{not json"));
        assert!(condition.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let condition = apply_filters::<ClothingItem>(Some(r#"{"password": "x", "nope_gte": 3}"#));
        assert!(condition.is_empty());
    }

    #[test]
    fn test_each_known_key_adds_a_condition() {
        let condition = apply_filters::<ClothingItem>(Some(
            r#"{"season": "Summer", "price_gte": 10, "is_favorite": true, "brand": null, "id": [1, 2]}"#,
        ));
        assert_eq!(condition.len(), 5);
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let condition = apply_filters::<ClothingItem>(Some(r#"{"name": "   ", "id": []}"#));
        assert!(condition.is_empty());
    }

    #[test]
    fn test_search_query_adds_condition() {
        let condition = apply_filters::<ClothingItem>(Some(r#"{"q": "denim"}"#));
        assert_eq!(condition.len(), 1);
    }
}
