use sea_orm::{ColumnTrait, sea_query::Order};

use super::query_parser::FilterOptions;

const DEFAULT_SORT_ORDER: &str = "ASC";

/// Parse sort column and order from JSON array format
fn parse_json_sort(json: &str) -> Option<(String, String)> {
    let sort_vec: Vec<String> = serde_json::from_str(json).ok()?;
    let column = sort_vec.first()?.clone();
    let order = sort_vec
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string());
    Some((column, order))
}

/// Convert sort order string to Order enum
fn parse_order(sort_order: &str) -> Order {
    if sort_order.eq_ignore_ascii_case("DESC") {
        Order::Desc
    } else {
        Order::Asc
    }
}

/// Find column by its public name
fn find_column<C>(column_name: &str, columns: &[(&str, C)]) -> Option<C>
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|&&(col_name, _)| col_name == column_name)
        .map(|&(_, col)| col)
}

/// Parse sorting from `FilterOptions`, supporting both React Admin and standard REST formats
///
/// Returns `None` when no sort was requested or the column isn't sortable, so
/// the caller can fall back to the resource's default ordering.
#[must_use]
pub fn parse_sorting<C>(params: &FilterOptions, sortable_columns: &[(&str, C)]) -> Option<(C, Order)>
where
    C: ColumnTrait + Copy,
{
    let rest_order = || params.order.as_deref().unwrap_or(DEFAULT_SORT_ORDER).to_string();

    let (sort_column, sort_order) = if let Some(sort_by) = &params.sort_by {
        (sort_by.clone(), rest_order())
    } else if let Some(sort) = &params.sort {
        if sort.starts_with('[') {
            parse_json_sort(sort)?
        } else {
            (sort.clone(), rest_order())
        }
    } else {
        return None;
    };

    let column = find_column(&sort_column, sortable_columns)?;
    Some((column, parse_order(&sort_order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clothing_item::Column;

    fn columns() -> Vec<(&'static str, Column)> {
        vec![("id", Column::Id), ("name", Column::Name), ("price", Column::Price)]
    }

    #[test]
    fn test_parse_json_sort_valid() {
        assert_eq!(
            parse_json_sort(r#"["name", "DESC"]"#),
            Some(("name".to_string(), "DESC".to_string()))
        );
    }

    #[test]
    fn test_parse_json_sort_partial() {
        assert_eq!(
            parse_json_sort(r#"["price"]"#),
            Some(("price".to_string(), DEFAULT_SORT_ORDER.to_string()))
        );
    }

    #[test]
    fn test_parse_json_sort_invalid() {
        assert_eq!(parse_json_sort("invalid json"), None);
        assert_eq!(parse_json_sort("[]"), None);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("asc"), Order::Asc);
        assert_eq!(parse_order("Desc"), Order::Desc);
        assert_eq!(parse_order("garbage"), Order::Asc);
    }

    #[test]
    fn test_no_sort_requested() {
        assert!(parse_sorting(&FilterOptions::default(), &columns()).is_none());
    }

    #[test]
    fn test_react_admin_sort() {
        let params = FilterOptions {
            sort: Some(r#"["price","DESC"]"#.to_string()),
            ..Default::default()
        };
        let (column, order) = parse_sorting(&params, &columns()).unwrap();
        assert!(matches!(column, Column::Price));
        assert_eq!(order, Order::Desc);
    }

    #[test]
    fn test_rest_sort_by_takes_priority() {
        let params = FilterOptions {
            sort_by: Some("name".to_string()),
            order: Some("desc".to_string()),
            sort: Some(r#"["price","ASC"]"#.to_string()),
            ..Default::default()
        };
        let (column, order) = parse_sorting(&params, &columns()).unwrap();
        assert!(matches!(column, Column::Name));
        assert_eq!(order, Order::Desc);
    }

    #[test]
    fn test_plain_sort_column() {
        let params = FilterOptions {
            sort: Some("name".to_string()),
            ..Default::default()
        };
        let (column, order) = parse_sorting(&params, &columns()).unwrap();
        assert!(matches!(column, Column::Name));
        assert_eq!(order, Order::Asc);
    }

    #[test]
    fn test_unknown_column_falls_back() {
        let params = FilterOptions {
            sort: Some(r#"["password","ASC"]"#.to_string()),
            ..Default::default()
        };
        assert!(parse_sorting(&params, &columns()).is_none());
    }
}
