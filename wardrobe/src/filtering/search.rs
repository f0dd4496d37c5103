use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

// Basic safety limits
const MAX_SEARCH_QUERY_LENGTH: usize = 1_000;
const MAX_SEARCH_TERMS: usize = 10;

/// Escape LIKE wildcards so user input only ever matches literally
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring match on one column
#[must_use]
pub fn build_like_condition(column: impl ColumnTrait, value: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(value).to_uppercase());
    Expr::expr(Func::upper(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Build the free-text `q` search over the given columns.
///
/// Every whitespace-separated term has to appear (case-insensitively) in at
/// least one of the columns. Returns `None` for an empty query or when the
/// resource has no searchable columns.
#[must_use]
pub fn build_fulltext_condition<C>(query: &str, columns: &[(&'static str, C)]) -> Option<Condition>
where
    C: ColumnTrait + Copy,
{
    if columns.is_empty() {
        return None;
    }

    let truncated: String = query.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
    let terms: Vec<&str> = truncated.split_whitespace().take(MAX_SEARCH_TERMS).collect();
    if terms.is_empty() {
        return None;
    }

    let mut condition = Condition::all();
    for term in terms {
        let mut any_column = Condition::any();
        for (_, column) in columns {
            any_column = any_column.add(build_like_condition(*column, term));
        }
        condition = condition.add(any_column);
    }
    Some(condition)
}
