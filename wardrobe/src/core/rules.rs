//! Validation rules that need the database.
//!
//! These run after [`Validatable`](crate::validation::Validatable) has
//! passed, and push their failures into the same [`ValidationErrors`] so a
//! request gets every problem reported in one 422.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Value};

use crate::validation::{ValidationError, ValidationErrors};

/// Require that no other row already holds `value` in `column`.
///
/// `except` excludes the row being updated: `(id_column, id)`.
///
/// # Errors
///
/// Returns the database error if the lookup fails.
pub async fn check_unique<E, C>(
    db: &C,
    errors: &mut ValidationErrors,
    field: &str,
    column: E::Column,
    value: impl Into<Value> + Send,
    except: Option<(E::Column, i32)>,
) -> Result<(), DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut query = E::find().filter(column.eq(value));
    if let Some((id_column, id)) = except {
        query = query.filter(id_column.ne(id));
    }
    if query.one(db).await?.is_some() {
        errors.add(ValidationError::new(
            field,
            format!("The {field} has already been taken"),
        ));
    }
    Ok(())
}

/// Require that a row with `id` exists.
///
/// # Errors
///
/// Returns the database error if the lookup fails.
pub async fn check_exists<E, C>(
    db: &C,
    errors: &mut ValidationErrors,
    field: &str,
    id_column: E::Column,
    id: i32,
) -> Result<(), DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if E::find().filter(id_column.eq(id)).one(db).await?.is_none() {
        errors.add(ValidationError::new(
            field,
            format!("The selected {field} is invalid"),
        ));
    }
    Ok(())
}

/// Require that every id in `ids` exists. Duplicates are allowed.
///
/// # Errors
///
/// Returns the database error if the lookup fails.
pub async fn check_all_exist<E, C>(
    db: &C,
    errors: &mut ValidationErrors,
    field: &str,
    id_column: E::Column,
    ids: &[i32],
) -> Result<(), DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut wanted = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();
    if wanted.is_empty() {
        return Ok(());
    }

    let found = E::find()
        .filter(id_column.is_in(wanted.iter().copied()))
        .all(db)
        .await?
        .len();
    if found != wanted.len() {
        errors.add(ValidationError::new(
            field,
            format!("The selected {field} is invalid"),
        ));
    }
    Ok(())
}
