use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{personal_access_token, user};

/// Name given to tokens issued by login and registration
pub const DEFAULT_TOKEN_NAME: &str = "auth_token";

/// 64 hex characters from two v4 UUIDs
fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Hex-encoded SHA-256 of a token secret
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// Split `"<id>|<secret>"` into its parts
#[must_use]
pub fn parse_token(token: &str) -> Option<(i32, &str)> {
    let (id, secret) = token.split_once('|')?;
    let id = id.parse().ok()?;
    (!secret.is_empty()).then_some((id, secret))
}

/// Store a new token for `user_id` and return the plain-text value.
///
/// The plain-text token cannot be recovered later.
///
/// # Errors
///
/// Returns the database error if the insert fails.
pub async fn issue<C: ConnectionTrait>(db: &C, user_id: i32, name: &str) -> Result<String, DbErr> {
    let secret = generate_secret();
    let token = personal_access_token::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        token: Set(hash_secret(&secret)),
        last_used_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!(user_id, token_id = token.id, "Issued access token");
    Ok(format!("{}|{}", token.id, secret))
}

/// Resolve a bearer token to its owner, refreshing `last_used_at`.
///
/// Returns `None` for malformed, unknown or mismatched tokens.
///
/// # Errors
///
/// Returns the database error if a lookup or the refresh fails.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<(user::Model, personal_access_token::Model)>, DbErr> {
    let Some((id, secret)) = parse_token(token) else {
        return Ok(None);
    };
    let Some(stored) = personal_access_token::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    if stored.token != hash_secret(secret) {
        return Ok(None);
    }
    let Some(owner) = user::Entity::find_by_id(stored.user_id).one(db).await? else {
        return Ok(None);
    };

    let mut active = stored.into_active_model();
    active.last_used_at = Set(Some(Utc::now()));
    let stored = active.update(db).await?;

    Ok(Some((owner, stored)))
}

/// Delete a token. Revoking an unknown token is a no-op.
///
/// # Errors
///
/// Returns the database error if the delete fails.
pub async fn revoke<C: ConnectionTrait>(db: &C, token_id: i32) -> Result<(), DbErr> {
    personal_access_token::Entity::delete_by_id(token_id)
        .exec(db)
        .await?;
    tracing::debug!(token_id, "Revoked access token");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_shape() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("12|secret"), Some((12, "secret")));
        assert_eq!(parse_token("12|"), None);
        assert_eq!(parse_token("abc|secret"), None);
        assert_eq!(parse_token("no-separator"), None);
        // only the first separator splits
        assert_eq!(parse_token("3|a|b"), Some((3, "a|b")));
    }
}
