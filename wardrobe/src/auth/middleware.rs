use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;

use super::tokens;
use crate::errors::ApiError;
use crate::models::user;

/// The user behind the bearer token of the current request.
///
/// Inserted into request extensions by [`require_auth`]; handlers read it with
/// `Extension<AuthenticatedUser>`.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: user::Model,
    /// Row id of the token used, so logout can revoke exactly that one
    pub token_id: i32,
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Reject requests without a valid bearer token with 401.
///
/// # Errors
///
/// 401 for a missing or invalid token, 500 if the token lookup fails.
pub async fn require_auth(
    State(db): State<DatabaseConnection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or_else(|| ApiError::unauthorized("Unauthenticated."))?;
    let (user, token) = tokens::authenticate(&db, &token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthenticated."))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user,
        token_id: token.id,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&request_with(Some("Bearer 1|abc"))), Some("1|abc".to_string()));
        assert_eq!(bearer_token(&request_with(Some("bearer 1|abc"))), Some("1|abc".to_string()));
        assert_eq!(bearer_token(&request_with(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request_with(None)), None);
    }
}
