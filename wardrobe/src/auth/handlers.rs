use axum::{Extension, Json, extract::State, http::StatusCode};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::{AuthenticatedUser, password, tokens};
use crate::core::Payload;
use crate::errors::ApiError;
use crate::models::user::{self, UserCreate, insert_user};
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Must equal `password`
    pub password_confirmation: String,
}

impl RegisterRequest {
    fn into_user(self) -> UserCreate {
        UserCreate {
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

impl Validatable for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.clone().into_user().validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if self.password != self.password_confirmation {
            errors.add(ValidationError::new(
                "password",
                "The password field confirmation does not match",
            ));
        }
        errors.result()
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validatable for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("email", &self.email));
        errors.check(validators::validate_required("password", &self.password));
        errors.result()
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: user::Model,
    /// Send as `Authorization: Bearer <access_token>`
    pub access_token: String,
    pub token_type: String,
}

impl AuthResponse {
    fn new(message: &str, user: user::Model, access_token: String) -> Self {
        Self {
            message: message.to_string(),
            user,
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: user::Model,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = StatusCode::CREATED, description = "User registered and signed in", body = AuthResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
    ),
    tag = "auth",
    summary = "Register a new account"
)]
pub async fn register_handler(
    State(db): State<DatabaseConnection>,
    Payload(request): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    let user = insert_user(&db, request.into_user()).await?;
    let access_token = tokens::issue(&db, user.id, tokens::DEFAULT_TOKEN_NAME).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new("User registered successfully", user, access_token)),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = StatusCode::OK, description = "Signed in", body = AuthResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
    ),
    tag = "auth",
    summary = "Exchange credentials for an access token"
)]
pub async fn login_handler(
    State(db): State<DatabaseConnection>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .one(&db)
        .await?
        .filter(|user| password::verify_password(&request.password, &user.password));
    let Some(user) = user else {
        tracing::info!("Rejected login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let access_token = tokens::issue(&db, user.id, tokens::DEFAULT_TOKEN_NAME).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse::new("Login successful", user, access_token)))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = StatusCode::OK, description = "Token revoked", body = MessageResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth",
    summary = "Revoke the token used for this request"
)]
pub async fn logout_handler(
    State(db): State<DatabaseConnection>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    tokens::revoke(&db, auth.token_id).await?;
    tracing::info!(user_id = auth.user.id, "User logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = StatusCode::OK, description = "The signed-in user", body = MeResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth",
    summary = "Get the signed-in user"
)]
pub async fn me_handler(Extension(auth): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse { user: auth.user })
}

/// `/register` and `/login`, open to anonymous callers
pub fn public_router(db: &DatabaseConnection) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register_handler))
        .routes(routes!(login_handler))
        .with_state(db.clone())
}

/// `/logout` and `/me`; must sit behind [`require_auth`](super::require_auth)
pub fn protected_router(db: &DatabaseConnection) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(logout_handler))
        .routes(routes!(me_handler))
        .with_state(db.clone())
}
