//! Assembles the HTTP application.
//!
//! Everything lives under `/api`. Registration and login are public; every
//! other route passes through [`require_auth`]. The OpenAPI document is
//! collected from the handlers and served with Scalar at `/docs`.

use axum::{Router, http::HeaderValue, middleware};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::{self, require_auth};
use crate::core::CRUDResource;
use crate::models::{Category, ClothingItem, Outfit, Tag, User, category, clothing_item, outfit, tag, user};
use crate::stats;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wardrobe API",
        description = "Manage clothing items, outfits, categories and tags. \
            Obtain a token from `/api/login` or `/api/register` and send it as `Authorization: Bearer <token>`."
    ),
    modifiers(&BearerAuth)
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("<id>|<secret>")
                    .build(),
            ),
        );
    }
}

fn resource_path<R: CRUDResource>() -> String {
    format!("/{}", R::RESOURCE_NAME_PLURAL)
}

/// All `/api` routes with their OpenAPI description
pub fn api_router(db: &DatabaseConnection) -> OpenApiRouter {
    let protected = OpenApiRouter::new()
        .nest(&resource_path::<User>(), user::router(db))
        .nest(&resource_path::<Category>(), category::router(db))
        .nest(&resource_path::<Tag>(), tag::router(db))
        .nest(&resource_path::<ClothingItem>(), clothing_item::router(db))
        .nest(&resource_path::<Outfit>(), outfit::router(db))
        .nest("/stats", stats::router(db))
        .merge(auth::handlers::protected_router(db))
        .layer(middleware::from_fn_with_state(db.clone(), require_auth));

    let api = OpenApiRouter::new()
        .merge(auth::handlers::public_router(db))
        .merge(protected);

    OpenApiRouter::with_openapi(ApiDoc::openapi()).nest("/api", api)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// The complete application: API, docs, CORS and request tracing
pub fn build_app(db: &DatabaseConnection, cors_origins: &[String]) -> Router {
    let (router, api) = api_router(db).split_for_parts();

    router
        .merge(Scalar::with_url("/docs", api))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_resources() {
        let db = DatabaseConnection::Disconnected;
        let (_, api) = api_router(&db).split_for_parts();
        let paths: Vec<&String> = api.paths.paths.keys().collect();

        for expected in [
            "/api/login",
            "/api/register",
            "/api/me",
            "/api/tags/{id}",
            "/api/clothing-items/{id}/tags",
            "/api/clothing-items/{id}/tags/{tag_id}",
            "/api/stats/categories",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
        assert!(
            api.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
