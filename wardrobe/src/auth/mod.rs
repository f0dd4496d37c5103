//! Bearer-token authentication.
//!
//! Tokens look like `<id>|<secret>`. The row id locates the token; only the
//! SHA-256 of the secret is stored, so a leaked database does not leak
//! usable tokens.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use middleware::{AuthenticatedUser, require_auth};
