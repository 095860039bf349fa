use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::AuthUser;

/// Public (unauthenticated) account routes. The password reset route is only
/// mounted when `allow_password_reset` is set.
pub fn router(allow_password_reset: bool) -> Router<AppState> {
    let router = Router::new().merge(handlers::auth_routes());
    if allow_password_reset {
        router.merge(handlers::reset_routes())
    } else {
        router
    }
}
