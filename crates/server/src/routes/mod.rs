//! HTTP route handlers.

use axum::Router;

use crate::state::AppState;

pub mod boundary;
pub mod categories;
pub mod health;
pub mod pois;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(pois::router())
        .merge(boundary::router())
        .merge(categories::router())
        .merge(health::router())
        .with_state(state)
}
