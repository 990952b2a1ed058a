//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /              -> list (manager)
/// GET  /me            -> me
/// PUT  /me            -> update_me
/// GET  /{id}          -> get_by_id (manager)
/// PUT  /{id}          -> update (admin)
/// PUT  /{id}/status   -> set_status (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/me", get(users::me).put(users::update_me))
        .route("/{id}", get(users::get_by_id).put(users::update))
        .route("/{id}/status", put(users::set_status))
}
