//! Route definitions for the `/scans` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::scans;
use crate::state::AppState;

/// Routes mounted at `/scans`. All require the `admin` role.
///
/// ```text
/// GET  /       -> list
/// POST /       -> start (202 Accepted)
/// GET  /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scans::list).post(scans::start))
        .route("/{id}", get(scans::get_by_id))
}
