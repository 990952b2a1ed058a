//! Route definitions for the `/presence` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

/// Routes mounted at `/presence`.
///
/// ```text
/// POST /        -> mark
/// GET  /today   -> today (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(presence::mark))
        .route("/today", get(presence::today))
}
