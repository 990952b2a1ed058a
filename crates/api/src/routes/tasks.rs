//! Route definitions for the `/tasks` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (manager)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (manager)
/// DELETE /{id}          -> delete (manager)
/// PUT    /{id}/status   -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{id}/status", put(tasks::set_status))
}
