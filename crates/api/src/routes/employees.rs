//! Route definitions for the `/employees` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::employees;
use crate::state::AppState;

/// Routes mounted at `/employees`. All require `manager` or `admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employees::list).post(employees::create))
        .route(
            "/{id}",
            get(employees::get_by_id)
                .put(employees::update)
                .delete(employees::delete),
        )
        .route("/{id}/status", put(employees::set_status))
}
