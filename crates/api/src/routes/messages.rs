//! Route definitions for the `/messages` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(messages::list).post(messages::create))
}
