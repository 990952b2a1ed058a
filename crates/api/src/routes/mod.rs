pub mod auth;
pub mod departments;
pub mod employees;
pub mod health;
pub mod messages;
pub mod presence;
pub mod scans;
pub mod tasks;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                register (public)
/// /auth/login                   login (public)
/// /auth/refresh                 refresh (public)
/// /auth/logout                  logout (requires auth)
///
/// /users                        list (manager)
/// /users/me                     get, update own profile
/// /users/{id}                   get (manager), update (admin)
/// /users/{id}/status            set status (manager)
///
/// /departments                  list, create (admin)
/// /departments/{id}             get, update, delete (admin)
///
/// /tasks                        list (scoped by role), create (manager)
/// /tasks/{id}                   get, update, delete
/// /tasks/{id}/status            set status (assignee or manager)
///
/// /messages                     recent feed, post
///
/// /employees                    list, create (manager)
/// /employees/{id}               get, update, delete (manager)
/// /employees/{id}/status        set status (manager)
///
/// /presence                     mark self present today
/// /presence/today               who is present (manager)
///
/// /scans                        recent scans, start scan (admin)
/// /scans/{id}                   scan detail by scan_id (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/departments", departments::router())
        .nest("/tasks", tasks::router())
        .nest("/messages", messages::router())
        .nest("/employees", employees::router())
        .nest("/presence", presence::router())
        // C2 scan service.
        .nest("/scans", scans::router())
}
