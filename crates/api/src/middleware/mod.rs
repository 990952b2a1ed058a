//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireManager`] -- Requires `manager` or `admin`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`access_log`] -- Appends a Common Log Format line per response.

pub mod access_log;
pub mod auth;
pub mod rbac;
