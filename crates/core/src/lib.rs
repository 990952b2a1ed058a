//! Domain logic shared by every Trinity crate.
//!
//! This crate has no internal dependencies: the API, the scan runner and the
//! Blue Trinity sentinel all build on it.

pub mod access_log;
pub mod attendance;
pub mod detection;
pub mod env;
pub mod error;
pub mod hashing;
pub mod letters;
pub mod pagination;
pub mod roles;
pub mod scan;
pub mod status;
pub mod types;
