//! Blue Trinity: access-log defender, absence manager and the small HTTP
//! surface reporting on both.

pub mod alerts;
pub mod blacklist;
pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod server;
pub mod tailer;

pub use config::SentinelConfig;
pub use error::SentinelError;
