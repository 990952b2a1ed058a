//! C2 scan runner.
//!
//! Scans are persisted by the API in `pending` state and handed to a
//! [`ScanRunner`], which executes `nmap` or `sqlmap` as a subprocess on a
//! background task and records the outcome.

pub mod config;
pub mod error;
pub mod process;
pub mod runner;

pub use config::RunnerConfig;
pub use error::ScanError;
pub use runner::ScanRunner;
