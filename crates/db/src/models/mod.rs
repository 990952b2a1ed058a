//! Row models and DTOs, one module per table.

pub mod department;
pub mod employee;
pub mod message;
pub mod presence;
pub mod scan;
pub mod session;
pub mod task;
pub mod user;
