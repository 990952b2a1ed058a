pub mod auth;
pub mod departments;
pub mod employees;
pub mod messages;
pub mod presence;
pub mod scans;
pub mod tasks;
pub mod users;
