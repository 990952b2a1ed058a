//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod department_repo;
pub mod employee_repo;
pub mod message_repo;
pub mod presence_repo;
pub mod scan_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;

pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use message_repo::MessageRepo;
pub use presence_repo::PresenceRepo;
pub use scan_repo::ScanRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
