pub mod browse_errors;
pub mod catalog_errors;
pub mod remote_errors;
pub mod sync_errors;
pub mod tag_errors;
