pub mod error;
pub mod status;
pub mod tag_group;

pub use status::{RecordSource, ResourceStatus};
pub use tag_group::TagGroup;
