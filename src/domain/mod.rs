pub mod commit_type;
pub mod header;

pub use commit_type::CommitType;
pub use header::ConventionalHeader;
