pub mod markdown;
pub mod topic;
