pub mod aggregator;
pub mod models;

pub use aggregator::{aggregate, UNKNOWN_GROUP};
pub use models::{BerthGroup, BollardGroup, ClassifiedHook, GroupCounts, StatusSummary};
