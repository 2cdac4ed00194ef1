//! `collectiq-scoring`: priority scores and tier categorization for debts.

pub mod categorize;
pub mod priority;

pub use categorize::{categorize_debts, PriorityBuckets, PriorityTier};
pub use priority::calculate_priority_score;
