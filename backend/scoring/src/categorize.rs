//! Bucket debts into priority tiers.

use std::fmt;

use collectiq_core::{CollectResult, DebtRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::priority::raw_score;

pub const CRITICAL_THRESHOLD: f64 = 50.0;
pub const HIGH_THRESHOLD: f64 = 25.0;
pub const MEDIUM_THRESHOLD: f64 = 10.0;

/// Priority tier a score falls into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Score >= 50
    Critical,
    /// 25 <= score < 50
    High,
    /// 10 <= score < 25
    Medium,
    /// Score < 10
    Low,
}

impl PriorityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityTier::Critical => "critical",
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        };
        f.write_str(s)
    }
}

/// Debts grouped by tier, each group sorted by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityBuckets {
    pub critical: Vec<DebtRecord>,
    pub high: Vec<DebtRecord>,
    pub medium: Vec<DebtRecord>,
    pub low: Vec<DebtRecord>,
}

impl PriorityBuckets {
    pub fn tier(&self, tier: PriorityTier) -> &[DebtRecord] {
        match tier {
            PriorityTier::Critical => &self.critical,
            PriorityTier::High => &self.high,
            PriorityTier::Medium => &self.medium,
            PriorityTier::Low => &self.low,
        }
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All debts, highest tier first.
    pub fn iter(&self) -> impl Iterator<Item = &DebtRecord> {
        self.critical
            .iter()
            .chain(&self.high)
            .chain(&self.medium)
            .chain(&self.low)
    }
}

/// Score, sort, and partition `debts` into tiers.
///
/// The input is left untouched; returned records carry their `priority_score`.
/// Equal scores keep their input order. One invalid record fails the whole batch.
pub fn categorize_debts(debts: &[DebtRecord]) -> CollectResult<PriorityBuckets> {
    let mut scored = Vec::with_capacity(debts.len());
    for debt in debts {
        debt.validate()?;
        let mut debt = debt.clone();
        debt.priority_score = Some(raw_score(&debt));
        scored.push(debt);
    }

    // sort_by is stable
    scored.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));

    let mut buckets = PriorityBuckets::default();
    for debt in scored {
        match PriorityTier::from_score(score_of(&debt)) {
            PriorityTier::Critical => buckets.critical.push(debt),
            PriorityTier::High => buckets.high.push(debt),
            PriorityTier::Medium => buckets.medium.push(debt),
            PriorityTier::Low => buckets.low.push(debt),
        }
    }

    debug!(
        critical = buckets.critical.len(),
        high = buckets.high.len(),
        medium = buckets.medium.len(),
        low = buckets.low.len(),
        "Categorized debts"
    );
    Ok(buckets)
}

fn score_of(debt: &DebtRecord) -> f64 {
    debt.priority_score.unwrap_or_default()
}
