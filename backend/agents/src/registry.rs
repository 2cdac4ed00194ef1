//! Agent registry: lookup, filtering, performance updates, and task assignment.
//!
//! Explicitly constructed and passed to callers; clones share the same state.
use std::collections::BTreeMap;
use std::sync::Arc;

use collectiq_core::{
    AgentCategory, AgentDescriptor, AgentStatus, Clock, CollectError, CollectResult,
    PerformanceUpdate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::roster::default_agents;

#[derive(Clone)]
pub struct AgentRegistry {
    /// Keyed by agent id; ordered so ties resolve the same way every time.
    agents: Arc<RwLock<BTreeMap<String, AgentDescriptor>>>,
    clock: Arc<dyn Clock>,
}

impl AgentRegistry {
    /// Registry holding exactly `agents`, e.g. with metrics from real telemetry.
    pub fn from_agents(agents: Vec<AgentDescriptor>, clock: Arc<dyn Clock>) -> Self {
        let agents = agents.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self {
            agents: Arc::new(RwLock::new(agents)),
            clock,
        }
    }

    /// Default roster with metrics drawn from `rng`.
    pub fn with_rng<R: Rng>(rng: &mut R, clock: Arc<dyn Clock>) -> Self {
        let agents = default_agents(rng, clock.now());
        info!(count = agents.len(), "Initialized agent registry");
        Self::from_agents(agents, clock)
    }

    /// Default roster with reproducible metrics.
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(&mut StdRng::seed_from_u64(seed), clock)
    }

    pub async fn get(&self, id: &str) -> Option<AgentDescriptor> {
        self.agents.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<AgentDescriptor> {
        self.agents.read().await.values().cloned().collect()
    }

    pub async fn by_category(&self, category: AgentCategory) -> Vec<AgentDescriptor> {
        self.agents
            .read()
            .await
            .values()
            .filter(|a| a.category == category)
            .cloned()
            .collect()
    }

    /// Add or replace an agent.
    pub async fn register(&self, agent: AgentDescriptor) {
        info!(agent_id = %agent.id, category = %agent.category, "Registered agent");
        self.agents.write().await.insert(agent.id.clone(), agent);
    }

    /// Merge `update` into an agent's performance and refresh its last activity.
    pub async fn update_performance(
        &self,
        id: &str,
        update: PerformanceUpdate,
    ) -> CollectResult<AgentDescriptor> {
        if let Some(rate) = update.success_rate.filter(|r| !r.is_finite()) {
            return Err(CollectError::invalid_field(
                id,
                "successRate",
                format!("expected a finite number, got {rate}"),
            ));
        }

        let mut agents = self.agents.write().await;
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| CollectError::AgentNotFound(id.to_string()))?;

        let perf = &mut agent.performance;
        if let Some(rate) = update.success_rate {
            perf.success_rate = rate.clamp(0.0, 1.0);
        }
        if let Some(ms) = update.avg_response_ms {
            perf.avg_response_ms = ms;
        }
        if let Some(done) = update.tasks_completed {
            perf.tasks_completed = done;
        }
        perf.last_activity = self.clock.now();

        debug!(agent_id = %id, "Updated agent performance");
        Ok(agent.clone())
    }

    pub async fn set_status(&self, id: &str, status: AgentStatus) -> CollectResult<AgentDescriptor> {
        let mut agents = self.agents.write().await;
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| CollectError::AgentNotFound(id.to_string()))?;
        agent.status = status;
        agent.performance.last_activity = self.clock.now();
        info!(agent_id = %id, status = ?status, "Agent status changed");
        Ok(agent.clone())
    }

    /// Hand a task of `category` to the active agent with the best success rate.
    ///
    /// Selection and the `tasks_completed` increment happen under one write
    /// guard. Ties go to the smallest id. Returns `None` when no active agent
    /// of the category exists.
    pub async fn assign_task(&self, category: AgentCategory) -> Option<AgentDescriptor> {
        let mut agents = self.agents.write().await;

        let best_id = agents
            .values()
            .filter(|a| a.category == category && a.is_active())
            .fold(None::<&AgentDescriptor>, |best, a| match best {
                Some(b) if b.performance.success_rate >= a.performance.success_rate => Some(b),
                _ => Some(a),
            })
            .map(|a| a.id.clone());

        let Some(id) = best_id else {
            warn!(category = %category, "No active agent available for task");
            return None;
        };

        let agent = agents.get_mut(&id)?;
        agent.performance.tasks_completed = agent.performance.tasks_completed.saturating_add(1);
        agent.performance.last_activity = self.clock.now();
        info!(
            agent_id = %agent.id,
            category = %category,
            tasks_completed = agent.performance.tasks_completed,
            "Assigned task"
        );
        Some(agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use collectiq_core::{AgentPerformance, FixedClock};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap()))
    }

    fn agent(id: &str, category: AgentCategory, rate: f64) -> AgentDescriptor {
        AgentDescriptor::new(
            id,
            id,
            category,
            AgentPerformance {
                success_rate: rate,
                avg_response_ms: 250,
                tasks_completed: 10,
                last_activity: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            },
        )
    }

    #[tokio::test]
    async fn test_seeded_registry_has_default_roster() {
        let registry = AgentRegistry::seeded(5, clock());
        assert_eq!(registry.list().await.len(), 6);
        assert!(registry.get("compliance-monitor").await.is_some());
        assert!(registry.get("nope").await.is_none());
        assert_eq!(registry.by_category(AgentCategory::Negotiation).await.len(), 1);
    }

    #[tokio::test]
    async fn test_same_seed_same_metrics() {
        let a = AgentRegistry::seeded(77, clock()).list().await;
        let b = AgentRegistry::seeded(77, clock()).list().await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_assign_picks_highest_active_success_rate() {
        let registry = AgentRegistry::from_agents(
            vec![
                agent("a", AgentCategory::Scheduling, 0.80),
                agent("b", AgentCategory::Scheduling, 0.95),
                agent("c", AgentCategory::Scheduling, 0.99),
                agent("d", AgentCategory::Compliance, 1.00),
            ],
            clock(),
        );
        registry.set_status("c", AgentStatus::Inactive).await.unwrap();

        let assigned = registry.assign_task(AgentCategory::Scheduling).await.unwrap();
        assert_eq!(assigned.id, "b");
        assert_eq!(assigned.performance.tasks_completed, 11);
        assert_eq!(registry.get("b").await.unwrap().performance.tasks_completed, 11);
        assert_eq!(registry.get("a").await.unwrap().performance.tasks_completed, 10);
    }

    #[tokio::test]
    async fn test_assign_without_active_agents_returns_none() {
        let registry = AgentRegistry::from_agents(
            vec![agent("a", AgentCategory::Sentiment, 0.9)],
            clock(),
        );
        assert!(registry.assign_task(AgentCategory::Analytics).await.is_none());

        registry.set_status("a", AgentStatus::Error).await.unwrap();
        assert!(registry.assign_task(AgentCategory::Sentiment).await.is_none());
    }

    #[tokio::test]
    async fn test_ties_go_to_smallest_id() {
        let registry = AgentRegistry::from_agents(
            vec![
                agent("zeta", AgentCategory::Analytics, 0.9),
                agent("alpha", AgentCategory::Analytics, 0.9),
            ],
            clock(),
        );
        let assigned = registry.assign_task(AgentCategory::Analytics).await.unwrap();
        assert_eq!(assigned.id, "alpha");
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_activity() {
        let registry =
            AgentRegistry::from_agents(vec![agent("a", AgentCategory::Sentiment, 0.9)], clock());
        let updated = registry
            .update_performance(
                "a",
                PerformanceUpdate {
                    avg_response_ms: Some(120),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.performance.avg_response_ms, 120);
        assert_eq!(updated.performance.success_rate, 0.9);
        assert_eq!(updated.performance.last_activity, clock().now());

        let missing = registry
            .update_performance("ghost", PerformanceUpdate::default())
            .await;
        assert!(matches!(missing, Err(CollectError::AgentNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_saturates_task_counter() {
        let registry =
            AgentRegistry::from_agents(vec![agent("a", AgentCategory::Sentiment, 0.9)], clock());
        registry
            .update_performance(
                "a",
                PerformanceUpdate {
                    tasks_completed: Some(u64::MAX),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let assigned = registry.assign_task(AgentCategory::Sentiment).await.unwrap();
        assert_eq!(assigned.performance.tasks_completed, u64::MAX);
    }

    #[tokio::test]
    async fn test_update_rejects_non_finite_success_rate() {
        let registry =
            AgentRegistry::from_agents(vec![agent("a", AgentCategory::Sentiment, 0.9)], clock());
        for rate in [f64::NAN, f64::INFINITY] {
            let result = registry
                .update_performance(
                    "a",
                    PerformanceUpdate {
                        success_rate: Some(rate),
                        ..Default::default()
                    },
                )
                .await;
            assert!(matches!(result, Err(CollectError::InvalidField { .. })));
        }
        assert_eq!(registry.get("a").await.unwrap().performance.success_rate, 0.9);

        let clamped = registry
            .update_performance(
                "a",
                PerformanceUpdate {
                    success_rate: Some(1.4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(clamped.performance.success_rate, 1.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_assignments_do_not_lose_increments() {
        let registry = AgentRegistry::from_agents(
            vec![agent("only", AgentCategory::Compliance, 0.9)],
            clock(),
        );
        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.assign_task(AgentCategory::Compliance).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(
            registry.get("only").await.unwrap().performance.tasks_completed,
            60
        );
    }
}
