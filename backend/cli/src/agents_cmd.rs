//! CLI Agents Subcommands
//!
//! Inspect the agent roster and hand out tasks by category.

use anyhow::{anyhow, Result};
use clap::Subcommand;
use collectiq_agents::AgentRegistry;
use collectiq_core::{AgentCategory, AgentDescriptor};
use collectiq_logging::{AuditEvent, EventLogger};

use crate::terminal_output::{note_success, note_warn, pct, render_table, Column};

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents, optionally only one category
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Assign a task to the best active agent of a category
    Assign { category: String },
}

fn parse_category(raw: &str) -> Result<AgentCategory> {
    raw.parse().map_err(|e: String| anyhow!(e))
}

pub fn agent_table(agents: &[AgentDescriptor]) -> String {
    let columns = [
        Column::left("Id"),
        Column::left("Category"),
        Column::left("Status"),
        Column::right("Success"),
        Column::right("Resp ms"),
        Column::right("Tasks"),
    ];
    let rows: Vec<Vec<String>> = agents
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.category.to_string(),
                format!("{:?}", a.status).to_lowercase(),
                pct(a.performance.success_rate),
                a.performance.avg_response_ms.to_string(),
                a.performance.tasks_completed.to_string(),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

pub async fn run(cmd: AgentCommands, registry: &AgentRegistry) -> Result<()> {
    match cmd {
        AgentCommands::List { category } => {
            let agents = match category.as_deref() {
                Some(raw) => registry.by_category(parse_category(raw)?).await,
                None => registry.list().await,
            };
            print!("{}", agent_table(&agents));
        }
        AgentCommands::Assign { category } => {
            let category = parse_category(&category)?;
            let assigned = registry.assign_task(category).await;
            EventLogger::log_event(
                "cli",
                AuditEvent::TaskAssigned {
                    category: category.to_string(),
                    agent_id: assigned.as_ref().map(|a| a.id.clone()),
                },
            );
            match assigned {
                Some(agent) => note_success(&format!(
                    "Assigned {category} task to {} ({} tasks completed)",
                    agent.id, agent.performance.tasks_completed
                )),
                None => note_warn(&format!("No active {category} agent available")),
            }
        }
    }
    Ok(())
}
