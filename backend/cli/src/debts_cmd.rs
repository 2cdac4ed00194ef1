//! One-shot scoring and prediction commands over JSON input files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use collectiq_core::{calls_for_debt, CallRecord, DebtRecord};
use collectiq_logging::{AuditEvent, EventLogger};
use collectiq_predict::{ContactWindow, Insight, PredictionEngine};
use collectiq_scoring::{calculate_priority_score, categorize_debts, PriorityBuckets, PriorityTier};

use crate::input::{find_debt, read_calls, read_debts};
use crate::terminal_output::{
    money, note_info, note_success, pct, render_table, risk_label, tier_label, Column,
};

const AUDIT_SOURCE: &str = "cli";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PredictionKind {
    Payment,
    Settlement,
    Churn,
}

#[derive(Args)]
pub struct PredictArgs {
    #[arg(value_enum)]
    pub kind: PredictionKind,
    /// JSON array of debt records
    #[arg(long)]
    pub debts: PathBuf,
    #[arg(long)]
    pub debt_id: String,
    /// JSON array of call records
    #[arg(long)]
    pub calls: Option<PathBuf>,
}

pub async fn score(debts: PathBuf) -> Result<()> {
    let debts = read_debts(&debts).await?;
    let rows = debts
        .iter()
        .map(|debt| {
            let score = calculate_priority_score(debt)?;
            Ok(vec![
                debt.id.clone(),
                money(debt.amount, &debt.currency),
                debt.days_overdue.to_string(),
                format!("{score:.2}"),
                tier_label(PriorityTier::from_score(score)),
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    let columns = [
        Column::left("Debt"),
        Column::right("Amount"),
        Column::right("Days"),
        Column::right("Score"),
        Column::left("Tier"),
    ];
    print!("{}", render_table(&columns, &rows));
    Ok(())
}

pub fn buckets_table(buckets: &PriorityBuckets) -> String {
    let columns = [
        Column::left("Tier"),
        Column::left("Debt"),
        Column::right("Score"),
    ];
    let rows: Vec<Vec<String>> = buckets
        .iter()
        .map(|debt| {
            let score = debt.priority_score.unwrap_or_default();
            vec![
                tier_label(PriorityTier::from_score(score)),
                debt.id.clone(),
                format!("{score:.2}"),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

pub async fn categorize(debts: PathBuf) -> Result<()> {
    let debts = read_debts(&debts).await?;
    let buckets = categorize_debts(&debts)?;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::ScoreBatch {
            debts: buckets.len(),
            critical: buckets.critical.len(),
        },
    );
    print!("{}", buckets_table(&buckets));
    note_info(&format!(
        "{} critical, {} high, {} medium, {} low",
        buckets.critical.len(),
        buckets.high.len(),
        buckets.medium.len(),
        buckets.low.len()
    ));
    Ok(())
}

pub async fn predict(args: PredictArgs, engine: &PredictionEngine) -> Result<()> {
    let debts = read_debts(&args.debts).await?;
    let calls = read_calls(args.calls.as_deref()).await?;
    let debt = find_debt(&debts, &args.debt_id)?;
    let history: Vec<CallRecord> = calls_for_debt(&calls, &debt.id).cloned().collect();

    let summary = match args.kind {
        PredictionKind::Payment => print_payment(engine, debt, &history)?,
        PredictionKind::Settlement => print_settlement(engine, debt)?,
        PredictionKind::Churn => print_churn(engine, debt, &history)?,
    };
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::PredictionIssued {
            kind: format!("{:?}", args.kind).to_lowercase(),
            debt_id: debt.id.clone(),
            summary,
        },
    );
    Ok(())
}

fn print_payment(
    engine: &PredictionEngine,
    debt: &DebtRecord,
    history: &[CallRecord],
) -> Result<String> {
    let p = engine.payment_likelihood(debt, history)?;
    let rows: Vec<Vec<String>> = p
        .factors
        .iter()
        .map(|f| vec![f.name.clone(), format!("{:+.2}", f.impact), f.value.clone()])
        .collect();
    print!(
        "{}",
        render_table(
            &[Column::left("Factor"), Column::right("Impact"), Column::left("Value")],
            &rows
        )
    );
    note_success(&format!(
        "Payment probability {} (confidence {}, {:?})",
        pct(p.probability),
        pct(p.confidence),
        p.timeframe
    ));
    note_info(&p.recommended_action);
    Ok(format!("probability={:.2}", p.probability))
}

fn print_settlement(engine: &PredictionEngine, debt: &DebtRecord) -> Result<String> {
    let s = engine.settlement(debt)?;
    note_success(&format!(
        "Offer {}% off: settle for {} (acceptance {})",
        s.recommended_discount_pct,
        money(s.settlement_amount, &debt.currency),
        pct(s.acceptance_probability)
    ));
    for reason in &s.reasoning {
        println!("  - {reason}");
    }
    Ok(format!("discount={}%", s.recommended_discount_pct))
}

fn print_churn(
    engine: &PredictionEngine,
    debt: &DebtRecord,
    history: &[CallRecord],
) -> Result<String> {
    let c = engine.churn_risk(debt, history)?;
    note_success(&format!(
        "Churn risk {} ({:.2}), expected by {}",
        risk_label(c.risk_level),
        c.risk_score,
        c.predicted_churn_date.format("%Y-%m-%d")
    ));
    for action in &c.preventive_actions {
        println!("  - {action}");
    }
    Ok(format!("risk={:.2}", c.risk_score))
}

pub fn windows_table(windows: &[ContactWindow]) -> String {
    let rows: Vec<Vec<String>> = windows
        .iter()
        .map(|w| {
            vec![
                w.weekday.to_string(),
                format!("{:02}:00", w.hour),
                pct(w.success_probability),
            ]
        })
        .collect();
    render_table(
        &[Column::left("Day"), Column::right("Hour"), Column::right("Success")],
        &rows,
    )
}

pub fn contact_windows(engine: &PredictionEngine) {
    print!("{}", windows_table(&engine.contact_windows()));
}

fn print_insight(insight: &Insight) {
    let marker = if insight.action_required { "!" } else { "-" };
    println!(
        "{marker} [{}] {} ({:?} impact, confidence {})",
        insight.category.as_str(),
        insight.title,
        insight.impact,
        pct(insight.confidence)
    );
    println!("    {}", insight.description);
    for action in &insight.recommended_actions {
        println!("    > {action}");
    }
}

pub async fn insights(
    debts: PathBuf,
    calls: Option<PathBuf>,
    engine: &PredictionEngine,
) -> Result<()> {
    let debts = read_debts(&debts).await?;
    let calls = read_calls(calls.as_deref()).await?;
    let insights = engine.insights(&debts, &calls);
    if insights.is_empty() {
        note_info("No insights for this portfolio");
        return Ok(());
    }
    for insight in &insights {
        EventLogger::log_event(
            AUDIT_SOURCE,
            AuditEvent::InsightRaised {
                category: insight.category.as_str().to_string(),
                title: insight.title.clone(),
            },
        );
        print_insight(insight);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_output::strip_ansi;
    use chrono::{TimeZone, Utc};
    use collectiq_core::FixedClock;
    use std::sync::Arc;

    #[test]
    fn test_buckets_table_orders_tiers() {
        let debts = vec![
            DebtRecord::new("small", 500.0),
            DebtRecord::new("big", 5000.0)
                .with_days_overdue(60)
                .with_broken_promises(2),
        ];
        let buckets = categorize_debts(&debts).unwrap();
        let table = strip_ansi(&buckets_table(&buckets));
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].contains("critical") && lines[2].contains("big"));
        assert!(lines[3].contains("low") && lines[3].contains("small"));
    }

    #[test]
    fn test_windows_table_has_ten_rows() {
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()));
        let engine = PredictionEngine::seeded(1, clock);
        let table = windows_table(&engine.contact_windows());
        assert_eq!(strip_ansi(&table).lines().count(), 12);
        assert!(table.contains("10:00"));
    }
}
