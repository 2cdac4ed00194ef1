use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use collectiq_agents::AgentRegistry;
use collectiq_core::{
    calls_for_debt, AgentCategory, CallRecord, CollectError, DebtRecord, PerformanceUpdate,
};
use collectiq_infra::UiStateStore;
use collectiq_logging::{AuditEvent, EventLogger};
use collectiq_predict::PredictionEngine;
use collectiq_scoring::{calculate_priority_score, categorize_debts, PriorityTier};

const AUDIT_SOURCE: &str = "api";

/// Shared application state for API handlers.
pub struct AppState {
    pub registry: AgentRegistry,
    pub engine: PredictionEngine,
    pub ui_state: UiStateStore,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/debts/score", post(score_debts))
        .route("/api/debts/categorize", post(categorize))
        .route("/api/predictions/payment", post(predict_payment))
        .route("/api/predictions/settlement", post(predict_settlement))
        .route("/api/predictions/churn", post(predict_churn))
        .route("/api/predictions/contact-windows", get(contact_windows))
        .route("/api/insights", post(insights))
        .route("/api/agents", get(list_agents))
        .route("/api/agents/assign", post(assign_task))
        .route("/api/agents/:id", get(get_agent))
        .route("/api/agents/:id/performance", patch(update_performance))
        .route(
            "/api/ui-state/:key",
            get(get_ui_state).put(put_ui_state).delete(delete_ui_state),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ApiError {
    Domain(CollectError),
    BadRequest(String),
    NotFound(String),
}

impl From<CollectError> for ApiError {
    fn from(err: CollectError) -> Self {
        ApiError::Domain(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(CollectError::InvalidField { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(CollectError::AgentNotFound(_)) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Domain(CollectError::InvalidStateKey(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::BadRequest(m) | ApiError::NotFound(m) => m,
        };
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| ApiError::Domain(CollectError::Other(e.into())))
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DebtWithCalls {
    debt: DebtRecord,
    #[serde(default)]
    calls: Vec<CallRecord>,
}

impl DebtWithCalls {
    fn history(&self) -> Vec<CallRecord> {
        calls_for_debt(&self.calls, &self.debt.id).cloned().collect()
    }
}

#[derive(Deserialize)]
struct DebtOnly {
    debt: DebtRecord,
}

#[derive(Deserialize)]
struct Portfolio {
    debts: Vec<DebtRecord>,
    #[serde(default)]
    calls: Vec<CallRecord>,
}

#[derive(Deserialize)]
struct AgentsQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct AssignRequest {
    category: String,
}

fn parse_category(raw: &str) -> Result<AgentCategory, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "collectiq",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn score_debts(Json(debts): Json<Vec<DebtRecord>>) -> ApiResult {
    let scores = debts
        .iter()
        .map(|debt| {
            let score = calculate_priority_score(debt)?;
            Ok(json!({
                "id": debt.id,
                "score": score,
                "tier": PriorityTier::from_score(score),
            }))
        })
        .collect::<Result<Vec<_>, CollectError>>()?;
    Ok(Json(json!({ "scores": scores })))
}

async fn categorize(Json(debts): Json<Vec<DebtRecord>>) -> ApiResult {
    let buckets = categorize_debts(&debts)?;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::ScoreBatch {
            debts: buckets.len(),
            critical: buckets.critical.len(),
        },
    );
    to_json(&buckets)
}

async fn predict_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DebtWithCalls>,
) -> ApiResult {
    let prediction = state.engine.payment_likelihood(&req.debt, &req.history())?;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::PredictionIssued {
            kind: "payment".into(),
            debt_id: prediction.debt_id.clone(),
            summary: format!("probability={:.2}", prediction.probability),
        },
    );
    to_json(&prediction)
}

async fn predict_settlement(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DebtOnly>,
) -> ApiResult {
    let prediction = state.engine.settlement(&req.debt)?;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::PredictionIssued {
            kind: "settlement".into(),
            debt_id: prediction.debt_id.clone(),
            summary: format!("discount={}%", prediction.recommended_discount_pct),
        },
    );
    to_json(&prediction)
}

async fn predict_churn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DebtWithCalls>,
) -> ApiResult {
    let prediction = state.engine.churn_risk(&req.debt, &req.history())?;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::PredictionIssued {
            kind: "churn".into(),
            debt_id: prediction.debt_id.clone(),
            summary: format!("risk={:.2}", prediction.risk_score),
        },
    );
    to_json(&prediction)
}

async fn contact_windows(State(state): State<Arc<AppState>>) -> ApiResult {
    let windows = state.engine.contact_windows();
    Ok(Json(json!({ "windows": windows })))
}

async fn insights(State(state): State<Arc<AppState>>, Json(req): Json<Portfolio>) -> ApiResult {
    let insights = state.engine.insights(&req.debts, &req.calls);
    for insight in &insights {
        EventLogger::log_event(
            AUDIT_SOURCE,
            AuditEvent::InsightRaised {
                category: insight.category.as_str().to_string(),
                title: insight.title.clone(),
            },
        );
    }
    Ok(Json(json!({ "insights": insights })))
}

async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgentsQuery>,
) -> ApiResult {
    let agents = match query.category.as_deref() {
        Some(raw) => state.registry.by_category(parse_category(raw)?).await,
        None => state.registry.list().await,
    };
    Ok(Json(json!({ "agents": agents })))
}

async fn get_agent(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    let agent = state
        .registry
        .get(&id)
        .await
        .ok_or(CollectError::AgentNotFound(id))?;
    to_json(&agent)
}

async fn update_performance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<PerformanceUpdate>,
) -> ApiResult {
    let agent = state.registry.update_performance(&id, update).await?;
    to_json(&agent)
}

async fn assign_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignRequest>,
) -> ApiResult {
    let category = parse_category(&req.category)?;
    let assigned = state.registry.assign_task(category).await;
    EventLogger::log_event(
        AUDIT_SOURCE,
        AuditEvent::TaskAssigned {
            category: category.to_string(),
            agent_id: assigned.as_ref().map(|a| a.id.clone()),
        },
    );
    match assigned {
        Some(agent) => to_json(&agent),
        None => Err(ApiError::NotFound(format!(
            "no active agent for category '{category}'"
        ))),
    }
}

async fn get_ui_state(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> ApiResult {
    match state.ui_state.get_raw(&key).await? {
        Some(value) => Ok(Json(value)),
        None => Err(ApiError::NotFound(format!("no UI state saved under '{key}'"))),
    }
}

async fn put_ui_state(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> ApiResult {
    state.ui_state.put_raw(&key, &value).await?;
    Ok(Json(json!({ "status": "saved", "key": key })))
}

async fn delete_ui_state(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult {
    let removed = state.ui_state.remove(&key).await?;
    Ok(Json(json!({ "removed": removed, "key": key })))
}
