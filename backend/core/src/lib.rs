pub mod agent;
pub mod call;
pub mod error;
pub mod traits;
pub mod types;

pub use agent::{AgentCategory, AgentDescriptor, AgentPerformance, AgentStatus, PerformanceUpdate};
pub use call::{calls_for_debt, CallOutcome, CallRecord};
pub use error::{CollectError, CollectResult};
pub use traits::{Clock, FixedClock, SystemClock};
pub use types::{
    ComplianceInfo, DebtRecord, DebtStatus, PaymentPlan, PlanFrequency, PlanStatus,
};
