//! Telemetry and structured logging components for CollectIQ.
//!
//! Handles subscriber setup, PII redaction, and audit event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AuditEvent, AuditLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
