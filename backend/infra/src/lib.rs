//! Infrastructure module for CollectIQ.
//!
//! Persists the dashboard's small UI-state blobs (session, filters) the way a
//! browser keeps them in local storage.

pub mod ui_state;

pub use ui_state::{
    DashboardFilters, DashboardPage, SessionState, UiStateStore, DASHBOARD_FILTERS_KEY,
    SESSION_STATE_KEY,
};
