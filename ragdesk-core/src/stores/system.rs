use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;

use super::SystemApi;
use crate::adapter;
use crate::models::system::{DashboardStats, SystemStatus};
use crate::session::lock;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SystemState {
    pub status: Option<SystemStatus>,
    pub analytics: Option<DashboardStats>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Dashboard health and headline counters.
///
/// Fetch failures never propagate; they land in `error`.
pub struct SystemStore {
    api: Arc<dyn SystemApi>,
    state: Mutex<SystemState>,
}

impl SystemStore {
    pub fn new(api: Arc<dyn SystemApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SystemState::default()),
        }
    }

    pub fn snapshot(&self) -> SystemState {
        lock(&self.state).clone()
    }

    fn begin(&self) {
        let mut state = lock(&self.state);
        state.loading = true;
        state.error = None;
    }

    pub async fn fetch_status(&self) {
        self.begin();
        let result = self.api.system_status().await;
        let mut state = lock(&self.state);
        match result {
            Ok(status) => state.status = Some(status),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching status");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    pub async fn fetch_analytics(&self) {
        self.begin();
        let result = self.api.dashboard_stats().await;
        let mut state = lock(&self.state);
        match result {
            Ok(stats) => state.analytics = Some(stats),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching analytics");
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    /// Status and analytics together. If either call fails both fall back
    /// to the error-state placeholders.
    pub async fn fetch_all(&self) {
        self.begin();
        let result = tokio::try_join!(self.api.system_status(), self.api.dashboard_stats());
        let mut state = lock(&self.state);
        match result {
            Ok((status, stats)) => {
                state.status = Some(status);
                state.analytics = Some(stats);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching system data");
                state.error = Some(e.to_string());
                state.status = Some(adapter::system_status_unavailable(Utc::now()));
                state.analytics = Some(DashboardStats::default());
            }
        }
        state.loading = false;
    }
}
