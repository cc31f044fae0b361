use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{SourceError, StatusUnavailable};
use crate::models::{CreatedAt, Health, ServiceState, ServiceStatus};
use crate::services::orchestrator::Orchestrator;

/// One record of `docker compose ps --format json`.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatus {
    service: String,
    #[serde(default)]
    state: Option<ServiceState>,
    #[serde(default)]
    health: Option<Health>,
    #[serde(default)]
    exit_code: Option<i32>,
    #[serde(default)]
    created_at: Option<CreatedAt>,
    #[serde(default)]
    running_for: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RawStatus {
    fn into_entry(self) -> (String, ServiceStatus) {
        let status = ServiceStatus {
            state: self.state.unwrap_or(ServiceState::Unknown),
            health: self.health,
            exit_code: self.exit_code,
            created_at: self.created_at,
            running_for: self.running_for,
            status: self.status,
        };
        (self.service, status)
    }
}

/// Decodes the status report. Older tool versions print a JSON array, newer
/// ones print one object per line; both are accepted.
pub fn parse_status(raw: &str) -> Result<BTreeMap<String, ServiceStatus>, SourceError> {
    let trimmed = raw.trim();
    let mut statuses = BTreeMap::new();

    if trimmed.is_empty() {
        return Ok(statuses);
    }

    if trimmed.starts_with('[') {
        let records: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        for record in records {
            match serde_json::from_value::<RawStatus>(record) {
                Ok(r) => {
                    let (name, status) = r.into_entry();
                    statuses.insert(name, status);
                }
                Err(e) => debug!("Dropping status record: {}", e),
            }
        }
        return Ok(statuses);
    }

    let mut seen = 0usize;
    for line in trimmed.lines().map(str::trim).filter(|l| !l.is_empty()) {
        seen += 1;
        match serde_json::from_str::<RawStatus>(line) {
            Ok(r) => {
                let (name, status) = r.into_entry();
                statuses.insert(name, status);
            }
            Err(e) => debug!("Dropping status line '{}': {}", line, e),
        }
    }

    if seen > 0 && statuses.is_empty() {
        return Err(SourceError::Malformed(format!(
            "none of {} status lines could be decoded",
            seen
        )));
    }
    Ok(statuses)
}

/// Live runtime status of every service the tool knows about.
#[derive(Clone)]
pub struct StatusSource {
    orchestrator: Arc<dyn Orchestrator>,
}

impl StatusSource {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn fetch_status(&self) -> Result<BTreeMap<String, ServiceStatus>, StatusUnavailable> {
        let raw = self
            .orchestrator
            .live_status()
            .await
            .map_err(|e| StatusUnavailable(e.into()))?;
        parse_status(&raw).map_err(StatusUnavailable)
    }
}
