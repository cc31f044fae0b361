use log::{debug, info};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::WatchError;
use crate::metrics::METRICS;
use crate::services::orchestrator::Orchestrator;

/// Actions of processes exec'd inside a container (`exec_create`,
/// `exec_start`, `exec_die`). They do not change service state.
pub const EXEC_ACTION_PREFIX: &str = "exec_";

/// One record of `docker compose events --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComposeEvent {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

pub fn is_relevant(action: &str) -> bool {
    !action.is_empty() && !action.starts_with(EXEC_ACTION_PREFIX)
}

/// Decodes a feed line, returning it only when it should trigger a refresh.
pub fn parse_event(line: &str) -> Option<ComposeEvent> {
    let event: ComposeEvent = match serde_json::from_str(line) {
        Ok(e) => e,
        Err(e) => {
            debug!("Skipping malformed event line '{}': {}", line, e);
            METRICS.events.with_label_values(&["malformed"]).inc();
            return None;
        }
    };

    if !is_relevant(&event.action) {
        METRICS.events.with_label_values(&["ignored"]).inc();
        return None;
    }
    METRICS.events.with_label_values(&["relevant"]).inc();
    Some(event)
}

/// Reads the orchestration tool's event feed and forwards relevant events.
pub struct EventWatcher {
    orchestrator: Arc<dyn Orchestrator>,
}

impl EventWatcher {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Runs until the feed ends. Returning `Ok` means the consumer went away;
    /// the feed itself ending is always an error.
    pub async fn watch(self, tx: mpsc::UnboundedSender<ComposeEvent>) -> Result<(), WatchError> {
        let mut feed = self.orchestrator.events().await.map_err(WatchError::Open)?;
        info!("👀 Watching compose events");

        loop {
            let line = match feed.next_line().await.map_err(WatchError::Read)? {
                Some(line) => line,
                None => return Err(WatchError::Closed),
            };
            if line.trim().is_empty() {
                continue;
            }

            let Some(event) = parse_event(&line) else {
                continue;
            };
            debug!(
                "Event '{}' on {} {} ({})",
                event.action,
                event.kind.as_deref().unwrap_or("?"),
                event.service.as_deref().unwrap_or("?"),
                event.id.as_deref().unwrap_or("-")
            );
            if tx.send(event).is_err() {
                info!("Event consumer stopped, watcher exiting");
                return Ok(());
            }
        }
    }
}
