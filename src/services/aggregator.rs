use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AggregationFailed;
use crate::metrics::METRICS;
use crate::models::{ServiceConfig, ServiceStatus, ServiceView, Snapshot};
use crate::services::config_source::ConfigSource;
use crate::services::orchestrator::Orchestrator;
use crate::services::status_source::StatusSource;

/// Joins config and status on service name. Config decides which services
/// exist; a configured service without status gets the unknown sentinel.
pub fn merge(
    config: BTreeMap<String, ServiceConfig>,
    mut status: BTreeMap<String, ServiceStatus>,
) -> Snapshot {
    config
        .into_iter()
        .map(|(name, cfg)| {
            let st = status.remove(&name).unwrap_or_else(ServiceStatus::unknown);
            (name, ServiceView::new(cfg, st))
        })
        .collect()
}

/// Builds snapshots on demand. Cheap to clone; calls may overlap.
#[derive(Clone)]
pub struct Aggregator {
    config: ConfigSource,
    status: StatusSource,
}

impl Aggregator {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self {
            config: ConfigSource::new(orchestrator.clone()),
            status: StatusSource::new(orchestrator),
        }
    }

    pub fn config_source(&self) -> &ConfigSource {
        &self.config
    }

    /// All-or-nothing: either both sources answer or no snapshot is produced.
    pub async fn build_snapshot(&self) -> Result<Snapshot, AggregationFailed> {
        let (config, status) =
            tokio::join!(self.config.fetch_config(), self.status.fetch_status());

        let result = match (config, status) {
            (Ok(config), Ok(status)) => Ok(merge(config, status)),
            (Err(e), _) => Err(AggregationFailed::from(e)),
            (_, Err(e)) => Err(AggregationFailed::from(e)),
        };

        match &result {
            Ok(snapshot) => {
                debug!("Built snapshot of {} services", snapshot.len());
                METRICS.snapshots.with_label_values(&["ok"]).inc();
            }
            Err(e) => {
                warn!("Snapshot failed: {}", e);
                METRICS.snapshots.with_label_values(&["error"]).inc();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Health, Labels, ServiceState};
    use crate::services::testing::FakeOrchestrator;
    use serde_json::json;

    fn cfg(name: &str, labels: &[(&str, &str)]) -> (String, ServiceConfig) {
        let labels: Labels = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        (name.to_string(), ServiceConfig::new(name, labels))
    }

    fn running(name: &str) -> (String, ServiceStatus) {
        let status = ServiceStatus {
            state: ServiceState::Running,
            ..ServiceStatus::unknown()
        };
        (name.to_string(), status)
    }

    #[test]
    fn test_every_configured_service_appears_once() {
        let config: BTreeMap<_, _> = vec![cfg("a", &[]), cfg("b", &[]), cfg("c", &[])]
            .into_iter()
            .collect();
        let status: BTreeMap<_, _> = vec![running("a"), running("zombie")].into_iter().collect();

        let snapshot = merge(config, status);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(snapshot["a"].status.state, ServiceState::Running);
        assert_eq!(snapshot["b"].status, ServiceStatus::unknown());
        assert!(!snapshot.contains_key("zombie"));
    }

    #[actix_rt::test]
    async fn test_hidden_service_never_in_snapshot() {
        let fake = FakeOrchestrator::new()
            .with_config(json!({
                "services": {
                    "web": {},
                    "db": { "labels": ["dashboard.hide=true"] }
                }
            }))
            .with_status(
                r#"{"Service":"web","State":"running","Health":"healthy"}
{"Service":"db","State":"running","Health":"healthy"}"#,
            );
        let snapshot = Aggregator::new(Arc::new(fake)).build_snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 1);
        let web = &snapshot["web"];
        assert!(web.labels.is_empty());
        assert_eq!(web.status.state, ServiceState::Running);
        assert_eq!(web.status.health, Some(Health::Healthy));

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "web": {
                    "name": "web",
                    "labels": {},
                    "status": { "State": "running", "Health": "healthy" }
                }
            })
        );
    }

    #[actix_rt::test]
    async fn test_empty_status_gives_unknown() {
        let fake = FakeOrchestrator::new()
            .with_config(json!({ "services": { "cache": {} } }))
            .with_status("");
        let snapshot = Aggregator::new(Arc::new(fake)).build_snapshot().await.unwrap();

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "cache": { "name": "cache", "labels": {}, "status": { "State": "unknown" } }
            })
        );
    }

    #[actix_rt::test]
    async fn test_source_failure_fails_whole_snapshot() {
        let fake = FakeOrchestrator::new()
            .with_config(json!({ "services": { "cache": {} } }))
            .with_status_error();
        let err = Aggregator::new(Arc::new(fake)).build_snapshot().await.unwrap_err();
        assert!(matches!(err, AggregationFailed::Status(_)));

        let fake = FakeOrchestrator::new().with_raw_config("{ broken").with_status("");
        let err = Aggregator::new(Arc::new(fake)).build_snapshot().await.unwrap_err();
        assert!(matches!(err, AggregationFailed::Config(_)));
    }
}
