use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ConfigUnavailable, SourceError};
use crate::models::{Labels, ServiceConfig};
use crate::services::orchestrator::Orchestrator;

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    services: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawService {
    #[serde(default)]
    labels: Option<RawLabels>,
}

/// Compose accepts labels either as `key=value` strings or as a mapping.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabels {
    List(Vec<String>),
    Map(BTreeMap<String, Value>),
}

impl RawLabels {
    fn into_labels(self) -> Labels {
        match self {
            RawLabels::List(entries) => parse_label_list(&entries),
            RawLabels::Map(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect(),
        }
    }
}

/// Splits each entry on its first `=`. Entries without `=` or with an empty
/// key are dropped.
pub fn parse_label_list<S: AsRef<str>>(entries: &[S]) -> Labels {
    entries
        .iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            match entry.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    Some((key.to_string(), value.to_string()))
                }
                _ => {
                    debug!("Dropping malformed label '{}'", entry);
                    None
                }
            }
        })
        .collect()
}

/// Decodes `docker compose config --format json` into visible services.
pub fn parse_config(raw: &str) -> Result<BTreeMap<String, ServiceConfig>, SourceError> {
    let project: RawProject = serde_json::from_str(raw)?;
    let mut configs = BTreeMap::new();

    for (name, value) in project.services {
        let service: RawService = match serde_json::from_value(value) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping service '{}' with unreadable declaration: {}", name, e);
                continue;
            }
        };

        let labels = service
            .labels
            .map(RawLabels::into_labels)
            .unwrap_or_default();
        let config = ServiceConfig::new(name.clone(), labels);

        if config.is_hidden() {
            debug!("Service '{}' is hidden", name);
            continue;
        }
        configs.insert(name, config);
    }

    Ok(configs)
}

/// Declared configuration of all visible services.
#[derive(Clone)]
pub struct ConfigSource {
    orchestrator: Arc<dyn Orchestrator>,
}

impl ConfigSource {
    pub fn new(orchestrator: Arc<dyn Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn fetch_config(&self) -> Result<BTreeMap<String, ServiceConfig>, ConfigUnavailable> {
        let raw = self
            .orchestrator
            .declared_config()
            .await
            .map_err(|e| ConfigUnavailable(e.into()))?;
        parse_config(&raw).map_err(ConfigUnavailable)
    }
}
