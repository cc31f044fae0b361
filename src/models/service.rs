use serde::Serialize;
use std::collections::BTreeMap;

/// Label whose presence removes a service from every snapshot.
pub const HIDE_LABEL: &str = "dashboard.hide";

pub type Labels = BTreeMap<String, String>;

/// Declared configuration of one service, rebuilt on every aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    /// Service name (unique key)
    pub name: String,
    pub labels: Labels,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, labels: Labels) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.labels.contains_key(HIDE_LABEL)
    }
}
