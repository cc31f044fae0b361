use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Labels, ServiceConfig, ServiceStatus};

/// One service as exposed to clients: declared config joined with live status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub labels: Labels,
    pub status: ServiceStatus,
}

impl ServiceView {
    pub fn new(config: ServiceConfig, status: ServiceStatus) -> Self {
        Self {
            name: config.name,
            labels: config.labels,
            status,
        }
    }
}

/// A consistent view of every visible service, keyed by name.
pub type Snapshot = BTreeMap<String, ServiceView>;
