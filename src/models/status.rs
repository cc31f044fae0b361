use serde::{Deserialize, Serialize};

/// Container lifecycle state as reported by `docker compose ps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    #[serde(rename = "not created")]
    NotCreated,
    Created,
    Running,
    Restarting,
    Removing,
    Paused,
    Exited,
    Dead,
    #[serde(other)]
    Unknown,
}

/// Healthcheck result. The tool reports an empty string when the service has
/// no healthcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Starting,
    Healthy,
    Unhealthy,
    #[serde(rename = "", other)]
    None,
}

/// Creation time, kept in whichever form the tool emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Unix(i64),
    Text(String),
}

/// Live status of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceStatus {
    pub state: ServiceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    /// Only meaningful when `state` is `Exited`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CreatedAt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ServiceStatus {
    /// Placeholder for a configured service the tool reported nothing about.
    pub fn unknown() -> Self {
        Self {
            state: ServiceState::Unknown,
            health: None,
            exit_code: None,
            created_at: None,
            running_for: None,
            status: None,
        }
    }
}
