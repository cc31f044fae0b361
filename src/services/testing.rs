use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::ToolError;
use crate::services::orchestrator::{ActionOutput, EventFeed, Orchestrator};

/// In-memory orchestrator for tests. Records every start/kill call.
#[derive(Default)]
pub struct FakeOrchestrator {
    config: Option<String>,
    status: Option<String>,
    events: String,
    launch_fails: bool,
    pub actions: Mutex<Vec<(String, String)>>,
}

fn failed(command: &str) -> ToolError {
    ToolError::Failed {
        command: command.to_string(),
        code: Some(1),
        stderr: "no configuration file provided: not found".to_string(),
    }
}

impl FakeOrchestrator {
    pub fn new() -> Self {
        Self {
            config: Some(r#"{"services":{}}"#.to_string()),
            status: Some(String::new()),
            ..Default::default()
        }
    }

    pub fn with_config(self, config: serde_json::Value) -> Self {
        self.with_raw_config(&config.to_string())
    }

    pub fn with_raw_config(mut self, raw: &str) -> Self {
        self.config = Some(raw.to_string());
        self
    }

    pub fn with_config_error(mut self) -> Self {
        self.config = None;
        self
    }

    pub fn with_status(mut self, raw: &str) -> Self {
        self.status = Some(raw.to_string());
        self
    }

    pub fn with_status_error(mut self) -> Self {
        self.status = None;
        self
    }

    pub fn with_events(mut self, lines: &str) -> Self {
        self.events = lines.to_string();
        self
    }

    pub fn with_launch_failure(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    fn record(&self, action: &str, service: &str) -> Result<ActionOutput, ToolError> {
        if self.launch_fails {
            return Err(ToolError::Launch {
                command: format!("docker compose {} {}", action, service),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "docker not found"),
            });
        }
        self.actions
            .lock()
            .unwrap()
            .push((action.to_string(), service.to_string()));

        if service == "missing" {
            return Ok(ActionOutput {
                success: false,
                text: "no such service: missing\n".to_string(),
            });
        }
        Ok(ActionOutput {
            success: true,
            text: format!("{} {}\n", action, service),
        })
    }
}

#[async_trait]
impl Orchestrator for FakeOrchestrator {
    async fn validate(&self) -> Result<(), ToolError> {
        self.config.as_ref().map(|_| ()).ok_or_else(|| failed("config --quiet"))
    }

    async fn declared_config(&self) -> Result<String, ToolError> {
        self.config.clone().ok_or_else(|| failed("config"))
    }

    async fn live_status(&self) -> Result<String, ToolError> {
        self.status.clone().ok_or_else(|| failed("ps"))
    }

    async fn start(&self, service: &str) -> Result<ActionOutput, ToolError> {
        self.record("up", service)
    }

    async fn kill(&self, service: &str) -> Result<ActionOutput, ToolError> {
        self.record("kill", service)
    }

    async fn events(&self) -> Result<EventFeed, ToolError> {
        let bytes = self.events.clone().into_bytes();
        Ok(EventFeed::from_reader(std::io::Cursor::new(bytes)))
    }
}
