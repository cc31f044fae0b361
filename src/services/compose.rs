use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::io::BufReader;
use tokio::process::Command;

use crate::error::ToolError;
use crate::metrics::METRICS;
use crate::services::orchestrator::{ActionOutput, EventFeed, Orchestrator};

/// `--` keeps a service name such as `--remove-orphans` from being parsed
/// as a flag.
fn service_action_args<'a>(action: &[&'a str], service: &'a str) -> Vec<&'a str> {
    let mut args = action.to_vec();
    args.push("--");
    args.push(service);
    args
}

/// `docker compose` driven through its CLI.
#[derive(Debug, Clone)]
pub struct ComposeCli {
    program: String,
    project_dir: Option<PathBuf>,
}

impl ComposeCli {
    pub fn new(program: impl Into<String>, project_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            project_dir,
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("compose").args(args);
        if let Some(dir) = &self.project_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} compose {}", self.program, args.join(" "))
    }

    async fn output(&self, args: &[&str]) -> Result<Output, ToolError> {
        let command = self.describe(args);
        info!("$ {}", command);
        METRICS
            .tool_invocations
            .with_label_values(&[args.first().copied().unwrap_or_default()])
            .inc();

        self.command(args)
            .output()
            .await
            .map_err(|source| ToolError::Launch { command, source })
    }

    /// Runs a query; a non-zero exit is a failure.
    async fn query(&self, args: &[&str]) -> Result<String, ToolError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(ToolError::Failed {
                command: self.describe(args),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs an action; the exit status is reported, never raised.
    async fn action(&self, args: &[&str]) -> Result<ActionOutput, ToolError> {
        let output = self.output(args).await?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!("{} -> {}", self.describe(args), output.status);

        Ok(ActionOutput {
            success: output.status.success(),
            text,
        })
    }
}

#[async_trait]
impl Orchestrator for ComposeCli {
    async fn validate(&self) -> Result<(), ToolError> {
        self.query(&["config", "--quiet"]).await.map(|_| ())
    }

    async fn declared_config(&self) -> Result<String, ToolError> {
        self.query(&["config", "--format", "json"]).await
    }

    async fn live_status(&self) -> Result<String, ToolError> {
        self.query(&["ps", "--all", "--format", "json"]).await
    }

    async fn start(&self, service: &str) -> Result<ActionOutput, ToolError> {
        self.action(&service_action_args(&["up", "-d"], service)).await
    }

    async fn kill(&self, service: &str) -> Result<ActionOutput, ToolError> {
        self.action(&service_action_args(&["kill"], service)).await
    }

    async fn events(&self) -> Result<EventFeed, ToolError> {
        let args = ["events", "--json"];
        let command = self.describe(&args);
        info!("$ {}", command);
        METRICS.tool_invocations.with_label_values(&["events"]).inc();

        let mut child = self
            .command(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Launch {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| ToolError::Launch {
            command,
            source: std::io::Error::other("stdout was not captured"),
        })?;

        Ok(EventFeed::with_child(BufReader::new(stdout), child))
    }
}
