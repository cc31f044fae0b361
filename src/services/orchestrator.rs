use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::process::Child;

use crate::error::ToolError;

/// Captured result of a start/kill invocation. The command ran; whether the
/// service reached the wanted state is for the caller to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutput {
    pub success: bool,
    /// stdout followed by stderr
    pub text: String,
}

type FeedReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Line-delimited event feed. Holds the producing child process, if any, so
/// the process lives exactly as long as the feed.
pub struct EventFeed {
    lines: Lines<FeedReader>,
    _child: Option<Child>,
}

impl EventFeed {
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            lines: (Box::new(reader) as FeedReader).lines(),
            _child: None,
        }
    }

    pub fn with_child<R>(reader: R, child: Child) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            _child: Some(child),
            ..Self::from_reader(reader)
        }
    }

    /// Next raw line, `None` once the feed has ended.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

/// The service-management primitives the dashboard is built on.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Checks that the working directory holds a usable project.
    async fn validate(&self) -> Result<(), ToolError>;

    /// Raw declared configuration (JSON document).
    async fn declared_config(&self) -> Result<String, ToolError>;

    /// Raw live status report (JSON array or one object per line).
    async fn live_status(&self) -> Result<String, ToolError>;

    async fn start(&self, service: &str) -> Result<ActionOutput, ToolError>;

    async fn kill(&self, service: &str) -> Result<ActionOutput, ToolError>;

    async fn events(&self) -> Result<EventFeed, ToolError>;
}
