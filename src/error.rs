use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Failure to run the orchestration tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Failure to obtain one of the two aggregation inputs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("unparsable tool output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected tool output: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
#[error("declared configuration unavailable: {0}")]
pub struct ConfigUnavailable(#[source] pub SourceError);

#[derive(Debug, Error)]
#[error("live status unavailable: {0}")]
pub struct StatusUnavailable(#[source] pub SourceError);

/// A snapshot could not be built. Never carries a partial snapshot.
#[derive(Debug, Error)]
pub enum AggregationFailed {
    #[error(transparent)]
    Config(#[from] ConfigUnavailable),

    #[error(transparent)]
    Status(#[from] StatusUnavailable),
}

/// The start/kill command itself could not be launched. A command that ran
/// and exited non-zero is not an error.
#[derive(Debug, Error)]
#[error("could not run `{action}` for service '{service}': {source}")]
pub struct ActionInvocationFailed {
    pub action: &'static str,
    pub service: String,
    #[source]
    pub source: ToolError,
}

#[derive(Debug, Error)]
#[error("websocket upgrade rejected: {0}")]
pub struct UpgradeRejected(pub String);

/// The event feed stopped. Fatal for the process.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("could not open event feed: {0}")]
    Open(#[source] ToolError),

    #[error("event feed read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("event feed closed")]
    Closed,
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "status": "error",
        "message": message
    }))
}

impl ResponseError for AggregationFailed {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for ActionInvocationFailed {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

impl ResponseError for UpgradeRejected {
    fn status_code(&self) -> StatusCode {
        StatusCode::UPGRADE_REQUIRED
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}
