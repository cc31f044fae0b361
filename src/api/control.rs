use actix_web::{web, HttpResponse};
use log::info;

use crate::error::ActionInvocationFailed;
use crate::services::ActionOutput;
use crate::state::AppState;

fn plain_text(output: ActionOutput) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(output.text)
}

/// Starts a service. Answers 200 with the tool output whenever the command
/// ran, even if it failed.
pub async fn up_service(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionInvocationFailed> {
    let name = path.into_inner();
    let output = data
        .orchestrator
        .start(&name)
        .await
        .map_err(|source| ActionInvocationFailed {
            action: "up",
            service: name.clone(),
            source,
        })?;
    info!("▶️  up {} (success: {})", name, output.success);
    Ok(plain_text(output))
}

/// Stops a service, same contract as [`up_service`].
pub async fn kill_service(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionInvocationFailed> {
    let name = path.into_inner();
    let output = data
        .orchestrator
        .kill(&name)
        .await
        .map_err(|source| ActionInvocationFailed {
            action: "kill",
            service: name.clone(),
            source,
        })?;
    info!("⏹️  kill {} (success: {})", name, output.success);
    Ok(plain_text(output))
}
