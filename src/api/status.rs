use actix_web::{web, HttpResponse};

use crate::error::AggregationFailed;
use crate::state::AppState;

/// Current snapshot, always recomputed.
pub async fn get_status(data: web::Data<AppState>) -> Result<HttpResponse, AggregationFailed> {
    let snapshot = data.aggregator.build_snapshot().await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// One service out of a fresh snapshot. Hidden and undeclared services are 404.
pub async fn get_service_status(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AggregationFailed> {
    let name = path.into_inner();
    let mut snapshot = data.aggregator.build_snapshot().await?;

    match snapshot.remove(&name) {
        Some(view) => Ok(HttpResponse::Ok().json(view)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "status": "error",
            "message": format!("Service '{}' not found", name)
        }))),
    }
}

/// Names of the visible declared services.
pub async fn list_services(data: web::Data<AppState>) -> Result<HttpResponse, AggregationFailed> {
    let config = data.aggregator.config_source().fetch_config().await?;
    let names: Vec<String> = config.into_keys().collect();
    Ok(HttpResponse::Ok().json(names))
}
