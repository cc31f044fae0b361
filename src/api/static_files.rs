use actix_web::{web, HttpRequest, HttpResponse};

use crate::state::AppState;

/// Fallback for every unrouted request.
pub async fn serve_asset(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    match data.assets.get(req.path()) {
        Some(asset) => HttpResponse::Ok()
            .content_type(asset.content_type)
            .body(asset.content.clone()),
        None => HttpResponse::NotFound().finish(),
    }
}
