pub mod control;
pub mod events;
pub mod metrics;
pub mod static_files;
pub mod status;

pub use control::{kill_service, up_service};
pub use events::events_ws;
pub use metrics::get_metrics;
pub use static_files::serve_asset;
pub use status::{get_service_status, get_status, list_services};

use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpResponse, Responder};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

/// Registers every route. `/api` responses allow any origin so a frontend
/// served elsewhere can talk to the dashboard.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .route("/status", web::get().to(get_status))
            .route("/status/{name}", web::get().to(get_service_status))
            .route("/list", web::get().to(list_services))
            .route("/up/{name}", web::get().to(up_service))
            .route("/up/{name}", web::post().to(up_service))
            .route("/kill/{name}", web::get().to(kill_service))
            .route("/kill/{name}", web::post().to(kill_service))
            .route("/events-ws", web::get().to(events_ws)),
    )
    .route("/metrics", web::get().to(get_metrics))
    .route("/health", web::get().to(health))
    .default_service(web::to(serve_asset));
}


#[cfg(test)]
mod tests {
    use super::test_support::state_with;
    use super::*;
    use crate::services::testing::FakeOrchestrator;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_health_and_metrics() {
        let (state, _, _) = state_with(FakeOrchestrator::new());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("dashboard_"));
    }

    #[actix_rt::test]
    async fn test_unknown_path_is_empty_404() {
        let (state, _, _) = state_with(FakeOrchestrator::new());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        for uri in ["/nope.css", "/api/unknown"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
            assert!(test::read_body(resp).await.is_empty());
        }
    }

    #[actix_rt::test]
    async fn test_api_allows_any_origin() {
        let (state, _, _) = state_with(FakeOrchestrator::new());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/status").to_request()).await;
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
