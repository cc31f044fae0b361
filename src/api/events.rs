use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{CloseReason, Message};
use futures_util::StreamExt;
use log::{debug, warn};

use crate::error::UpgradeRejected;
use crate::services::hub::{Subscription, SubscriptionHub};
use crate::state::AppState;

/// Upgrades to a push-only websocket that receives every broadcast snapshot.
pub async fn events_ws(
    req: HttpRequest,
    body: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, UpgradeRejected> {
    let (response, session, msg_stream) =
        actix_ws::handle(&req, body).map_err(|e| UpgradeRejected(e.to_string()))?;

    // registered before the response goes out, so nothing broadcast after the
    // upgrade can be missed
    let subscription = data.hub.register();
    let hub = data.hub.clone();
    actix_web::rt::spawn(pump(session, msg_stream, subscription, hub));

    Ok(response)
}

async fn pump(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut subscription: Subscription,
    hub: SubscriptionHub,
) {
    let id = subscription.id;
    let mut close_reason: Option<CloseReason> = None;

    loop {
        tokio::select! {
            payload = subscription.rx.recv() => {
                let Some(payload) = payload else { break };
                if session.text(payload.to_string()).await.is_err() {
                    debug!("Subscriber {} went away during send", id);
                    break;
                }
            }
            msg = msg_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Subscriber {} says: {}", id, text);
                    }
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        close_reason = reason;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Subscriber {} protocol error: {}", id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    hub.unregister(id);
    let _ = session.close(close_reason).await;
}

#[cfg(test)]
mod tests {
    use crate::api::routes;
    use crate::api::test_support::{state_with, state_with_policy};
    use crate::lifecycle::{LifecyclePolicy, ShutdownReason};
    use std::time::Duration;
    use crate::services::testing::FakeOrchestrator;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};

    #[actix_rt::test]
    async fn test_plain_get_is_rejected() {
        let (state, _, _) = state_with(FakeOrchestrator::new());
        let hub = state.hub.clone();
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/events-ws").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UPGRADE_REQUIRED);
        assert!(hub.is_empty());
    }

    fn upgrade_request() -> test::TestRequest {
        test::TestRequest::get()
            .uri("/api/events-ws")
            .insert_header(("upgrade", "websocket"))
            .insert_header(("connection", "upgrade"))
            .insert_header(("sec-websocket-version", "13"))
            .insert_header(("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ=="))
    }

    #[actix_rt::test]
    async fn test_upgrade_switches_protocols() {
        let (state, _, _) = state_with(FakeOrchestrator::new());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let resp = test::call_service(&app, upgrade_request().to_request()).await;
        assert_eq!(resp.status(), StatusCode::SWITCHING_PROTOCOLS);
    }

    #[actix_rt::test]
    async fn test_disconnect_of_last_subscriber_shuts_down_once() {
        let (state, _, mut shutdown) =
            state_with_policy(FakeOrchestrator::new(), LifecyclePolicy::new(false));
        let hub = state.hub.clone();
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let resp = test::call_service(&app, upgrade_request().to_request()).await;
        assert_eq!(resp.status(), StatusCode::SWITCHING_PROTOCOLS);
        drop(resp);

        // the session task notices the closed client stream and unregisters
        for _ in 0..100 {
            if hub.is_empty() {
                break;
            }
            actix_rt::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(hub.is_empty());
        assert_eq!(shutdown.try_recv().unwrap(), ShutdownReason::NoSubscribers);
        assert!(shutdown.try_recv().is_err());
    }
}
