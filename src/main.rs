use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;

mod api;
mod assets;
mod cli;
mod error;
mod lifecycle;
mod metrics;
mod models;
mod services;
mod state;

use assets::AssetStore;
use cli::CommandArgs;
use lifecycle::{shutdown_channel, LifecyclePolicy, ShutdownReason};
use services::{ComposeCli, EventWatcher, Orchestrator, Refresher};
use state::new_state;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();
    let bind_address = format!("{}:{}", args.address, args.port);

    let orchestrator: Arc<dyn Orchestrator> = Arc::new(ComposeCli::new(
        args.docker.clone(),
        args.project_directory.clone(),
    ));

    // fail early when not started from a compose project
    orchestrator
        .validate()
        .await
        .context("no usable docker compose project here")?;

    let assets = AssetStore::load_dir(&args.assets)
        .with_context(|| format!("failed to read assets from {}", args.assets.display()))?;

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let state = new_state(
        orchestrator.clone(),
        assets,
        LifecyclePolicy::new(args.keep_alive),
        shutdown_tx.clone(),
    );

    // exactly one watcher per process; losing the feed ends the process
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let watcher = EventWatcher::new(orchestrator);
    actix_web::rt::spawn(async move {
        if let Err(e) = watcher.watch(event_tx).await {
            log::error!("❌ {}", e);
            let _ = shutdown_tx.send(ShutdownReason::EventFeedLost(e.to_string()));
        }
    });
    actix_web::rt::spawn(Refresher::new(state.aggregator.clone(), state.hub.clone()).run(event_rx));

    print_banner(&args);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run();

    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        result = server.as_mut() => {
            result?;
            Ok(())
        }
        reason = shutdown_rx.recv() => {
            handle.stop(true).await;
            server.as_mut().await?;

            match reason {
                Some(ShutdownReason::EventFeedLost(msg)) => {
                    Err(anyhow::anyhow!("compose event feed lost: {}", msg))
                }
                Some(ShutdownReason::NoSubscribers) => {
                    log::info!("👋 No dashboard open anymore, bye");
                    Ok(())
                }
                None => Ok(()),
            }
        }
    }
}

fn print_banner(args: &CommandArgs) {
    let project = args
        .project_directory
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Compose Dashboard v{:<34}║", env!("CARGO_PKG_VERSION"));
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("📁 Project: {}", project);
    println!("🚀 Dashboard running at http://{}:{}/", args.address, args.port);
    println!();
    println!("📋 Available endpoints:");
    println!("  GET       /api/status        - Services with config and status");
    println!("  GET       /api/status/{{name}} - One service");
    println!("  GET       /api/list          - Declared service names");
    println!("  GET|POST  /api/up/{{name}}     - Start a service");
    println!("  GET|POST  /api/kill/{{name}}   - Kill a service");
    println!("  GET       /api/events-ws     - Live snapshot websocket");
    println!("  GET       /metrics           - Prometheus metrics");
    println!("  GET       /health            - Health check");
    println!();
    if args.keep_alive {
        println!("💡 Keep-alive on: the server stays up with no dashboard open");
    } else {
        println!("💡 The server exits when the last dashboard tab closes (--keep-alive to stay up)");
    }
    println!("═══════════════════════════════════════════════════════════");
}
