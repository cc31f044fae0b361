use std::sync::Arc;

use crate::assets::AssetStore;
use crate::lifecycle::{LifecyclePolicy, ShutdownSender};
use crate::services::{Aggregator, Orchestrator, SubscriptionHub};

/// Everything the request handlers need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<dyn Orchestrator>,
    pub aggregator: Aggregator,
    pub hub: SubscriptionHub,
    pub assets: Arc<AssetStore>,
}

pub fn new_state(
    orchestrator: Arc<dyn Orchestrator>,
    assets: AssetStore,
    policy: LifecyclePolicy,
    shutdown: ShutdownSender,
) -> AppState {
    AppState {
        aggregator: Aggregator::new(orchestrator.clone()),
        hub: SubscriptionHub::new(policy, shutdown),
        orchestrator,
        assets: Arc::new(assets),
    }
}
