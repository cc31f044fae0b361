use log::{debug, error, info};
use tokio::sync::mpsc;

use crate::services::aggregator::Aggregator;
use crate::services::event_watcher::ComposeEvent;
use crate::services::hub::SubscriptionHub;

/// Consumes watcher events and pushes a fresh snapshot for each one.
pub struct Refresher {
    aggregator: Aggregator,
    hub: SubscriptionHub,
}

impl Refresher {
    pub fn new(aggregator: Aggregator, hub: SubscriptionHub) -> Self {
        Self { aggregator, hub }
    }

    /// Handles one event. Returns the number of subscribers reached.
    pub async fn refresh(&self, event: &ComposeEvent) -> usize {
        if self.hub.is_empty() {
            debug!("No subscribers, skipping refresh for '{}'", event.action);
            return 0;
        }

        // failures are already logged by the aggregator; clients keep their
        // last good snapshot
        let Ok(snapshot) = self.aggregator.build_snapshot().await else {
            return 0;
        };
        match self.hub.broadcast(&snapshot) {
            Ok(n) => n,
            Err(e) => {
                error!("Failed to encode snapshot: {}", e);
                0
            }
        }
    }

    /// Events that queued up while a refresh was running are folded into one
    /// refresh; the snapshot reflects all of them anyway.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<ComposeEvent>) {
        while let Some(mut event) = rx.recv().await {
            let mut skipped = 0usize;
            while let Ok(next) = rx.try_recv() {
                event = next;
                skipped += 1;
            }
            if skipped > 0 {
                debug!("Coalesced {} queued events into '{}'", skipped, event.action);
            }
            self.refresh(&event).await;
        }
        info!("Event channel closed, refresher exiting");
    }
}
