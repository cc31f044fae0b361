pub mod aggregator;
pub mod compose;
pub mod config_source;
pub mod event_watcher;
pub mod hub;
pub mod orchestrator;
pub mod refresher;
pub mod status_source;

#[cfg(test)]
pub mod testing;

pub use aggregator::Aggregator;
pub use compose::ComposeCli;
pub use event_watcher::EventWatcher;
pub use hub::SubscriptionHub;
pub use orchestrator::{ActionOutput, Orchestrator};
pub use refresher::Refresher;
