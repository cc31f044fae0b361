use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_gauge_with_registry, Counter, CounterVec, Encoder, Gauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,

    pub subscribers: Gauge,
    pub broadcasts: Counter,
    /// Event lines by outcome: relevant, ignored, malformed
    pub events: CounterVec,
    /// Snapshot builds by outcome: ok, error
    pub snapshots: CounterVec,
    /// Tool invocations by compose subcommand
    pub tool_invocations: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("dashboard".to_string()), None)
            .expect("valid metrics prefix");

        let subscribers = register_gauge_with_registry!(
            Opts::new("subscribers", "Currently connected websocket subscribers"),
            registry
        )
        .expect("register subscribers");

        let broadcasts = register_counter_with_registry!(
            Opts::new("broadcasts_total", "Snapshots pushed to subscribers"),
            registry
        )
        .expect("register broadcasts_total");

        let events = register_counter_vec_with_registry!(
            Opts::new("events_total", "Compose event lines read from the feed"),
            &["outcome"],
            registry
        )
        .expect("register events_total");

        let snapshots = register_counter_vec_with_registry!(
            Opts::new("snapshots_total", "Snapshot aggregations"),
            &["outcome"],
            registry
        )
        .expect("register snapshots_total");

        let tool_invocations = register_counter_vec_with_registry!(
            Opts::new("tool_invocations_total", "docker compose invocations"),
            &["command"],
            registry
        )
        .expect("register tool_invocations_total");

        #[cfg(target_os = "linux")]
        {
            let pc = prometheus::process_collector::ProcessCollector::for_self();
            if let Err(e) = registry.register(Box::new(pc)) {
                log::warn!("Process metrics unavailable: {}", e);
            }
        }

        Self {
            registry,
            subscribers,
            broadcasts,
            events,
            snapshots,
            tool_invocations,
        }
    }

    pub fn render(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    pub static ref METRICS: Arc<MetricsRegistry> = Arc::new(MetricsRegistry::new());
}
