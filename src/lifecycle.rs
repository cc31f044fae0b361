use tokio::sync::mpsc;

/// Why the process is shutting itself down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The last subscriber left and the keep-alive flag is unset.
    NoSubscribers,
    /// The event feed ended or failed.
    EventFeedLost(String),
}

pub type ShutdownSender = mpsc::UnboundedSender<ShutdownReason>;
pub type ShutdownReceiver = mpsc::UnboundedReceiver<ShutdownReason>;

pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    mpsc::unbounded_channel()
}

/// Process lifetime policy. By default the dashboard lives only while at
/// least one browser is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecyclePolicy {
    pub keep_running_without_subscribers: bool,
}

impl LifecyclePolicy {
    pub fn new(keep_running_without_subscribers: bool) -> Self {
        Self {
            keep_running_without_subscribers,
        }
    }

    pub fn terminates_when_empty(&self) -> bool {
        !self.keep_running_without_subscribers
    }
}
