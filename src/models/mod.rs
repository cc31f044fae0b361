pub mod service;
pub mod status;
pub mod view;

pub use service::{Labels, ServiceConfig};
pub use status::{CreatedAt, Health, ServiceState, ServiceStatus};
pub use view::{ServiceView, Snapshot};
