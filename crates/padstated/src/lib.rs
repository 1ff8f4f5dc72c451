pub mod app;
pub mod logging;

pub use app::{build_registry, format_event, run, DaemonError};
