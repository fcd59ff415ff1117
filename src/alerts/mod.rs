pub mod sink;
pub mod trigger;

pub use sink::{AlertSink, BellAlertSink, LogAlertSink};
pub use trigger::{AlertEvent, AlertTrigger};
