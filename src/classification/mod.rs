pub mod classifier;
pub mod config;
pub mod status;

pub use classifier::{classify, classify_percent, classify_tension, tension_band, TensionBand};
pub use config::ClassifierConfig;
pub use status::HookStatus;
