pub mod models;
pub mod normalize;
pub mod payload;

pub use models::{HookIdentity, HookReading, Rate, TensionSample};
pub use normalize::normalize_reading;
pub use payload::{decode_payload, PayloadError};
