pub mod engine;
pub mod state;

pub use engine::{DebounceEngine, DEFAULT_EVICT_AFTER_MISSED_CYCLES, DEFAULT_THRESHOLD};
pub use state::{transition, DebounceState};
