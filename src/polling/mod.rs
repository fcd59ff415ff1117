pub mod controller;
pub mod cycle;
pub mod http;
pub mod loop_worker;
pub mod simulated;
pub mod source;

pub use controller::MonitorController;
pub use cycle::{PollCycle, PollOutcome, PollSnapshot};
pub use http::HttpHookSource;
pub use loop_worker::{poll_loop, LoopOptions, DEFAULT_FETCH_TIMEOUT, DEFAULT_POLL_INTERVAL};
pub use simulated::{SimulatedHookSource, SimulationLayout};
pub use source::{FetchError, HookSource};
