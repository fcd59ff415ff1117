//! Random telemetry for demos and tests.
//!
//! Produces the nested port document the data generator writes, with tensions
//! drawn around the generator's reference mean/spread.

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::Mutex;

use super::source::{FetchError, HookSource};

const MEAN_TENSION: f64 = 6.0;
const STDEV_TENSION: f64 = 5.0;
const MAX_TENSION: f64 = 98.0;
const LINE_TYPES: [&str; 4] = ["HEAD", "BREAST", "SPRING", "STERN"];

#[derive(Debug, Clone)]
pub struct SimulationLayout {
    pub port_name: String,
    pub berths: usize,
    pub bollards_per_berth: usize,
    pub hooks_per_bollard: usize,
    /// Probability that a healthy hook is idle and reports `null` tension
    pub offline_probability: f64,
    /// Probability that a hook is faulted, which also nulls its tension
    pub fault_probability: f64,
}

impl Default for SimulationLayout {
    fn default() -> Self {
        Self {
            port_name: "Fremantle".into(),
            berths: 2,
            bollards_per_berth: 4,
            hooks_per_bollard: 3,
            offline_probability: 0.05,
            fault_probability: 0.02,
        }
    }
}

pub struct SimulatedHookSource {
    layout: SimulationLayout,
    rng: Mutex<StdRng>,
}

impl SimulatedHookSource {
    pub fn new(layout: SimulationLayout, seed: u64) -> Self {
        Self {
            layout,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy(layout: SimulationLayout) -> Self {
        Self {
            layout,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn generate(&self) -> Value {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let layout = &self.layout;

        let berths: Vec<Value> = (0..layout.berths)
            .map(|b| {
                let bollards: Vec<Value> = (0..layout.bollards_per_berth)
                    .map(|i| {
                        let bollard_number = b * layout.bollards_per_berth + i + 1;
                        let line = LINE_TYPES[rng.gen_range(0..LINE_TYPES.len())];
                        let hooks: Vec<Value> = (0..layout.hooks_per_bollard)
                            .map(|h| {
                                let number = i * layout.hooks_per_bollard + h + 1;
                                simulated_hook(&mut *rng, layout, number, line)
                            })
                            .collect();
                        json!({ "name": format!("BOL{bollard_number:03}"), "hooks": hooks })
                    })
                    .collect();
                json!({
                    "name": format!("Berth {}", berth_letter(b)),
                    "bollards": bollards,
                })
            })
            .collect();

        json!({ "name": layout.port_name, "berths": berths })
    }
}

/// A faulted or offline hook carries neither tension nor a line; only an
/// active hook reports both.
fn simulated_hook(rng: &mut impl Rng, layout: &SimulationLayout, number: usize, line: &str) -> Value {
    let faulted = rng.gen_bool(layout.fault_probability);
    let active = !faulted && !rng.gen_bool(layout.offline_probability);

    let (tension, attached_line) = if active {
        (json!(sample_tension(rng).round()), json!(line))
    } else {
        (Value::Null, Value::Null)
    };

    json!({
        "name": format!("Hook {number}"),
        "tension": tension,
        "faulted": faulted,
        "attachedLine": attached_line,
    })
}

fn berth_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Approximately normal sample (Irwin-Hall, 12 uniforms), clamped to the
/// generator's valid range.
fn sample_tension(rng: &mut impl Rng) -> f64 {
    let standard: f64 = (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0;
    (MEAN_TENSION + standard * STDEV_TENSION).clamp(0.0, MAX_TENSION)
}

#[async_trait]
impl HookSource for SimulatedHookSource {
    async fn fetch(&self) -> Result<Value, FetchError> {
        Ok(self.generate())
    }

    fn describe(&self) -> String {
        format!("simulated port {}", self.layout.port_name)
    }
}
