pub mod aggregation;
pub mod alerts;
pub mod classification;
pub mod debounce;
pub mod polling;
pub mod presenter;
pub mod readings;
pub mod settings;
mod utils;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use alerts::{AlertSink, BellAlertSink, LogAlertSink};
use debounce::DebounceEngine;
use polling::{
    HookSource, HttpHookSource, MonitorController, PollCycle, SimulatedHookSource,
    SimulationLayout,
};
use presenter::Presenter;
use settings::{MonitorSettings, DEFAULT_SETTINGS_PATH};

fn build_source(settings: &MonitorSettings) -> Result<Arc<dyn HookSource>> {
    if settings.simulate {
        return Ok(Arc::new(SimulatedHookSource::from_entropy(
            SimulationLayout::default(),
        )));
    }
    Ok(Arc::new(HttpHookSource::new(&settings.endpoint)?))
}

fn build_cycle(settings: &MonitorSettings) -> PollCycle {
    let mut sinks: Vec<Box<dyn AlertSink>> = vec![Box::new(LogAlertSink)];
    if settings.audible_alerts {
        sinks.push(Box::new(BellAlertSink));
    }

    PollCycle::new(
        settings.classifier.clone(),
        DebounceEngine::new(settings.debounce_threshold, settings.evict_after_missed_cycles),
        sinks,
    )
}

/// Run the monitor until Ctrl-C.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Mooring monitor starting up...");

    let settings_path = std::env::var("MOORING_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings =
        MonitorSettings::load(&settings_path)?.with_env_overrides(|key| std::env::var(key).ok());

    let source = build_source(&settings)?;
    let cycle = build_cycle(&settings);

    let mut controller = MonitorController::new();
    let mut outcomes = controller
        .start(source, cycle, settings.loop_options())
        .await?;
    let mut presenter = Presenter::new(settings.summary_every_cycles, settings.snapshot_path.clone());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            maybe_outcome = outcomes.recv() => {
                let Some(outcome) = maybe_outcome else {
                    log::warn!("poll loop ended unexpectedly");
                    break;
                };
                if let Err(err) = presenter.present(&outcome).await {
                    log::error!("failed to present cycle {}: {err:?}", outcome.cycle());
                }
            }
            _ = &mut shutdown => {
                log::info!("Ctrl-C received, stopping monitor");
                break;
            }
        }
    }

    controller.stop().await
}
