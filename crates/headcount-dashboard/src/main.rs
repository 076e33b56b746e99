//! Headcount dashboard binary.
//!
//! Wires the in-memory store, the ingestion simulator, both sync
//! controllers and the HTTP + `WebSocket` surface, then forwards user
//! commands to the controllers until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `headcount-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the store and start the simulator
//! 4. Attach both controllers to the broadcasting view and load them
//! 5. Start the HTTP server
//! 6. Run the command loop
//! 7. Detach the controllers and stop background tasks

mod error;
mod simulator;

use std::path::Path;
use std::sync::Arc;

use headcount_core::{
    Clock, CounterSyncController, CounterView, DashboardConfig, HistorySyncController,
    HistoryView, SystemClock,
};
use headcount_observer::{AppState, BroadcastView, DashboardCommand, ServerConfig};
use headcount_store::MemoryStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::DashboardError;
use crate::simulator::Simulator;

const CONFIG_PATH: &str = "headcount-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the simulator, or the server fails
/// to start.
#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // 1. Load configuration.
    let config = DashboardConfig::load_or_default(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        host = %config.server.host,
        port = config.server.port,
        simulator = config.simulator.enabled,
        "headcount-dashboard starting"
    );

    let shutdown = CancellationToken::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 3. Store and simulator.
    let store = Arc::new(MemoryStore::new());
    let simulator = if config.simulator.enabled {
        let sim = Simulator::new(Arc::clone(&store), Arc::clone(&clock), &config.simulator)?;
        Some(sim.spawn(shutdown.clone()))
    } else {
        info!("Simulator disabled");
        None
    };

    // 4. Controllers.
    let (app_state, commands) = AppState::new();
    let app_state = Arc::new(app_state);
    let view = Arc::new(BroadcastView::new(Arc::clone(&app_state)));
    let (mut counter, mut history) = start_controllers(&store, &clock, &view);
    info!("Controllers attached and loaded");

    // 5. HTTP server.
    let server = headcount_observer::spawn_observer(
        &ServerConfig::from(&config.server),
        Arc::clone(&app_state),
        shutdown.clone(),
    )
    .await?;

    // 6. Command loop.
    run_commands(commands, &counter, &history).await?;

    // 7. Shutdown.
    info!("Shutting down");
    counter.detach();
    history.detach();
    shutdown.cancel();
    if let Some(handle) = simulator {
        let _ = handle.await;
    }
    let _ = server.await;

    info!("headcount-dashboard shutdown complete");
    Ok(())
}

/// Attach both controllers to `view` and open their feeds.
fn start_controllers(
    store: &Arc<MemoryStore>,
    clock: &Arc<dyn Clock>,
    view: &Arc<BroadcastView>,
) -> (
    CounterSyncController<MemoryStore>,
    HistorySyncController<MemoryStore>,
) {
    let counter_view: Arc<dyn CounterView> = Arc::<BroadcastView>::clone(view);
    let history_view: Arc<dyn HistoryView> = Arc::<BroadcastView>::clone(view);

    let mut counter = CounterSyncController::with_clock(Arc::clone(store), Arc::clone(clock));
    counter.attach(counter_view);
    counter.load();

    let mut history = HistorySyncController::with_clock(Arc::clone(store), Arc::clone(clock));
    history.attach(history_view);
    history.load();

    (counter, history)
}

/// Forward queued commands to the controllers until `Ctrl-C`.
async fn run_commands(
    mut commands: mpsc::UnboundedReceiver<DashboardCommand>,
    counter: &CounterSyncController<MemoryStore>,
    history: &HistorySyncController<MemoryStore>,
) -> Result<(), DashboardError> {
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
            command = commands.recv() => {
                match command {
                    Some(DashboardCommand::ClearHistory) => {
                        info!("Clear history requested");
                        history.clear_history();
                    }
                    Some(DashboardCommand::OpenActivityLog) => {
                        counter.on_view_activity_log_clicked();
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}
