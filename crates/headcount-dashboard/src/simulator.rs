//! Synthetic entry/exit generator.
//!
//! Stands in for the door sensor that writes to the store in production.
//! Each step records one entry or exit; exits from an empty room are
//! dropped by the store.

use std::sync::Arc;
use std::time::Duration;

use headcount_core::Clock;
use headcount_core::config::SimulatorConfig;
use headcount_store::{MemoryStore, StoreError};
use headcount_types::{EventKind, HistoryEntry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::DashboardError;

/// Seeded random writer of entry and exit events.
pub struct Simulator {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    entry_probability: f64,
    interval: Duration,
}

impl Simulator {
    /// Validate `config` and build a simulator writing into `store`.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Simulator`] if the interval is zero or the
    /// probability is outside `0.0..=1.0`.
    pub fn new(
        store: Arc<MemoryStore>,
        clock: Arc<dyn Clock>,
        config: &SimulatorConfig,
    ) -> Result<Self, DashboardError> {
        if config.interval_ms == 0 {
            return Err(DashboardError::Simulator {
                message: String::from("interval_ms must be positive"),
            });
        }
        if !(0.0..=1.0).contains(&config.entry_probability) {
            return Err(DashboardError::Simulator {
                message: format!(
                    "entry_probability must be within 0.0..=1.0, got {}",
                    config.entry_probability
                ),
            });
        }
        Ok(Self {
            store,
            clock,
            rng: StdRng::seed_from_u64(config.seed),
            entry_probability: config.entry_probability,
            interval: Duration::from_millis(config.interval_ms),
        })
    }

    /// Record one random event.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn step(&mut self) -> Result<Option<HistoryEntry>, StoreError> {
        let kind = if self.rng.random_bool(self.entry_probability) {
            EventKind::Entry
        } else {
            EventKind::Exit
        };
        self.store.record(kind, self.clock.now_millis())
    }

    /// Step on every interval tick until `shutdown` fires.
    pub fn spawn(mut self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval = ?self.interval, "simulator started");
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match self.step() {
                    Ok(Some(entry)) => {
                        debug!(kind = %entry.kind, count = entry.count, "simulated event");
                    }
                    Ok(None) => debug!("simulated exit skipped, room empty"),
                    Err(error) => warn!(error = %error, "simulated event not recorded"),
                }
            }
            info!("simulator stopped");
        })
    }
}
