//! Background AP regeneration sweep.
//!
//! Best-effort: periodically pulls AP forward for recently active
//! characters so listeners see regeneration without the player acting.
//! Correctness never depends on it; every operation refreshes AP itself.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use deadcity_logic::constants::Timestamp;

use crate::engine::Engine;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Characters in the active window with AP below max.
    pub scanned: usize,
    /// Characters whose AP moved and was saved.
    pub refreshed: usize,
    /// Skipped because an operation held their lock.
    pub busy: usize,
    pub failed: usize,
}

pub struct RegenSweep {
    engine: Arc<Engine>,
}

impl RegenSweep {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// One pass over every eligible character, in configured batches.
    pub fn run_once(&self, now: Timestamp) -> Result<SweepReport, EngineError> {
        let sweep = &self.engine.config().sweep;
        let since = now.saturating_sub(sweep.active_window_ms());
        let ids = self.engine.store().regenerating_characters(since)?;

        let mut report = SweepReport {
            scanned: ids.len(),
            ..SweepReport::default()
        };
        for (batch_no, batch) in ids.chunks(sweep.batch_size.max(1)).enumerate() {
            for &id in batch {
                match self.engine.sweep_character(id, now) {
                    None => report.busy += 1,
                    Some(Ok(true)) => report.refreshed += 1,
                    Some(Ok(false)) => {}
                    Some(Err(e)) => {
                        report.failed += 1;
                        log::warn!("Regen sweep failed for character {}: {}", id, e);
                    }
                }
            }
            log::debug!("Regen sweep batch {} done ({} characters)", batch_no, batch.len());
        }

        if report.scanned > 0 {
            log::info!(
                "Regen sweep: {} scanned, {} refreshed, {} busy, {} failed",
                report.scanned,
                report.refreshed,
                report.busy,
                report.failed
            );
        }
        Ok(report)
    }

    /// Run on a background thread every `sweep.interval_secs`.
    pub fn spawn(self) -> io::Result<SweepHandle> {
        let interval = self.engine.config().sweep.interval();
        self.spawn_every(interval)
    }

    pub fn spawn_every(self, interval: Duration) -> io::Result<SweepHandle> {
        let (stop, stop_rx) = mpsc::channel::<()>();
        let join = thread::Builder::new()
            .name("regen-sweep".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let now = self.engine.now();
                        if let Err(e) = self.run_once(now) {
                            log::warn!("Regen sweep pass failed: {}", e);
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        log::info!("Regen sweep started (every {:?})", interval);
        Ok(SweepHandle { stop, join })
    }
}

/// Stops the background sweep when asked (or dropped).
pub struct SweepHandle {
    stop: Sender<()>,
    join: JoinHandle<()>,
}

impl SweepHandle {
    pub fn stop(self) {
        let _ = self.stop.send(());
        if self.join.join().is_err() {
            log::warn!("Regen sweep thread panicked");
        }
    }
}
