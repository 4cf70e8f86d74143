//! Background auto-processing loop.
//!
//! RULE: the loop outlives any single failure. A client whose enrichment
//! or recommendation fails is logged and skipped; a pass that cannot even
//! list clients logs and yields an empty outcome. Nothing propagates.

use crate::engine::RecommendationEngine;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub struct AutoProcessor {
    engine: RecommendationEngine,
    interval: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub processed: usize,
    pub failed: usize,
}

impl AutoProcessor {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// One sequential pass over every client with a declared interest.
    pub fn run_pass(&mut self) -> PassOutcome {
        let clients = match self.engine.store().clients_with_interest() {
            Ok(clients) => clients,
            Err(e) => {
                log::warn!("auto: could not list clients: {e}");
                return PassOutcome::default();
            }
        };

        let mut outcome = PassOutcome::default();
        for client in clients {
            match self.engine.enrich_and_generate(&client) {
                Ok(()) => outcome.processed += 1,
                Err(e) => {
                    outcome.failed += 1;
                    log::warn!("client={} auto: skipped after error: {e}", client.id);
                }
            }
        }
        outcome
    }

    /// Run passes for the life of the process.
    pub fn run_forever(&mut self) -> ! {
        loop {
            let outcome = self.run_pass();
            log::info!(
                "auto: pass complete (processed={}, failed={})",
                outcome.processed,
                outcome.failed
            );
            std::thread::sleep(self.interval);
        }
    }
}
