//! Training progress logging.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::MetricValue;

/// How much trainers report while running.
///
/// `Silent` trains quietly, `Info` reports start/finish and summary metrics,
/// `Debug` adds per-round detail. Output goes through the `log` facade; the
/// binary decides where it lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    #[default]
    Silent,
    Info,
    Debug,
}

/// Verbosity-gated logger shared by the trainers.
#[derive(Clone, Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    label: &'static str,
}

impl TrainingLogger {
    /// Create a logger for one training run.
    pub fn new(label: &'static str, verbosity: Verbosity) -> Self {
        Self { verbosity, label }
    }

    /// Announce the start of training.
    pub fn start_training(&self, n_rounds: usize) {
        if self.verbosity >= Verbosity::Info {
            info!("[{}] training {} rounds", self.label, n_rounds);
        }
    }

    /// Per-round progress.
    pub fn log_round(&self, round: usize, detail: &str) {
        if self.verbosity >= Verbosity::Debug {
            debug!("[{}] round {}: {}", self.label, round, detail);
        }
    }

    /// A summary metric (e.g. the OOB error after forest training).
    pub fn log_metric(&self, metric: &MetricValue) {
        if self.verbosity >= Verbosity::Info {
            info!("[{}] {}", self.label, metric);
        }
    }

    /// Announce completion.
    pub fn finish_training(&self) {
        if self.verbosity >= Verbosity::Info {
            info!("[{}] training finished", self.label);
        }
    }
}
