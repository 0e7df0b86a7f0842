//! Crossover signal configuration.

use serde::{Deserialize, Serialize};

use crate::domain::CrossoverParams;
use crate::domain::signal::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};

/// Moving-average windows for the crossover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Short SMA window in trading days.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Long SMA window in trading days.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl SignalConfig {
    /// Crossover parameters for the signal calculator.
    #[must_use]
    pub const fn params(&self) -> CrossoverParams {
        CrossoverParams {
            short_window: self.short_window,
            long_window: self.long_window,
        }
    }
}

const fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

const fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}
