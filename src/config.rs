use std::time::Duration;

use crate::error::{Error, Result};

/// Period used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Settings for a tick [`Producer`](crate::producer::Producer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickConfig {
    /// Delay between two ticks, and before the first one.
    pub interval: Duration,
    /// Counter value passed with the first tick.
    pub initial: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            initial: 0,
        }
    }
}

impl TickConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_initial(mut self, initial: u64) -> Self {
        self.initial = initial;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::ZeroInterval);
        }

        Ok(())
    }
}
