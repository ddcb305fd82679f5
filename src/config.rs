//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the event side of the runtime.
//!
//! Config is used in two ways:
//! 1. **Runtime creation**: `Runtime::new(config, subscribers)`
//! 2. **Hook filtering**: `events::install(bus, &config)` captures the reporting flags
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus

use std::time::Duration;

/// Global configuration for the reactive runtime.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `report_protocol_violations`: Publish `ProtocolViolation` events
/// - `report_undeliverable`: Publish `Undeliverable` events
/// - `drain_timeout`: Upper bound for draining subscriber queues on shutdown (`0s` = don't wait)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Whether a source handing out a second lifecycle handle is reported.
    pub report_protocol_violations: bool,

    /// Whether failures arriving after cancellation or termination are reported.
    pub report_undeliverable: bool,

    /// Maximum time `Runtime::shutdown` waits for subscriber workers to drain.
    ///
    /// - `Duration::ZERO` = abort workers immediately
    pub drain_timeout: Duration,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the drain timeout as an `Option`.
    ///
    /// - `None` → don't wait for subscriber workers
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn drain_limit(&self) -> Option<Duration> {
        if self.drain_timeout == Duration::ZERO {
            None
        } else {
            Some(self.drain_timeout)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024` (good baseline)
    /// - `report_protocol_violations = true`
    /// - `report_undeliverable = true`
    /// - `drain_timeout = 5s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            report_protocol_violations: true,
            report_undeliverable: true,
            drain_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_map_to_options() {
        let mut cfg = Config::default();
        assert_eq!(cfg.drain_limit(), Some(Duration::from_secs(5)));

        cfg.drain_timeout = Duration::ZERO;
        cfg.bus_capacity = 0;
        assert_eq!(cfg.drain_limit(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
