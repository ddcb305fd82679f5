//! # Runtime events emitted by the reactive core.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Core events**: things the stream core recovered from locally and must not
//!   swallow silently (protocol violations, undeliverable failures, failed releases,
//!   work a scheduler refused)
//! - **Subscriber events**: problems in the event fan-out itself (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as the timestamp, the
//! operator that raised it and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use pushflow::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ProtocolViolation)
//!     .with_operator("concat_with_single")
//!     .with_reason("second handle");
//!
//! assert_eq!(ev.kind, EventKind::ProtocolViolation);
//! assert_eq!(ev.operator.as_deref(), Some("concat_with_single"));
//! assert_eq!(ev.reason.as_deref(), Some("second handle"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::error::{DisposeError, ScheduleError, StreamError};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Core events ===
    /// A source handed a second lifecycle handle to the same consumer.
    ///
    /// Sets:
    /// - `operator`: consumer that detected the violation
    /// - `reason`: short description
    ProtocolViolation,

    /// A failure arrived after the consumer was cancelled or terminated.
    ///
    /// Sets:
    /// - `operator`: operator that dropped the failure
    /// - `reason`: the failure message
    Undeliverable,

    /// A release failed on a path with no caller to return the error to.
    ///
    /// Sets:
    /// - `operator`: operator performing the release
    /// - `reason`: the dispose error message
    DisposeFailed,

    /// A scheduler refused work; the work never ran.
    ///
    /// Sets:
    /// - `operator`: scheduler kind
    /// - `reason`: the schedule error message
    ScheduleRejected,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `operator`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `operator`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::ProtocolViolation => "protocol_violation",
            EventKind::Undeliverable => "undeliverable",
            EventKind::DisposeFailed => "dispose_failed",
            EventKind::ScheduleRejected => "schedule_rejected",
            EventKind::SubscriberPanicked => "subscriber_panicked",
            EventKind::SubscriberOverflow => "subscriber_overflow",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Operator or subscriber that raised the event.
    pub operator: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            operator: None,
            reason: None,
        }
    }

    /// Attaches the name of the raising operator.
    #[inline]
    pub fn with_operator(mut self, operator: impl Into<Arc<str>>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a protocol violation event.
    #[inline]
    pub fn protocol_violation(operator: &'static str) -> Self {
        Event::new(EventKind::ProtocolViolation)
            .with_operator(operator)
            .with_reason("lifecycle handle already set; extra handle disposed")
    }

    /// Creates an undeliverable failure event.
    #[inline]
    pub fn undeliverable(operator: &'static str, err: &StreamError) -> Self {
        Event::new(EventKind::Undeliverable)
            .with_operator(operator)
            .with_reason(err.to_string())
    }

    /// Creates a failed release event.
    #[inline]
    pub fn dispose_failed(operator: &'static str, err: &DisposeError) -> Self {
        Event::new(EventKind::DisposeFailed)
            .with_operator(operator)
            .with_reason(err.as_message())
    }

    /// Creates a rejected-work event.
    #[inline]
    pub fn schedule_rejected(scheduler: &'static str, err: &ScheduleError) -> Self {
        Event::new(EventKind::ScheduleRejected)
            .with_operator(scheduler)
            .with_reason(err.to_string())
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_operator(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_operator(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::Undeliverable);
        let b = Event::new(EventKind::Undeliverable);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn constructors_fill_metadata() {
        let ev = Event::undeliverable("take", &StreamError::msg("late"));
        assert_eq!(ev.kind, EventKind::Undeliverable);
        assert_eq!(ev.operator.as_deref(), Some("take"));
        assert_eq!(ev.reason.as_deref(), Some("late"));

        let overflow = Event::subscriber_overflow("audit", "full");
        assert!(overflow.is_subscriber_overflow());
        assert_eq!(overflow.operator.as_deref(), Some("audit"));
        assert_eq!(overflow.reason.as_deref(), Some("full"));
    }

    #[test]
    fn schedule_rejection_carries_io_message() {
        let err = ScheduleError::Spawn {
            scheduler: "workers".into(),
            source: std::io::Error::other("out of threads"),
        };
        let ev = Event::schedule_rejected("thread_scheduler", &err);

        assert_eq!(ev.kind.as_label(), "schedule_rejected");
        assert_eq!(ev.operator.as_deref(), Some("thread_scheduler"));
        let reason = ev.reason.as_deref().unwrap_or_default();
        assert!(reason.contains("out of threads"), "{reason}");
    }
}
