//! # Process-wide event hook.
//!
//! Sources, operators and guards run synchronously on whatever thread drives
//! them and hold no reference to a runtime object. They report through this
//! hook: whichever [`Bus`] is installed receives the event; with nothing
//! installed, reporting is a no-op.
//!
//! ## Rules
//! - At most one bus is installed at a time; installing replaces (and returns) the previous one.
//! - [`Config`](crate::Config) flags captured at install time filter what is published.
//! - Reporting never blocks beyond a read lock on the hook and a broadcast send.

use std::sync::{PoisonError, RwLock};

use super::bus::Bus;
use super::event::{Event, EventKind};
use crate::config::Config;
use crate::error::{DisposeError, ScheduleError, StreamError};

struct Hook {
    bus: Bus,
    report_protocol_violations: bool,
    report_undeliverable: bool,
}

static HOOK: RwLock<Option<Hook>> = RwLock::new(None);

/// Installs `bus` as the destination of core events, filtered by `cfg`.
///
/// Returns the previously installed bus, if any.
pub fn install(bus: Bus, cfg: &Config) -> Option<Bus> {
    let hook = Hook {
        bus,
        report_protocol_violations: cfg.report_protocol_violations,
        report_undeliverable: cfg.report_undeliverable,
    };
    let mut slot = HOOK.write().unwrap_or_else(PoisonError::into_inner);
    slot.replace(hook).map(|old| old.bus)
}

/// Removes the installed bus and returns it.
pub fn uninstall() -> Option<Bus> {
    let mut slot = HOOK.write().unwrap_or_else(PoisonError::into_inner);
    slot.take().map(|old| old.bus)
}

/// Removes the installed bus only if it is `bus`; returns whether it was.
pub fn uninstall_if(bus: &Bus) -> bool {
    let mut slot = HOOK.write().unwrap_or_else(PoisonError::into_inner);
    if slot.as_ref().is_some_and(|hook| hook.bus.same_channel(bus)) {
        slot.take();
        true
    } else {
        false
    }
}

/// Returns `true` if a bus is installed.
pub fn is_installed() -> bool {
    HOOK.read().unwrap_or_else(PoisonError::into_inner).is_some()
}

/// Returns `true` if the installed bus is `bus`.
pub fn is_current(bus: &Bus) -> bool {
    HOOK.read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|hook| hook.bus.same_channel(bus))
}

/// Publishes `ev` on the installed bus, honoring the configured filters.
pub fn emit(ev: Event) {
    let slot = HOOK.read().unwrap_or_else(PoisonError::into_inner);
    let Some(hook) = slot.as_ref() else {
        return;
    };
    let allowed = match ev.kind {
        EventKind::ProtocolViolation => hook.report_protocol_violations,
        EventKind::Undeliverable => hook.report_undeliverable,
        _ => true,
    };
    if allowed {
        hook.bus.publish(ev);
    }
}

/// Reports a second handshake recovered by a guard.
pub(crate) fn protocol_violation(operator: &'static str) {
    emit(Event::protocol_violation(operator));
}

/// Reports a failure that could not be delivered downstream.
pub(crate) fn undeliverable(operator: &'static str, err: &StreamError) {
    emit(Event::undeliverable(operator, err));
}

/// Reports a release failure with no caller to return it to.
pub(crate) fn dispose_failed(operator: &'static str, err: &DisposeError) {
    emit(Event::dispose_failed(operator, err));
}

/// Reports work a scheduler refused to run.
pub(crate) fn schedule_rejected(scheduler: &'static str, err: &ScheduleError) {
    emit(Event::schedule_rejected(scheduler, err));
}
