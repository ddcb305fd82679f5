//! # Runtime: event wiring around the synchronous core.
//!
//! The [`Runtime`] owns the event bus, a [`SubscriberSet`] and the listener
//! task that connects them. Sources and operators never see it; they report
//! through the process-wide hook, which [`Runtime::install`] points at this
//! runtime's bus.
//!
//! ## Architecture
//! ```text
//! guards / operators / subjects
//!        │ events::emit (sync, any thread)
//!        ▼
//!   hook ──► Bus ──► listener task ──► SubscriberSet::emit(&Event)
//!                        │                 ┌─────────┬─────────┐
//!                        │                 ▼         ▼         ▼
//!                        │            [queue S1] [queue S2] ... [queue SN]
//!                        │
//!                        └── token.cancelled() → drain buffered events → set.shutdown()
//! ```
//!
//! ## Shutdown path
//! ```text
//! shutdown()
//!   └─► uninstall hook (only if it still points at this bus)
//!   └─► cancel listener token
//!   └─► wait for listener (drain + worker join), bounded by cfg.drain_timeout:
//!          ├─ Ok        → Ok(())
//!          └─ timeout   → Err(RuntimeError::DrainTimeout)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pushflow::{Config, Observable, Runtime, Subscribe, observable, single};
//! use pushflow::testing::ObservableTestExt;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!     let runtime = Runtime::new(Config::default(), subs)?;
//!     runtime.install();
//!
//!     observable::range(1, 3)
//!         .concat_with_single(single::just(10))
//!         .test()
//!         .assert_result(&[1, 2, 3, 10]);
//!
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::events::{self, Bus, Event};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Owns the bus, the subscriber fan-out and the listener connecting them.
pub struct Runtime {
    cfg: Config,
    bus: Bus,
    handle: Handle,
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl Runtime {
    /// Builds the runtime and starts its listener.
    ///
    /// Must be called from within a tokio runtime; otherwise returns
    /// [`RuntimeError::NoReactor`].
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Result<Self, RuntimeError> {
        let handle = Handle::try_current().map_err(|_| RuntimeError::NoReactor)?;
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let set = SubscriberSet::new(subscribers, bus.clone());
        let token = CancellationToken::new();
        let listener = handle.spawn(listen(bus.subscribe(), set, token.clone()));

        Ok(Self {
            cfg,
            bus,
            handle,
            token,
            listener,
        })
    }

    /// Points the process-wide event hook at this runtime's bus.
    ///
    /// Returns the bus that was installed before, if any.
    pub fn install(&self) -> Option<Bus> {
        events::install(self.bus.clone(), &self.cfg)
    }

    /// Returns `true` if the hook currently points at this runtime.
    pub fn is_installed(&self) -> bool {
        events::is_current(&self.bus)
    }

    /// Event bus of this runtime.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Configuration this runtime was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Scheduler running work on this runtime's blocking pool.
    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        Arc::new(TokioScheduler::new(self.handle.clone()))
    }

    /// Uninstalls the hook, drains pending events and stops subscriber workers.
    ///
    /// With `drain_timeout = 0` the listener is aborted and nothing is awaited.
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        events::uninstall_if(&self.bus);
        self.token.cancel();

        let Some(limit) = self.cfg.drain_limit() else {
            self.listener.abort();
            return Ok(());
        };
        match tokio::time::timeout(limit, self.listener).await {
            Ok(_) => Ok(()),
            Err(_) => Err(RuntimeError::DrainTimeout { timeout: limit }),
        }
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains.
async fn listen(mut rx: broadcast::Receiver<Event>, set: SubscriberSet, token: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            ev = rx.recv() => match ev {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            _ = token.cancelled() => {
                loop {
                    match rx.try_recv() {
                        Ok(ev) => set.emit(&ev),
                        Err(TryRecvError::Lagged(_)) => continue,
                        Err(_) => break,
                    }
                }
                break;
            }
        }
    }
    set.shutdown().await;
}
