//! # LogWriter: prints recovered conditions to stdout.
//!
//! Meant for demos and local debugging; production code usually ships its
//! own [`Subscribe`] implementation.
//!
//! ## Example output
//! ```text
//! [protocol-violation] concat: lifecycle handle already set; extra handle disposed
//! [undeliverable] take: late failure
//! [dispose-failed] concat: release failed: disk gone
//! [subscriber-overflow] audit: full
//! [subscriber-panicked] audit: boom
//! ```

use async_trait::async_trait;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn line(e: &Event) -> String {
    format!(
        "[{}] {}: {}",
        e.kind.as_label().replace('_', "-"),
        e.operator.as_deref().unwrap_or("unknown"),
        e.reason.as_deref().unwrap_or("-"),
    )
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", line(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
