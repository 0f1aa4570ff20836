//! Status reporting seam.
//!
//! All user-visible progress goes through [`StatusReporter`], injected by
//! the host. The core never holds UI references, so it stays agnostic of
//! the editor's status bar, notification area, or whatever else renders
//! these messages.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Handle for a posted status message.
pub type StatusId = u64;

/// Receives human-readable progress and result messages.
///
/// Lifecycle of one status: `post` returns an id, `update` rewrites its text
/// and busy flag, `remove` dismisses it. `busy` asks the host to show a
/// spinner next to the message. None of the calls may fail or block; the
/// core treats them as fire-and-forget.
pub trait StatusReporter: Send + Sync {
    fn post(&self, message: &str, busy: bool) -> StatusId;
    fn update(&self, id: StatusId, message: &str, busy: bool);
    fn remove(&self, id: StatusId);
}

/// Reporter that forwards every message to the `tracing` log stream.
///
/// The default for headless hosts and a sensible fallback while a real
/// status surface is being wired up.
#[derive(Debug, Default)]
pub struct TracingReporter {
    next_id: AtomicU64,
}

impl StatusReporter for TracingReporter {
    fn post(&self, message: &str, busy: bool) -> StatusId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(status = id, busy, "{message}");
        id
    }

    fn update(&self, id: StatusId, message: &str, busy: bool) {
        info!(status = id, busy, "{message}");
    }

    fn remove(&self, _id: StatusId) {}
}

/// Reporter that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl StatusReporter for NullReporter {
    fn post(&self, _message: &str, _busy: bool) -> StatusId {
        0
    }

    fn update(&self, _id: StatusId, _message: &str, _busy: bool) {}

    fn remove(&self, _id: StatusId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_reporter_hands_out_distinct_ids() {
        let reporter = TracingReporter::default();
        let a = reporter.post("one", true);
        let b = reporter.post("two", false);
        assert_ne!(a, b);
        reporter.update(a, "one done", false);
        reporter.remove(a);
        reporter.remove(b);
    }
}
