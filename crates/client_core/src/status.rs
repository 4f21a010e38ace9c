//! Status feedback delivered to whoever renders it.

use std::{fmt, sync::Arc};

use crossbeam_channel::{Receiver, Sender};

/// Outcome of one dispatch, reported exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Success { label: String },
    Failure { label: String, cause: String },
}

impl DispatchResult {
    pub fn label(&self) -> &str {
        match self {
            DispatchResult::Success { label } | DispatchResult::Failure { label, .. } => label,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Sending { label: String },
    Finished(DispatchResult),
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReport::Sending { label } => write!(f, "sending {label}..."),
            StatusReport::Finished(DispatchResult::Success { label }) => write!(f, "sent {label}"),
            StatusReport::Finished(DispatchResult::Failure { label, cause }) => {
                write!(f, "error sending {label} ({cause})")
            }
        }
    }
}

/// Receives status from many in-flight dispatches at once.
pub trait StatusSink: Send + Sync {
    fn report(&self, report: StatusReport);
}

impl<T: StatusSink + ?Sized> StatusSink for Arc<T> {
    fn report(&self, report: StatusReport) {
        (**self).report(report);
    }
}

/// Forwards reports over a channel so the consuming thread can apply them
/// in its own loop.
#[derive(Debug, Clone)]
pub struct ChannelStatusSink {
    tx: Sender<StatusReport>,
}

impl ChannelStatusSink {
    pub fn new() -> (Self, Receiver<StatusReport>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl StatusSink for ChannelStatusSink {
    fn report(&self, report: StatusReport) {
        // The consumer may already be gone during shutdown.
        let _ = self.tx.send(report);
    }
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
