//! Progress and log reporting toward the presentation layer.
//!
//! The batch runner has no knowledge of any rendering technology. It talks
//! to whatever is watching it through the [`EventSink`] trait: one capability
//! for log lines, one for progress counters. [`ChannelSink`] is the provided
//! adapter for message passing: it posts [`BatchEvent`] values to a tokio
//! mpsc channel so a UI can drain them on its own turn instead of being
//! called from the worker context.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Severity of a log line emitted toward the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Routine progress information.
    Info,
    /// Something went wrong but the batch continues.
    Warn,
    /// A job or precondition failed outright.
    Error,
}

impl LogLevel {
    /// Short uppercase label, as rendered in log views.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A single event emitted by a running batch.
///
/// # Example
///
/// ```rust
/// use silent_setup::{BatchEvent, LogLevel};
///
/// fn render(event: BatchEvent) {
///     match event {
///         BatchEvent::Log { level, message } => {
///             println!("[{}] {}", level.as_str(), message);
///         }
///         BatchEvent::Progress { completed, total } => {
///             println!("{} / {} installed", completed, total);
///         }
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BatchEvent {
    /// A log line for the live feed.
    Log {
        /// Severity of the line.
        level: LogLevel,
        /// The message text.
        message: String,
    },

    /// Updated progress counters.
    Progress {
        /// Jobs attempted so far.
        completed: usize,
        /// Total jobs in the batch.
        total: usize,
    },
}

/// Receiver of log lines and progress updates from a batch.
///
/// Implementations must be cheap and non-blocking: both methods are called
/// from the worker context between child-process invocations.
pub trait EventSink: Send + Sync {
    /// Accept a log line.
    fn log(&self, level: LogLevel, message: &str);

    /// Accept updated progress counters.
    fn progress(&self, completed: usize, total: usize);
}

/// An [`EventSink`] that posts [`BatchEvent`]s to an unbounded mpsc channel.
///
/// This is the recommended wiring for interactive frontends: the worker
/// never touches render state, and the presentation layer drains the
/// receiver whenever it gets scheduled. Events sent after the receiver is
/// dropped are discarded silently; a closed UI has no use for them.
///
/// # Example
///
/// ```rust
/// use silent_setup::{BatchEvent, ChannelSink, EventSink, LogLevel};
///
/// let (sink, mut rx) = ChannelSink::new();
/// sink.log(LogLevel::Info, "hello");
/// sink.progress(1, 3);
///
/// assert!(matches!(rx.try_recv(), Ok(BatchEvent::Log { .. })));
/// assert!(matches!(rx.try_recv(), Ok(BatchEvent::Progress { completed: 1, total: 3 })));
/// ```
pub struct ChannelSink {
    tx: UnboundedSender<BatchEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver the presentation layer drains.
    pub fn new() -> (Self, UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn log(&self, level: LogLevel, message: &str) {
        let _ = self.tx.send(BatchEvent::Log {
            level,
            message: message.to_string(),
        });
    }

    fn progress(&self, completed: usize, total: usize) {
        let _ = self.tx.send(BatchEvent::Progress { completed, total });
    }
}
