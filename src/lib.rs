//! # silent-setup
//!
//! Sequential batch runner for silent-mode setup executables.
//!
//! This crate is the engine behind a small desktop utility: given a
//! directory full of installer executables, a target directory, and one
//! installer that must run first, it runs every installer as a child
//! process, one at a time, in a fixed order. Exit codes are classified
//! (success, known-benign warning, failure) but never halt the batch; the
//! presentation layer watches progress counters and a duplicate-suppressed
//! log feed through an abstract sink. A running batch can be cancelled,
//! which tears down the in-flight installer together with every process it
//! spawned.
//!
//! ## Features
//!
//! - [`BatchSession`] owning one batch: start with
//!   [`install_all`](BatchSession::install_all), stop with
//!   [`cancel`](BatchSession::cancel)
//! - [`EventSink`] / [`ChannelSink`] decoupling the runner from any UI
//! - [`ExitDisposition`] classification against the fixed list of benign
//!   installer exit codes
//! - [`logging::init_file_log`] for the persistent append-only log file
//!
//! ## Example
//!
//! ```rust,no_run
//! use silent_setup::{BatchOptions, BatchPlan, BatchSession, ChannelSink};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (sink, mut events) = ChannelSink::new();
//!     let session = Arc::new(BatchSession::new(
//!         BatchPlan {
//!             source_dir: "/srv/installers".into(),
//!             target_dir: "/opt/apps".into(),
//!             first_installer: "/srv/base-setup.exe".into(),
//!         },
//!         BatchOptions::default(),
//!         Arc::new(sink),
//!     ));
//!
//!     tokio::spawn({
//!         let session = Arc::clone(&session);
//!         async move { session.install_all().await }
//!     });
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

mod batch;
mod errors;
mod events;
mod exit_code;
pub mod logging;
mod options;
mod process;

pub use batch::{BatchOutcome, BatchPlan, BatchSession, BatchSummary};
pub use errors::BatchError;
pub use events::{BatchEvent, ChannelSink, EventSink, LogLevel};
pub use exit_code::{ExitDisposition, IGNORED_EXIT_CODES};
pub use options::{BatchOptions, SilentMode};
