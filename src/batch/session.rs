//! Batch session: the sequential installer runner.
//!
//! A [`BatchSession`] owns everything one batch needs: the three user-chosen
//! paths, the options, and the sink the presentation layer listens on. The
//! presentation layer drives [`BatchSession::install_all`] on a background
//! task and may call [`BatchSession::cancel`] from any other task.

use crate::batch::discover;
use crate::errors::BatchError;
use crate::events::{EventSink, LogLevel};
use crate::exit_code::ExitDisposition;
use crate::options::BatchOptions;
use crate::process::tree;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use sysinfo::Pid;
use tokio::process::Command;

/// The three user-chosen filesystem paths a batch operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Directory scanned (non-recursively) for installer executables.
    pub source_dir: PathBuf,

    /// Directory passed to every installer as `/DIR=<target>`.
    pub target_dir: PathBuf,

    /// The installer that always runs first.
    pub first_installer: PathBuf,
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BatchOutcome {
    /// Every job was attempted.
    Completed,
    /// The batch was cancelled mid-way; remaining jobs were skipped.
    Cancelled,
}

/// Result of a batch that got past its preconditions.
///
/// `attempted` counts every job that was actually invoked, successful or
/// not; `failures` counts the attempted jobs that did not exit with code 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// How the batch ended.
    pub outcome: BatchOutcome,
    /// Jobs attempted before the batch ended.
    pub attempted: usize,
    /// Total jobs in the batch.
    pub total: usize,
    /// Attempted jobs that were not successes.
    pub failures: usize,
}

#[derive(Debug, Default)]
struct RunStats {
    completed: usize,
    failures: usize,
    cancelled: bool,
}

/// A single batch-install session.
///
/// The session moves through `idle -> running -> (completed | cancelled |
/// aborted)`; an aborted start (missing path, empty job list, concurrent
/// start) is reported as an [`Err`] from [`install_all`](Self::install_all)
/// before any job runs. A finished session can be started again; the only
/// restriction is that two batches cannot run at once.
///
/// All shared state is interior: the type is driven entirely through `&self`
/// and is meant to be wrapped in an [`Arc`] shared between the worker task
/// and whatever triggers cancellation.
///
/// # Example
///
/// ```rust,no_run
/// use silent_setup::{BatchOptions, BatchPlan, BatchSession, ChannelSink};
/// use std::sync::Arc;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let (sink, mut events) = ChannelSink::new();
///     let session = Arc::new(BatchSession::new(
///         BatchPlan {
///             source_dir: "/srv/installers".into(),
///             target_dir: "/opt/apps".into(),
///             first_installer: "/srv/base-setup.exe".into(),
///         },
///         BatchOptions::default(),
///         Arc::new(sink),
///     ));
///
///     let worker = tokio::spawn({
///         let session = Arc::clone(&session);
///         async move { session.install_all().await }
///     });
///
///     while let Some(event) = events.recv().await {
///         println!("{:?}", event);
///     }
///     let summary = worker.await.unwrap();
///     println!("{:?}", summary);
/// }
/// ```
pub struct BatchSession {
    plan: BatchPlan,
    options: BatchOptions,
    sink: Arc<dyn EventSink>,
    /// True while a batch is in progress. Set before the first job, cleared
    /// only after the batch (and any cancellation teardown) is done.
    installing: AtomicBool,
    /// Cooperative cancel flag, set at the top of `cancel` and observed by
    /// the job loop between jobs. Separate from `installing` so a cancelled
    /// worker stops even while teardown is still signaling processes.
    cancel_requested: AtomicBool,
    /// PID of the in-flight installer, if any. Only the PID is shared;
    /// ownership of the child handle stays with the worker.
    current: Mutex<Option<u32>>,
    /// Last line handed to the sink, for duplicate suppression.
    last_line: Mutex<Option<String>>,
}

impl BatchSession {
    /// Create an idle session.
    pub fn new(plan: BatchPlan, options: BatchOptions, sink: Arc<dyn EventSink>) -> Self {
        Self {
            plan,
            options,
            sink,
            installing: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            current: Mutex::new(None),
            last_line: Mutex::new(None),
        }
    }

    /// The paths this session operates on.
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Whether a batch is currently in progress.
    pub fn is_installing(&self) -> bool {
        self.installing.load(Ordering::SeqCst)
    }

    /// Run the whole batch: first installer, then every suffix-matching file
    /// in the source directory, strictly in order, one at a time.
    ///
    /// Progress is reported as `(0, total)` up front, once after every
    /// attempted job, and once more on loop exit. A job failing does not
    /// halt the batch; only missing preconditions or an empty job list abort
    /// it, and only before anything has run.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] if a required path is missing, the source
    /// directory cannot be scanned, no jobs are found, or a batch is already
    /// running. Every error is also emitted on the log sink.
    pub async fn install_all(&self) -> Result<BatchSummary, BatchError> {
        // Step 1: Reject concurrent starts.
        if self.installing.swap(true, Ordering::SeqCst) {
            self.emit(LogLevel::Warn, "Installation is already running");
            return Err(BatchError::AlreadyRunning {
                fix: "Wait for the current batch to finish or cancel it".to_string(),
            });
        }
        self.cancel_requested.store(false, Ordering::SeqCst);

        self.emit(LogLevel::Info, "Starting installation process");

        // Step 2: Pre-flight path checks.
        if let Err(error) = self.check_preconditions() {
            self.emit(LogLevel::Error, &error.to_string());
            self.installing.store(false, Ordering::SeqCst);
            return Err(error);
        }

        // Step 3: Build the job list.
        let jobs = match discover::collect_jobs(
            &self.plan.first_installer,
            &self.plan.source_dir,
            &self.options.installer_suffix,
        ) {
            Ok(jobs) => jobs,
            Err(source) => {
                let error = BatchError::SourceDirUnreadable {
                    path: self.plan.source_dir.clone(),
                    source,
                    fix: "Check permissions on the install directory".to_string(),
                };
                self.emit(LogLevel::Error, &error.to_string());
                self.installing.store(false, Ordering::SeqCst);
                return Err(error);
            }
        };

        let total = jobs.len();
        if total == 0 {
            self.emit(LogLevel::Warn, "No installers found in the directory");
            self.installing.store(false, Ordering::SeqCst);
            return Err(BatchError::NoInstallersFound {
                dir: self.plan.source_dir.clone(),
                fix: format!(
                    "Put .{} files in the directory or adjust the installer suffix",
                    self.options.installer_suffix
                ),
            });
        }

        // Step 4: Initialize progress.
        self.sink.progress(0, total);

        // Step 5: Run the jobs in order.
        let stats = self.run_jobs(&jobs, total).await;

        // Step 6: Final state and report.
        self.installing.store(false, Ordering::SeqCst);
        self.sink.progress(stats.completed, total);

        let outcome = if stats.cancelled {
            BatchOutcome::Cancelled
        } else {
            self.emit(LogLevel::Info, "Installation process completed");
            BatchOutcome::Completed
        };

        Ok(BatchSummary {
            outcome,
            attempted: stats.completed,
            total,
            failures: stats.failures,
        })
    }

    /// Cancel the running batch and tear down the in-flight process tree.
    ///
    /// Descendants of the current installer are asked to terminate, given
    /// the configured grace period, then force-killed; the installer itself
    /// gets the same treatment last. Errors while enumerating or signaling
    /// (including processes that exited on their own) are logged and never
    /// abort the cleanup. When no installer is in flight this only logs a
    /// warning and clears the running flag.
    pub async fn cancel(&self) {
        // Stop the loop first; teardown of the in-flight process follows.
        self.cancel_requested.store(true, Ordering::SeqCst);

        let current = *self.current.lock().unwrap();
        let Some(pid) = current else {
            self.emit(LogLevel::Warn, "No installation process found");
            self.installing.store(false, Ordering::SeqCst);
            return;
        };

        self.emit(LogLevel::Info, "Stopping installation, please wait");

        let grace = self.options.kill_grace;
        let mut sys = tree::snapshot();
        let root = Pid::from_u32(pid);

        // Descendants first: the installer may have spawned its own helpers.
        let children = tree::descendants(&sys, root);
        for &child in &children {
            self.emit(
                LogLevel::Warn,
                &format!("Terminating child process: {}", child.as_u32()),
            );
        }
        for gone in tree::terminate(&sys, &children) {
            self.emit(
                LogLevel::Warn,
                &format!("Process {} already exited", gone.as_u32()),
            );
        }
        let stubborn = tree::wait_for_exit(&mut sys, &children, grace).await;
        for &survivor in &stubborn {
            self.emit(
                LogLevel::Warn,
                &format!("Killing stubborn process: {}", survivor.as_u32()),
            );
        }
        tree::kill(&sys, &stubborn);

        // Then the installer itself.
        if !tree::terminate(&sys, &[root]).is_empty() {
            self.emit(LogLevel::Warn, "Installation process already exited");
        }
        if !tree::wait_for_exit(&mut sys, &[root], grace).await.is_empty() {
            self.emit(LogLevel::Warn, "Force closing the main installer");
            tree::kill(&sys, &[root]);
        }

        self.emit(LogLevel::Info, "Installation cancelled successfully");
        *self.current.lock().unwrap() = None;
        self.installing.store(false, Ordering::SeqCst);
    }

    /// Run each job in order, observing the cancel flag between jobs.
    async fn run_jobs(&self, jobs: &[PathBuf], total: usize) -> RunStats {
        let mut stats = RunStats::default();

        for installer in jobs {
            if self.cancel_requested.load(Ordering::SeqCst) {
                self.emit(LogLevel::Info, "Installation cancelled");
                stats.cancelled = true;
                break;
            }

            self.emit(
                LogLevel::Info,
                &format!("Installing: {}", installer.display()),
            );

            if !self.run_installer(installer).await {
                stats.failures += 1;
                self.emit(
                    LogLevel::Warn,
                    &format!("{} failed, but continuing", installer.display()),
                );
            }

            stats.completed += 1;
            self.sink.progress(stats.completed, total);
        }

        stats
    }

    /// Run a single installer to completion.
    ///
    /// Returns `true` only for exit code 0. Launch failures and non-success
    /// exits are logged (one summary line per invocation) and reported as
    /// `false`; nothing here can halt the batch.
    async fn run_installer(&self, installer: &Path) -> bool {
        self.emit(
            LogLevel::Info,
            &format!("Installing: {}", installer.display()),
        );

        let mut command = Command::new(installer);
        command
            .arg(self.options.silent_mode.flag())
            .arg(format!("/DIR={}", self.plan.target_dir.display()))
            .kill_on_drop(true)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = match command.spawn() {
            Ok(child) => child,
            Err(error) => {
                self.emit(
                    LogLevel::Error,
                    &format!("Installation error: {} - {}", installer.display(), error),
                );
                return false;
            }
        };

        // Publish the PID for cancel(), then wait. The handle itself is
        // consumed by the wait; cancellation signals through the process
        // table instead.
        *self.current.lock().unwrap() = child.id();
        let result = child.wait_with_output().await;
        *self.current.lock().unwrap() = None;

        let output = match result {
            Ok(output) => output,
            Err(error) => {
                self.emit(
                    LogLevel::Error,
                    &format!("Installation error: {} - {}", installer.display(), error),
                );
                return false;
            }
        };

        let disposition = ExitDisposition::classify(output.status.code());
        let code_text = match output.status.code() {
            Some(code) => code.to_string(),
            None => "terminated by signal".to_string(),
        };
        let message = match disposition {
            ExitDisposition::Success => {
                format!("Installation successful: {}", installer.display())
            }
            ExitDisposition::IgnoredWarning => format!(
                "Warning ({} - ignored): {}\n{}{}",
                code_text,
                installer.display(),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            ),
            ExitDisposition::Failure => format!(
                "Installation error ({}): {}\n{}{}",
                code_text,
                installer.display(),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            ),
        };
        self.emit(disposition.log_level(), &message);

        disposition.is_success()
    }

    fn check_preconditions(&self) -> Result<(), BatchError> {
        if !self.plan.source_dir.exists() {
            return Err(BatchError::SourceDirMissing {
                path: self.plan.source_dir.clone(),
                fix: "Pick an existing directory of installers".to_string(),
            });
        }
        if !self.plan.target_dir.exists() {
            return Err(BatchError::TargetDirMissing {
                path: self.plan.target_dir.clone(),
                fix: "Create the target directory before starting".to_string(),
            });
        }
        if !self.plan.first_installer.exists() {
            return Err(BatchError::FirstInstallerMissing {
                path: self.plan.first_installer.clone(),
                fix: "Pick an existing installer executable".to_string(),
            });
        }
        Ok(())
    }

    /// Record a line in the log file and hand it to the sink.
    ///
    /// The file always gets the line; the sink is skipped when the line
    /// repeats the immediately preceding one, so noisy repeats collapse in
    /// the live feed but stay auditable on disk.
    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }

        let trimmed = message.trim();
        {
            let mut last = self.last_line.lock().unwrap();
            if last.as_deref() == Some(trimmed) {
                return;
            }
            *last = Some(trimmed.to_string());
        }

        self.sink.log(level, message);
    }
}
