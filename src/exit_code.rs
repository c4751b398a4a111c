//! Exit code classification for installer processes.

use crate::events::LogLevel;

/// Non-zero exit codes that are treated as ignorable warnings.
///
/// These are well-known benign codes emitted by Windows setup executables
/// (e.g. 1603 "fatal error during installation" raised for already-installed
/// components, 1605 "unknown product", 1618 "another installation in
/// progress", 1622 "error opening installation log file", and the NTSTATUS
/// value 3221226525). A job exiting with one of these is logged as a warning
/// and the batch continues.
pub const IGNORED_EXIT_CODES: [u32; 5] = [1603, 1605, 1618, 1622, 3221226525];

/// Classification of an installer's exit code.
///
/// Classification never halts a batch; it only selects the severity of the
/// summary line logged for the job.
///
/// # Example
///
/// ```rust
/// use silent_setup::ExitDisposition;
///
/// assert_eq!(ExitDisposition::classify(Some(0)), ExitDisposition::Success);
/// assert_eq!(ExitDisposition::classify(Some(1603)), ExitDisposition::IgnoredWarning);
/// assert_eq!(ExitDisposition::classify(Some(5)), ExitDisposition::Failure);
/// assert_eq!(ExitDisposition::classify(None), ExitDisposition::Failure);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitDisposition {
    /// The installer exited with code 0.
    Success,

    /// The installer exited with a code from [`IGNORED_EXIT_CODES`].
    IgnoredWarning,

    /// Any other exit, including processes terminated by a signal.
    Failure,
}

impl ExitDisposition {
    /// Classify a raw exit code as reported by the child process.
    ///
    /// `None` means the process was terminated by a signal and reported no
    /// code at all; that is a failure.
    pub fn classify(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Success,
            // Compare as u32: codes above i32::MAX (NTSTATUS values) come
            // back from the OS as negative i32 bit patterns.
            Some(code) if IGNORED_EXIT_CODES.contains(&(code as u32)) => Self::IgnoredWarning,
            _ => Self::Failure,
        }
    }

    /// Whether this disposition counts as a successful job.
    ///
    /// Ignored warnings are not successes; they merely do not halt the batch.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The severity used for the job's summary log line.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Info,
            Self::IgnoredWarning => LogLevel::Warn,
            Self::Failure => LogLevel::Error,
        }
    }

    /// Human-readable description of the disposition.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Success => "installation successful",
            Self::IgnoredWarning => "exit code ignored",
            Self::Failure => "installation failed",
        }
    }
}
