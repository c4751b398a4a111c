//! Error types for batch execution.
//!
//! This module defines the errors that abort a batch before any job runs.
//! Each variant includes an actionable fix suggestion to help users resolve
//! the issue. Failures of individual jobs are never errors: they are logged
//! and the batch continues.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch before the first job runs.
///
/// Each variant includes contextual information about what went wrong and
/// a `fix` field with an actionable suggestion for resolving the issue.
///
/// # Example
///
/// ```rust
/// use silent_setup::BatchError;
///
/// fn handle_error(error: BatchError) {
///     eprintln!("Batch aborted: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BatchError {
    /// The directory holding the installers does not exist.
    #[error("Install directory not found: {}", .path.display())]
    SourceDirMissing {
        /// The path that was checked.
        path: PathBuf,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The directory the installers should install into does not exist.
    #[error("Target directory not found: {}", .path.display())]
    TargetDirMissing {
        /// The path that was checked.
        path: PathBuf,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The explicitly chosen first installer does not exist.
    #[error("First installer not found: {}", .path.display())]
    FirstInstallerMissing {
        /// The path that was checked.
        path: PathBuf,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The install directory exists but could not be scanned.
    #[error("Cannot read install directory: {}", .path.display())]
    SourceDirUnreadable {
        /// The directory that failed to scan.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The job list came up empty.
    #[error("No installers found in {}", .dir.display())]
    NoInstallersFound {
        /// The directory that was scanned.
        dir: PathBuf,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A batch is already in progress on this session.
    #[error("Installation is already running")]
    AlreadyRunning {
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl BatchError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// Every error variant includes a fix suggestion that users can follow
    /// to resolve the issue.
    ///
    /// # Example
    ///
    /// ```rust
    /// use silent_setup::BatchError;
    ///
    /// let error = BatchError::AlreadyRunning {
    ///     fix: "Wait for the current batch to finish or cancel it".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("cancel"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::SourceDirMissing { fix, .. } => fix,
            Self::TargetDirMissing { fix, .. } => fix,
            Self::FirstInstallerMissing { fix, .. } => fix,
            Self::SourceDirUnreadable { fix, .. } => fix,
            Self::NoInstallersFound { fix, .. } => fix,
            Self::AlreadyRunning { fix, .. } => fix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_dir_missing_display() {
        let error = BatchError::SourceDirMissing {
            path: PathBuf::from("/srv/installers"),
            fix: "Pick an existing directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Install directory not found: /srv/installers"
        );
    }

    #[test]
    fn test_target_dir_missing_display() {
        let error = BatchError::TargetDirMissing {
            path: PathBuf::from("/opt/apps"),
            fix: "Create the target directory first".to_string(),
        };
        assert!(error.to_string().contains("Target directory not found"));
        assert!(error.to_string().contains("/opt/apps"));
    }

    #[test]
    fn test_first_installer_missing_display() {
        let error = BatchError::FirstInstallerMissing {
            path: PathBuf::from("/srv/base-setup.exe"),
            fix: "Pick an existing installer".to_string(),
        };
        assert!(error.to_string().contains("First installer not found"));
    }

    #[test]
    fn test_source_dir_unreadable_keeps_cause() {
        let error = BatchError::SourceDirUnreadable {
            path: PathBuf::from("/srv/installers"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            fix: "Check directory permissions".to_string(),
        };
        assert!(error.to_string().contains("Cannot read install directory"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_all_variants_have_fix() {
        let errors = vec![
            BatchError::SourceDirMissing {
                path: PathBuf::from("/a"),
                fix: "Pick an existing directory".to_string(),
            },
            BatchError::TargetDirMissing {
                path: PathBuf::from("/b"),
                fix: "Create the target directory".to_string(),
            },
            BatchError::FirstInstallerMissing {
                path: PathBuf::from("/c.exe"),
                fix: "Pick an existing installer".to_string(),
            },
            BatchError::SourceDirUnreadable {
                path: PathBuf::from("/a"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                fix: "Check directory permissions".to_string(),
            },
            BatchError::NoInstallersFound {
                dir: PathBuf::from("/a"),
                fix: "Check the installer suffix".to_string(),
            },
            BatchError::AlreadyRunning {
                fix: "Wait or cancel".to_string(),
            },
        ];

        for error in errors {
            assert!(
                !error.fix_suggestion().is_empty(),
                "fix_suggestion() should be non-empty for {:?}",
                error
            );
        }
    }
}
