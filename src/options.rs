//! Batch configuration options.
//!
//! This module provides the [`BatchOptions`] struct for configuring how a
//! batch of installers is run, and the [`SilentMode`] enum selecting which
//! silent flag is passed to each setup executable.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::IntoEnumIterator;

/// The silent flag variant passed to each setup executable.
///
/// Setup executables in the Inno Setup family accept two levels of
/// suppression: `/SILENT` still shows a progress window, `/VERYSILENT`
/// shows nothing at all.
///
/// # Example
///
/// ```rust
/// use silent_setup::SilentMode;
///
/// assert_eq!(SilentMode::Silent.flag(), "/SILENT");
/// assert_eq!(SilentMode::VerySilent.flag(), "/VERYSILENT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum SilentMode {
    /// Suppress all prompts but keep the installer's progress window.
    Silent,
    /// Suppress every window the installer would show.
    VerySilent,
}

impl SilentMode {
    /// The command-line flag for this mode.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Silent => "/SILENT",
            Self::VerySilent => "/VERYSILENT",
        }
    }

    /// Iterator over all silent modes.
    ///
    /// Useful for building selection UIs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use silent_setup::SilentMode;
    ///
    /// let modes: Vec<_> = SilentMode::all().collect();
    /// assert_eq!(modes.len(), 2);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

/// Configuration options for running a batch.
///
/// Use [`Default::default()`] for the behavior of the desktop utility this
/// crate was built for: fully silent installs of `.exe` files with a five
/// second kill grace period.
///
/// # Example
///
/// ```rust
/// use silent_setup::{BatchOptions, SilentMode};
///
/// // Defaults
/// let options = BatchOptions::default();
/// assert_eq!(options.silent_mode, SilentMode::VerySilent);
/// assert_eq!(options.installer_suffix, "exe");
///
/// // Keep the installers' own progress windows visible
/// let options = BatchOptions {
///     silent_mode: SilentMode::Silent,
///     ..Default::default()
/// };
/// # let _ = options;
/// ```
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Which silent flag each installer receives.
    ///
    /// Default: [`SilentMode::VerySilent`].
    pub silent_mode: SilentMode,

    /// File extension identifying installer executables in the source
    /// directory. Compared case-insensitively, without the leading dot.
    ///
    /// Default: `"exe"`.
    pub installer_suffix: String,

    /// How long a terminated process may take to exit voluntarily before it
    /// is forcibly killed during cancellation.
    ///
    /// Default: 5 seconds.
    pub kill_grace: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            silent_mode: SilentMode::VerySilent,
            installer_suffix: "exe".to_string(),
            kill_grace: Duration::from_secs(5),
        }
    }
}
