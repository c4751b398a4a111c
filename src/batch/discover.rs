//! Job list discovery.

use std::io;
use std::path::{Path, PathBuf};

/// Build the ordered job list for a batch.
///
/// The explicitly chosen first installer leads, followed by every regular
/// file in `source_dir` whose extension matches `suffix` (compared without
/// the leading dot, case-insensitively, since the installers this targets
/// come from case-insensitive filesystems). The scan is non-recursive and
/// the order of scanned entries is directory-listing order, which is not
/// guaranteed stable across platforms.
///
/// The first installer is intentionally not deduplicated against the scan:
/// if it also lives inside `source_dir` it runs twice, matching the utility
/// this crate was extracted from.
pub(crate) fn collect_jobs(
    first: &Path,
    source_dir: &Path,
    suffix: &str,
) -> io::Result<Vec<PathBuf>> {
    let mut jobs = vec![first.to_path_buf()];

    for entry in std::fs::read_dir(source_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(suffix));
        if matches {
            jobs.push(path);
        }
    }

    Ok(jobs)
}
