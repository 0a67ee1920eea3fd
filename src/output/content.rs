//! Captured page bodies, one file per successful target.

use crate::types::ScanReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Subdirectory of the output directory holding captured bodies.
pub const CONTENT_DIR: &str = "content";

/// File name for a captured body: scheme stripped, path separators turned
/// into `_`, one trailing `_` dropped.
///
/// ```
/// use torscout::output::content_file_name;
/// assert_eq!(content_file_name("http://abc.onion/forum/"), "abc.onion_forum.html");
/// ```
pub fn content_file_name(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    let rest = if lower.starts_with("http://") {
        &url[7..]
    } else if lower.starts_with("https://") {
        &url[8..]
    } else {
        url
    };

    let flat = rest.replace(['/', '\\'], "_");
    let flat = flat.strip_suffix('_').unwrap_or(&flat);
    format!("{}.html", flat)
}

/// Write every captured body under `dir/content/`.
///
/// Failures are logged and skipped; returns the files actually written.
/// Targets sharing a file name overwrite each other, last one wins.
pub fn save_contents(report: &ScanReport, dir: &Path) -> Vec<PathBuf> {
    let mut written = Vec::new();
    let content_dir = dir.join(CONTENT_DIR);

    for outcome in report.captured_pages() {
        if let Err(e) = fs::create_dir_all(&content_dir) {
            warn!("Failed to create {}: {}", content_dir.display(), e);
            break;
        }

        let path = content_dir.join(content_file_name(&outcome.url));
        if path.exists() {
            debug!("Replacing {} with content from {}", path.display(), outcome.url);
        }
        match fs::write(&path, &outcome.body) {
            Ok(()) if !written.contains(&path) => written.push(path),
            Ok(()) => {}
            Err(e) => warn!("Failed to save content for {}: {}", outcome.url, e),
        }
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;
    use crate::types::{FetchOutcome, ReportBuilder, Target};

    #[test]
    fn test_content_file_name() {
        assert_eq!(content_file_name("example.onion"), "example.onion.html");
        assert_eq!(content_file_name("http://example.onion/"), "example.onion.html");
        assert_eq!(content_file_name("HTTPS://a.onion/b/c"), "a.onion_b_c.html");
        assert_eq!(content_file_name("http://a.onion//"), "a.onion_.html");
    }

    #[test]
    fn test_only_successful_bodies_saved() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_contents(&sample_report(), dir.path());

        assert_eq!(written.len(), 1);
        let body = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_no_content_dir_without_captures() {
        let dir = tempfile::tempdir().unwrap();
        let report = ReportBuilder::start().finish(false);

        assert!(save_contents(&report, dir.path()).is_empty());
        assert!(!dir.path().join(CONTENT_DIR).exists());
    }

    #[test]
    fn test_colliding_names_keep_last_body() {
        let dir = tempfile::tempdir().unwrap();
        let at = chrono::Utc::now();
        let mut builder = ReportBuilder::start();
        let first = Target::new("http://a.onion/").unwrap();
        let second = Target::new("a.onion").unwrap();
        builder.record(FetchOutcome::success(&first, at, 200, "first"));
        builder.record(FetchOutcome::success(&second, at, 200, "second"));

        let written = save_contents(&builder.finish(false), dir.path());

        let path = dir.path().join(CONTENT_DIR).join("a.onion.html");
        assert_eq!(written, vec![path.clone()]);
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_body_bytes_written_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let body = vec![0x3c, 0xff, 0xfe, 0x00, 0x3e];
        let mut builder = ReportBuilder::start();
        let target = Target::new("bin.onion").unwrap();
        builder.record(FetchOutcome::success(&target, chrono::Utc::now(), 200, body.clone()));

        let written = save_contents(&builder.finish(false), dir.path());

        assert_eq!(fs::read(&written[0]).unwrap(), body);
    }
}
