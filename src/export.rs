//! Plain-text report export for a finished run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::benchmark::score::SIMULATED_NOTE;
use crate::benchmark::view::CompletedRun;
use crate::storage::TIMESTAMP_FORMAT;

/// `<dir>/quickbench_<kind>_<YYYYmmdd_HHMMSS>.txt`
pub fn default_report_path(dir: &Path, run: &CompletedRun) -> PathBuf {
    dir.join(format!(
        "quickbench_{}_{}.txt",
        run.kind.as_str().to_ascii_lowercase(),
        run.completed_at.format("%Y%m%d_%H%M%S")
    ))
}

pub fn render_report(run: &CompletedRun) -> String {
    let mut out = String::new();
    out.push_str("Benchmark Report\n");
    out.push_str("================\n\n");
    out.push_str(&format!("Test:         {}\n", run.kind));
    out.push_str(&format!("Result:       {}\n", run.score));
    out.push_str(&format!("Elapsed:      {} s\n", run.elapsed_secs));
    out.push_str(&format!(
        "Completed at: {}\n",
        run.completed_at.format(TIMESTAMP_FORMAT)
    ));
    if let Some(id) = run.record_id {
        out.push_str(&format!("Record:       {id}\n"));
    }
    out.push('\n');
    out.push_str(SIMULATED_NOTE);
    out.push('\n');
    out
}

/// Write the report to `path`, creating parent directories.
pub fn write_report(path: &Path, run: &CompletedRun) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory: {}", parent.display())
            })?;
        }
    }

    fs::write(path, render_report(run))
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!(path = %path.display(), kind = %run.kind, "Exported report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::TestKind;
    use crate::storage::RecordId;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_run() -> CompletedRun {
        CompletedRun {
            kind: TestKind::Disk,
            score: 4567,
            elapsed_secs: 20,
            completed_at: NaiveDate::from_ymd_opt(2026, 10, 15)
                .unwrap()
                .and_hms_opt(14, 3, 7)
                .unwrap(),
            record_id: Some(RecordId(9)),
        }
    }

    #[test]
    fn test_default_report_path() {
        let path = default_report_path(Path::new("/reports"), &sample_run());
        assert_eq!(
            path,
            PathBuf::from("/reports/quickbench_disk_20261015_140307.txt")
        );
    }

    #[test]
    fn test_report_contains_run_details() {
        let report = render_report(&sample_run());
        assert!(report.contains("Test:         DISK"));
        assert!(report.contains("Result:       4567"));
        assert!(report.contains("Elapsed:      20 s"));
        assert!(report.contains("Completed at: 2026-10-15 14:03:07"));
        assert!(report.contains("Record:       #9"));
        assert!(report.contains(SIMULATED_NOTE));
    }

    #[test]
    fn test_write_report_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let run = sample_run();
        let path = default_report_path(&temp_dir.path().join("a").join("b"), &run);

        write_report(&path, &run).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&run));
    }
}
