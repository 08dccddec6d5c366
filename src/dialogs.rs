//! Content for the History, Recommendations and Compare dialogs.
//!
//! Shared by the terminal UI and the plain CLI subcommands.

use crate::benchmark::view::CompletedRun;
use crate::storage::TestRecord;

pub const EMPTY_HISTORY: &str = "No test history available.";

pub const RECOMMENDATIONS: &[&str] = &[
    "General Recommendations:",
    "- Keep your drivers up to date.",
    "- Regularly clean your PC from dust.",
    "- Use SSDs for faster disk performance.",
];

pub fn history_lines(records: &[TestRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec![EMPTY_HISTORY.to_string()];
    }
    records.iter().map(TestRecord::history_line).collect()
}

/// How a finished run relates to earlier runs of the same kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub score: i64,
    pub previous: Option<i64>,
    pub best_before: Option<i64>,
    pub runs_of_kind: usize,
}

impl Comparison {
    /// `records` is the full newest-first listing, which already contains
    /// `run` itself when the append succeeded.
    pub fn for_run(run: &CompletedRun, records: &[TestRecord]) -> Self {
        let earlier: Vec<&TestRecord> = records
            .iter()
            .filter(|r| r.kind == run.kind)
            .filter(|r| Some(r.id) != run.record_id)
            .filter(|r| run.record_id.map_or(true, |id| r.id < id))
            .collect();

        Self {
            score: run.score,
            previous: earlier.first().map(|r| r.score),
            best_before: earlier.iter().map(|r| r.score).max(),
            runs_of_kind: earlier.len() + 1,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("This run: {}", self.score)];
        match self.previous {
            Some(prev) => {
                let delta = self.score - prev;
                lines.push(format!("Previous run: {prev} ({delta:+})"));
            }
            None => lines.push("Previous run: none".to_string()),
        }
        if let Some(best) = self.best_before {
            lines.push(format!("Best before this run: {best}"));
        }
        lines.push(format!("Runs of this kind: {}", self.runs_of_kind));
        lines
    }
}
