//! The per-sprint report.
//!
//! Shapes the aggregated sprint-report payload into the "Sprint Report"
//! table, classifying every issue by how it fared against the sprint
//! lifecycle and by when it was committed.

use crate::api::types::{ReportIssue, SprintReport, SprintReportContents};

use super::project::{Column, Projection};
use super::table::{Cell, Table};

/// How an issue fared relative to the sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Finished while the sprint ran.
    CompletedDuringSprint,
    /// Still open when the sprint ended.
    NotCompletedInCurrentSprint,
    /// Removed from the sprint while it ran.
    RemovedFromSprint,
    /// Finished, but in a different sprint.
    CompletedInAnotherSprint,
}

impl Completion {
    /// The label written into the report.
    pub fn label(&self) -> &'static str {
        match self {
            Completion::CompletedDuringSprint => "Completed during Sprint",
            Completion::NotCompletedInCurrentSprint => "Not Completed in Current Sprint",
            Completion::RemovedFromSprint => "Removed From Sprint",
            Completion::CompletedInAnotherSprint => "Completed in another Sprint",
        }
    }
}

/// Classify an issue key against the four report buckets.
///
/// The buckets are checked in priority order; a key present in several
/// buckets takes the first match.
pub fn classify(contents: &SprintReportContents, key: &str) -> Option<Completion> {
    let in_bucket = |bucket: &[ReportIssue]| bucket.iter().any(|i| i.key == key);

    if in_bucket(&contents.completed_issues) {
        Some(Completion::CompletedDuringSprint)
    } else if in_bucket(&contents.issues_not_completed_in_current_sprint) {
        Some(Completion::NotCompletedInCurrentSprint)
    } else if in_bucket(&contents.punted_issues) {
        Some(Completion::RemovedFromSprint)
    } else if in_bucket(&contents.issues_completed_in_another_sprint) {
        Some(Completion::CompletedInAnotherSprint)
    } else {
        None
    }
}

/// Commit-timing label for an issue key.
fn commit_category(contents: &SprintReportContents, key: &str) -> &'static str {
    if contents.issue_keys_added_during_sprint.contains_key(key) {
        "Committed in Sprint"
    } else {
        "Committed in Planning"
    }
}

/// Build the "Sprint Report" table from a sprint-report payload.
///
/// Input rows are the four buckets concatenated, sub-tasks excluded.
pub fn sprint_report_table(report: &SprintReport, base_url: &str) -> Table {
    let contents = &report.contents;

    let all_issues: Vec<&ReportIssue> = contents
        .completed_issues
        .iter()
        .chain(&contents.issues_not_completed_in_current_sprint)
        .chain(&contents.punted_issues)
        .chain(&contents.issues_completed_in_another_sprint)
        .filter(|issue| !issue.is_subtask())
        .collect();

    let projection = Projection::new(vec![
        Column::new("Type", |i: &&ReportIssue| i.type_name.as_deref().into()),
        Column::new("Issue Key", |i: &&ReportIssue| i.key.as_str().into()),
        Column::new("Epic", |i: &&ReportIssue| i.epic_summary().into()),
        Column::new("Story Points", |i: &&ReportIssue| i.estimate().into()),
        Column::new("Summary", |i: &&ReportIssue| i.summary.as_deref().into()),
        Column::new("Status", |i: &&ReportIssue| i.status_name.as_deref().into()),
        Column::new("Commit Category", |i: &&ReportIssue| {
            commit_category(contents, &i.key).into()
        }),
        Column::new("Complete Category", |i: &&ReportIssue| {
            match classify(contents, &i.key) {
                Some(c) => c.label().into(),
                None => Cell::Empty,
            }
        }),
        Column::new("Assignee", |i: &&ReportIssue| {
            i.assignee_name.as_deref().into()
        }),
        Column::new("URL", |i: &&ReportIssue| {
            format!("{}/browse/{}", base_url, i.key).into()
        }),
    ]);

    projection.table(all_issues.iter())
}
