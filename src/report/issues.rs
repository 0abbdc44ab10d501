//! Issue listings: the JQL search report and the per-sprint issue listing.
//!
//! Both tables share the same defensive field reads; they differ in where
//! the epic column comes from and whether sprint-membership history is
//! included.

use crate::api::types::Issue;

use super::project::{Column, Projection};
use super::table::Table;

/// Build the "Custom Report" table from a JQL search result.
///
/// The epic column is the parent issue's summary; sub-tasks are excluded.
pub fn jql_issue_table(issues: &[Issue], base_url: &str) -> Table {
    let projection = Projection::new(vec![
        Column::new("Type", |i: &Issue| i.type_name().into()),
        Column::new("Issue Key", |i: &Issue| i.key.as_str().into()),
        Column::new("Epic", |i: &Issue| i.parent_summary().into()),
        Column::new("Story Points", |i: &Issue| i.story_points().into()),
        Column::new("Summary", |i: &Issue| i.fields.summary.as_str().into()),
        Column::new("Assignee", |i: &Issue| i.assignee_name().into()),
        Column::new("Status", |i: &Issue| i.status_category().into()),
        Column::new("Build vs. Run", |i: &Issue| i.build_vs_run().into()),
        Column::new("Number of Sprints", |i: &Issue| i.sprint_count().into()),
        Column::new("URL", |i: &Issue| browse_url(base_url, &i.key).into()),
    ]);

    projection.table(issues.iter().filter(|i| !i.is_subtask()))
}

/// Build the issue listing for a single sprint.
///
/// The epic column is the agile epic link's name; sub-tasks are excluded.
pub fn sprint_issue_table(issues: &[Issue], base_url: &str) -> Table {
    let projection = Projection::new(vec![
        Column::new("Type", |i: &Issue| i.type_name().into()),
        Column::new("Issue Key", |i: &Issue| i.key.as_str().into()),
        Column::new("Epic", |i: &Issue| i.epic_name().into()),
        Column::new("Story Points", |i: &Issue| i.story_points().into()),
        Column::new("Summary", |i: &Issue| i.fields.summary.as_str().into()),
        Column::new("Assignee", |i: &Issue| i.assignee_name().into()),
        Column::new("Status", |i: &Issue| i.status_category().into()),
        Column::new("Build vs. Run", |i: &Issue| i.build_vs_run().into()),
        Column::new("URL", |i: &Issue| browse_url(base_url, &i.key).into()),
    ]);

    projection.table(issues.iter().filter(|i| !i.is_subtask()))
}

/// Browse URL for an issue key.
fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url, key)
}
