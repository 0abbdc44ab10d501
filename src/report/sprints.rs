//! The board-wide sprint overview.
//!
//! One row per sprint, pairing the agile sprint record with the aggregated
//! story-point sums read from the sprint-report endpoint.

use crate::api::types::{Sprint, SprintReport};

use super::project::{Column, Projection};
use super::table::Table;

/// A sprint joined with its aggregated report.
pub type SprintEntry = (Sprint, SprintReport);

/// Build the "Sprints Overview" table.
///
/// Dates are truncated to their day; missing goals and sums reported as
/// `"null"` render as empty cells.
pub fn sprint_overview_table(entries: &[SprintEntry]) -> Table {
    let projection = Projection::new(vec![
        Column::new("id", |(s, _): &SprintEntry| s.id.into()),
        Column::new("link", |(s, _): &SprintEntry| s.self_url.as_deref().into()),
        Column::new("state", |(s, _): &SprintEntry| s.state.to_string().into()),
        Column::new("name", |(s, _): &SprintEntry| s.name.as_str().into()),
        Column::new("startDate", |(s, _): &SprintEntry| s.start_day().into()),
        Column::new("endDate", |(s, _): &SprintEntry| s.end_day().into()),
        Column::new("completeDate", |(s, _): &SprintEntry| s.complete_day().into()),
        Column::new("goal", |(s, _): &SprintEntry| {
            s.goal.as_deref().unwrap_or("").into()
        }),
        Column::new("completedStoryPoints", |(_, r): &SprintEntry| {
            r.contents.completed_issues_estimate_sum.as_value().into()
        }),
        Column::new("incompletedStoryPoints", |(_, r): &SprintEntry| {
            r.contents
                .issues_not_completed_estimate_sum
                .as_value()
                .into()
        }),
        Column::new("removedStoryPoints", |(_, r): &SprintEntry| {
            r.contents.punted_issues_estimate_sum.as_value().into()
        }),
    ]);

    projection.table(entries.iter())
}
