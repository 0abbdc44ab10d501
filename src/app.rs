//! Report flows.
//!
//! [`App`] wires the credential set, the Jira client, and a table sink into
//! the fixed sequences behind each menu action: fetch raw records, shape
//! them into a table, overwrite the destination tab. A tab is only written
//! after its full table is built, so a failed run leaves prior content
//! intact.

use tracing::{info, instrument};

use crate::api::types::SprintState;
use crate::api::{HttpFetcher, JiraClient};
use crate::config::Credentials;
use crate::error::AppError;
use crate::report::{
    jql_issue_table, sprint_issue_table, sprint_overview_table, sprint_report_table, SprintEntry,
};
use crate::sheet::TableSink;

/// Tab receiving the board-wide sprint overview.
pub const SPRINT_OVERVIEW_TAB: &str = "Sprints Overview";
/// Tab receiving the per-sprint report.
pub const SPRINT_REPORT_TAB: &str = "Sprint Report";
/// Tab receiving JQL query results.
pub const CUSTOM_REPORT_TAB: &str = "Custom Report";
/// Tab receiving a single sprint's issue listing.
pub const SPRINT_ISSUES_TAB: &str = "Sprint Issues";

/// How many sprints the overview covers by default.
const DEFAULT_MAX_SPRINTS: usize = 25;

/// The application: one credential set, one board, one workbook.
pub struct App<F, S> {
    client: JiraClient<F>,
    sink: S,
    board_id: String,
}

impl<F: HttpFetcher, S: TableSink> App<F, S> {
    /// Wire up an application from its collaborators.
    pub fn new(credentials: &Credentials, fetcher: F, sink: S) -> Self {
        let client = JiraClient::new(credentials, fetcher);
        Self {
            client,
            sink,
            board_id: credentials.board_id.clone(),
        }
    }

    /// Refresh the sprint overview tab.
    ///
    /// Covers the most recent [`DEFAULT_MAX_SPRINTS`] sprints, fetching the
    /// aggregated report of each one sequentially.
    #[instrument(skip(self))]
    pub async fn refresh_sprint_overview(&mut self) -> Result<(), AppError> {
        let sprints = self.client.board_sprints(&self.board_id).await?;
        let recent = last_n(sprints, DEFAULT_MAX_SPRINTS);

        let mut entries: Vec<SprintEntry> = Vec::with_capacity(recent.len());
        for sprint in recent {
            let report = self.client.sprint_report(&self.board_id, sprint.id).await?;
            entries.push((sprint, report));
        }

        let table = sprint_overview_table(&entries);
        self.sink.write_tab(SPRINT_OVERVIEW_TAB, &table)?;

        info!(sprints = entries.len(), "Sprint overview refreshed");
        Ok(())
    }

    /// Write the sprint report for the single active sprint.
    #[instrument(skip(self))]
    pub async fn sprint_report_current(&mut self) -> Result<(), AppError> {
        let sprints = self.client.board_sprints(&self.board_id).await?;

        let mut active = sprints
            .into_iter()
            .filter(|s| s.state == SprintState::Active);

        let current = active.next().ok_or(AppError::NoActiveSprint)?;
        if active.next().is_some() {
            return Err(AppError::MultipleActiveSprints);
        }

        self.write_sprint_report(current.id).await
    }

    /// Write the sprint report for the most recently closed sprint.
    #[instrument(skip(self))]
    pub async fn sprint_report_last_closed(&mut self) -> Result<(), AppError> {
        let sprints = self.client.board_sprints(&self.board_id).await?;

        let last_closed = sprints
            .into_iter()
            .filter(|s| s.state == SprintState::Closed)
            .max_by(|a, b| a.end_date.cmp(&b.end_date))
            .ok_or(AppError::NoClosedSprints)?;

        self.write_sprint_report(last_closed.id).await
    }

    /// Write the sprint report for an explicit sprint ID.
    #[instrument(skip(self))]
    pub async fn sprint_report_for(&mut self, sprint_id: u64) -> Result<(), AppError> {
        self.write_sprint_report(sprint_id).await
    }

    /// Fetch, shape, and write one sprint report.
    async fn write_sprint_report(&mut self, sprint_id: u64) -> Result<(), AppError> {
        let report = self.client.sprint_report(&self.board_id, sprint_id).await?;
        let table = sprint_report_table(&report, self.client.base_url());
        self.sink.write_tab(SPRINT_REPORT_TAB, &table)?;

        info!(sprint_id, rows = table.rows().len(), "Sprint report written");
        Ok(())
    }

    /// Run a JQL query and write the matching issues to the custom tab.
    #[instrument(skip(self), fields(jql = %jql))]
    pub async fn custom_issue_report(&mut self, jql: &str) -> Result<(), AppError> {
        let issues = self.client.search_issues(jql).await?;
        let table = jql_issue_table(&issues, self.client.base_url());
        self.sink.write_tab(CUSTOM_REPORT_TAB, &table)?;

        info!(rows = table.rows().len(), "Custom issue report written");
        Ok(())
    }

    /// Write the issue listing of one sprint.
    #[instrument(skip(self))]
    pub async fn sprint_issue_listing(&mut self, sprint_id: u64) -> Result<(), AppError> {
        let issues = self.client.sprint_issues(sprint_id).await?;
        let table = sprint_issue_table(&issues, self.client.base_url());
        self.sink.write_tab(SPRINT_ISSUES_TAB, &table)?;

        info!(sprint_id, rows = table.rows().len(), "Sprint issues written");
        Ok(())
    }
}

/// Keep the last `n` items of a list, preserving order.
fn last_n<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    if items.len() > n {
        items.drain(..items.len() - n);
    }
    items
}
