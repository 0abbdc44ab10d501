//! Jira API response types.
//!
//! These types model the subset of the Jira Agile API, the classic search
//! API, and the greenhopper sprint-report endpoint that the reports consume.
//! Optional nested fields deserialize to `None` rather than failing, so a
//! sparse issue never aborts a report run.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    /// The sprint currently in progress.
    Active,
    /// A completed sprint.
    Closed,
    /// A sprint that has not started yet.
    Future,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SprintState::Active => "active",
            SprintState::Closed => "closed",
            SprintState::Future => "future",
            SprintState::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A sprint as returned by `GET /rest/agile/1.0/board/{boardId}/sprint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// The sprint ID.
    pub id: u64,
    /// URL of the sprint resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The sprint state (active, closed, future).
    pub state: SprintState,
    /// The sprint name.
    pub name: String,
    /// When the sprint started.
    #[serde(default)]
    pub start_date: Option<String>,
    /// When the sprint is scheduled to end.
    #[serde(default)]
    pub end_date: Option<String>,
    /// When the sprint was completed.
    #[serde(default)]
    pub complete_date: Option<String>,
    /// The sprint goal.
    #[serde(default)]
    pub goal: Option<String>,
}

impl Sprint {
    /// The start date truncated to `YYYY-MM-DD`, or empty when absent.
    pub fn start_day(&self) -> &str {
        date_day(self.start_date.as_deref())
    }

    /// The end date truncated to `YYYY-MM-DD`, or empty when absent.
    pub fn end_day(&self) -> &str {
        date_day(self.end_date.as_deref())
    }

    /// The completion date truncated to `YYYY-MM-DD`, or empty when absent.
    pub fn complete_day(&self) -> &str {
        date_day(self.complete_date.as_deref())
    }
}

/// Truncate an ISO timestamp to its date part.
fn date_day(date: Option<&str>) -> &str {
    match date {
        Some(d) if d.len() >= 10 => &d[..10],
        Some(d) => d,
        None => "",
    }
}

/// The sprint-report payload from
/// `GET /rest/greenhopper/latest/rapid/charts/sprintreport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintReport {
    /// The report contents.
    pub contents: SprintReportContents,
}

/// Aggregated sprint-report contents: four disjoint issue buckets, the set
/// of keys added after the sprint started, and story-point sums.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintReportContents {
    /// Issues completed during the sprint.
    #[serde(default)]
    pub completed_issues: Vec<ReportIssue>,
    /// Issues still open when the sprint ended.
    #[serde(default)]
    pub issues_not_completed_in_current_sprint: Vec<ReportIssue>,
    /// Issues removed from the sprint while it ran.
    #[serde(default)]
    pub punted_issues: Vec<ReportIssue>,
    /// Issues completed in a different sprint.
    #[serde(default)]
    pub issues_completed_in_another_sprint: Vec<ReportIssue>,
    /// Keys of issues added after sprint start.
    #[serde(default)]
    pub issue_keys_added_during_sprint: HashMap<String, bool>,
    /// Story-point sum for completed issues.
    #[serde(default)]
    pub completed_issues_estimate_sum: EstimateSum,
    /// Story-point sum for issues not completed.
    #[serde(default)]
    pub issues_not_completed_estimate_sum: EstimateSum,
    /// Story-point sum for removed issues.
    #[serde(default)]
    pub punted_issues_estimate_sum: EstimateSum,
}

/// A story-point sum as reported by the sprint-report endpoint.
///
/// The endpoint reports absent sums with the literal text `"null"` rather
/// than omitting the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateSum {
    /// The numeric sum.
    #[serde(default)]
    pub value: Option<f64>,
    /// The sum rendered as text; `"null"` when there is no value.
    #[serde(default)]
    pub text: Option<String>,
}

impl EstimateSum {
    /// The sum as a number, or `None` when the endpoint reported no value.
    pub fn as_value(&self) -> Option<f64> {
        if self.text.as_deref() == Some("null") {
            return None;
        }
        self.value
    }
}

/// An issue in the greenhopper sprint-report shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssue {
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// The issue type name.
    #[serde(default)]
    pub type_name: Option<String>,
    /// The issue summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// The issue status name.
    #[serde(default)]
    pub status_name: Option<String>,
    /// The assignee display name.
    #[serde(default)]
    pub assignee_name: Option<String>,
    /// The parent epic, when the issue belongs to one.
    #[serde(default)]
    pub epic_field: Option<EpicField>,
    /// The current estimate statistic (story points).
    #[serde(default)]
    pub current_estimate_statistic: Option<EstimateStatistic>,
}

impl ReportIssue {
    /// The story-point estimate, when one is set.
    pub fn estimate(&self) -> Option<f64> {
        self.current_estimate_statistic
            .as_ref()
            .and_then(|s| s.stat_field_value.value)
    }

    /// The parent epic summary, when the issue belongs to an epic.
    pub fn epic_summary(&self) -> Option<&str> {
        self.epic_field.as_ref().and_then(|e| e.summary.as_deref())
    }

    /// Whether this record is a sub-task.
    pub fn is_subtask(&self) -> bool {
        self.type_name.as_deref() == Some("Sub-task")
    }
}

/// The epic a report issue belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicField {
    /// The epic summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Estimate statistic wrapper in the sprint-report shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateStatistic {
    /// The statistic value.
    pub stat_field_value: StatFieldValue,
}

/// The value slot of an estimate statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatFieldValue {
    /// The numeric value, absent for unestimated issues.
    #[serde(default)]
    pub value: Option<f64>,
}

/// An issue as returned by the agile sprint-issue listing and the classic
/// search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// The issue fields.
    pub fields: IssueFields,
}

impl Issue {
    /// The issue type name.
    pub fn type_name(&self) -> &str {
        &self.fields.issuetype.name
    }

    /// Whether this issue is a sub-task.
    pub fn is_subtask(&self) -> bool {
        self.fields.issuetype.name == "Sub-task"
    }

    /// The status-category name (To Do, In Progress, Done), when present.
    pub fn status_category(&self) -> Option<&str> {
        self.fields
            .status
            .status_category
            .as_ref()
            .map(|c| c.name.as_str())
    }

    /// The assignee display name, when assigned.
    pub fn assignee_name(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.as_str())
    }

    /// The parent issue summary, when the issue has a parent.
    pub fn parent_summary(&self) -> Option<&str> {
        self.fields
            .parent
            .as_ref()
            .map(|p| p.fields.summary.as_str())
    }

    /// The epic name, when the issue belongs to an epic.
    pub fn epic_name(&self) -> Option<&str> {
        self.fields.epic.as_ref().map(|e| e.name.as_str())
    }

    /// The story-point estimate, when set.
    pub fn story_points(&self) -> Option<f64> {
        self.fields.story_points
    }

    /// The build-vs-run classification, when set.
    pub fn build_vs_run(&self) -> Option<&str> {
        self.fields.build_vs_run.as_ref().map(|v| v.value.as_str())
    }

    /// How many sprints the issue has been a member of, when tracked.
    pub fn sprint_count(&self) -> Option<usize> {
        self.fields.sprints.as_ref().map(|s| s.len())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Issue fields consumed by the reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue type.
    pub issuetype: IssueType,
    /// The issue summary/title.
    #[serde(default)]
    pub summary: String,
    /// The issue status.
    pub status: Status,
    /// The issue assignee.
    #[serde(default)]
    pub assignee: Option<User>,
    /// The parent issue (epics surface here for company-managed projects).
    #[serde(default)]
    pub parent: Option<ParentIssue>,
    /// The epic link on the agile API shape.
    #[serde(default)]
    pub epic: Option<Epic>,
    /// Story points.
    #[serde(default, rename = "customfield_10004")]
    pub story_points: Option<f64>,
    /// The "Build vs. Run" single-select classification.
    #[serde(default, rename = "customfield_12318")]
    pub build_vs_run: Option<SelectValue>,
    /// Sprint membership history.
    #[serde(default, rename = "customfield_10200")]
    pub sprints: Option<Vec<serde_json::Value>>,
}

/// Issue type (Bug, Story, Task, Sub-task, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    /// The issue type name.
    pub name: String,
    /// Whether this is a subtask type.
    #[serde(default)]
    pub subtask: bool,
}

/// Issue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// The status name.
    pub name: String,
    /// The status category.
    #[serde(default)]
    pub status_category: Option<StatusCategory>,
}

/// Status category (groups statuses into to-do, in-progress, done).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
    /// The category name.
    pub name: String,
}

/// A Jira user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's display name.
    pub display_name: String,
}

/// A parent issue reference carrying only the fields the reports read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentIssue {
    /// The parent's fields.
    pub fields: ParentFields,
}

/// Fields of a parent issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentFields {
    /// The parent summary.
    #[serde(default)]
    pub summary: String,
}

/// An epic reference on the agile API shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Epic {
    /// The epic name.
    pub name: String,
}

/// A single-select custom field value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectValue {
    /// The selected option.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sprint() {
        let json = r#"{
            "id": 4511,
            "self": "https://example.atlassian.net/rest/agile/1.0/sprint/4511",
            "state": "closed",
            "name": "Sprint 42",
            "startDate": "2024-01-01T09:00:00.000Z",
            "endDate": "2024-01-14T17:00:00.000Z",
            "completeDate": "2024-01-15T08:30:00.000Z",
            "goal": "Ship the thing"
        }"#;

        let sprint: Sprint = serde_json::from_str(json).unwrap();
        assert_eq!(sprint.id, 4511);
        assert_eq!(sprint.state, SprintState::Closed);
        assert_eq!(sprint.start_day(), "2024-01-01");
        assert_eq!(sprint.end_day(), "2024-01-14");
        assert_eq!(sprint.complete_day(), "2024-01-15");
        assert_eq!(sprint.goal.as_deref(), Some("Ship the thing"));
    }

    #[test]
    fn test_parse_sprint_without_dates_or_goal() {
        let json = r#"{
            "id": 7,
            "state": "future",
            "name": "Sprint 43"
        }"#;

        let sprint: Sprint = serde_json::from_str(json).unwrap();
        assert_eq!(sprint.state, SprintState::Future);
        assert_eq!(sprint.start_day(), "");
        assert_eq!(sprint.end_day(), "");
        assert_eq!(sprint.complete_day(), "");
        assert!(sprint.goal.is_none());
    }

    #[test]
    fn test_parse_sprint_unknown_state() {
        let json = r#"{"id": 1, "state": "archived", "name": "Old"}"#;

        let sprint: Sprint = serde_json::from_str(json).unwrap();
        assert_eq!(sprint.state, SprintState::Unknown);
    }

    #[test]
    fn test_estimate_sum_null_text() {
        let sum: EstimateSum = serde_json::from_str(r#"{"text": "null"}"#).unwrap();
        assert_eq!(sum.as_value(), None);

        let sum: EstimateSum =
            serde_json::from_str(r#"{"value": 21.0, "text": "21.0"}"#).unwrap();
        assert_eq!(sum.as_value(), Some(21.0));
    }

    #[test]
    fn test_parse_sprint_report_contents() {
        let json = r#"{
            "contents": {
                "completedIssues": [
                    {
                        "key": "PROJ-1",
                        "typeName": "Story",
                        "summary": "Done story",
                        "statusName": "Done",
                        "assigneeName": "Ada Lovelace",
                        "epicField": {"summary": "Checkout epic"},
                        "currentEstimateStatistic": {
                            "statFieldValue": {"value": 5.0}
                        }
                    }
                ],
                "issuesNotCompletedInCurrentSprint": [],
                "puntedIssues": [],
                "issuesCompletedInAnotherSprint": [],
                "issueKeysAddedDuringSprint": {"PROJ-1": true},
                "completedIssuesEstimateSum": {"value": 5.0, "text": "5.0"},
                "issuesNotCompletedEstimateSum": {"text": "null"},
                "puntedIssuesEstimateSum": {"text": "null"}
            }
        }"#;

        let report: SprintReport = serde_json::from_str(json).unwrap();
        let contents = &report.contents;
        assert_eq!(contents.completed_issues.len(), 1);

        let issue = &contents.completed_issues[0];
        assert_eq!(issue.estimate(), Some(5.0));
        assert_eq!(issue.epic_summary(), Some("Checkout epic"));
        assert!(!issue.is_subtask());
        assert!(contents.issue_keys_added_during_sprint.contains_key("PROJ-1"));
        assert_eq!(contents.completed_issues_estimate_sum.as_value(), Some(5.0));
        assert_eq!(contents.punted_issues_estimate_sum.as_value(), None);
    }

    #[test]
    fn test_report_issue_without_estimate_or_epic() {
        let json = r#"{"key": "PROJ-9", "typeName": "Bug", "summary": "Crash"}"#;

        let issue: ReportIssue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.estimate(), None);
        assert_eq!(issue.epic_summary(), None);
        assert_eq!(issue.status_name, None);
    }

    #[test]
    fn test_parse_issue_with_all_fields() {
        let json = r#"{
            "key": "PROJ-123",
            "fields": {
                "issuetype": {"name": "Story", "subtask": false},
                "summary": "Implement login",
                "status": {
                    "name": "In Review",
                    "statusCategory": {"name": "In Progress"}
                },
                "assignee": {"displayName": "Grace Hopper"},
                "parent": {"fields": {"summary": "Auth epic"}},
                "epic": {"name": "Authentication"},
                "customfield_10004": 8.0,
                "customfield_12318": {"value": "Build"},
                "customfield_10200": [{}, {}, {}]
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.type_name(), "Story");
        assert!(!issue.is_subtask());
        assert_eq!(issue.status_category(), Some("In Progress"));
        assert_eq!(issue.assignee_name(), Some("Grace Hopper"));
        assert_eq!(issue.parent_summary(), Some("Auth epic"));
        assert_eq!(issue.epic_name(), Some("Authentication"));
        assert_eq!(issue.story_points(), Some(8.0));
        assert_eq!(issue.build_vs_run(), Some("Build"));
        assert_eq!(issue.sprint_count(), Some(3));
    }

    #[test]
    fn test_parse_issue_with_null_fields() {
        let json = r#"{
            "key": "PROJ-124",
            "fields": {
                "issuetype": {"name": "Task"},
                "summary": "Loose task",
                "status": {"name": "To Do"},
                "assignee": null,
                "parent": null,
                "customfield_10004": null,
                "customfield_12318": null,
                "customfield_10200": null
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.assignee_name(), None);
        assert_eq!(issue.parent_summary(), None);
        assert_eq!(issue.epic_name(), None);
        assert_eq!(issue.story_points(), None);
        assert_eq!(issue.build_vs_run(), None);
        assert_eq!(issue.sprint_count(), None);
        assert_eq!(issue.status_category(), None);
    }

    #[test]
    fn test_subtask_detection() {
        let json = r#"{
            "key": "PROJ-125",
            "fields": {
                "issuetype": {"name": "Sub-task", "subtask": true},
                "summary": "Small piece",
                "status": {"name": "To Do"}
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert!(issue.is_subtask());
    }
}
