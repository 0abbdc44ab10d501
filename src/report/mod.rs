//! Report building.
//!
//! Every report is a projection of API records through a declarative column
//! set into a [`Table`](table::Table); the modules here define the column
//! sets for the four report types.

pub mod issues;
pub mod project;
pub mod sprint_report;
pub mod sprints;
pub mod table;

pub use issues::{jql_issue_table, sprint_issue_table};
pub use sprint_report::sprint_report_table;
pub use sprints::{sprint_overview_table, SprintEntry};
pub use table::{Cell, Table};
