//! sprintbook - Jira sprint reports rendered into workbook tabs.
//!
//! Pulls sprint and issue data from a Jira board and writes fixed-column
//! report tables into named CSV tabs of a local workbook directory. Run a
//! subcommand directly, or run with no subcommand for the interactive menu.

mod api;
mod app;
mod config;
mod error;
mod logging;
mod report;
mod sheet;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use tracing::error;

use api::ReqwestFetcher;
use app::App;
use config::Credentials;
use error::AppError;
use sheet::CsvWorkbook;

#[derive(Debug, Parser)]
#[command(
    name = "sprintbook",
    version,
    about = "Jira sprint reports rendered into CSV workbook tabs"
)]
struct Cli {
    /// Directory the report tabs are written into.
    #[arg(short, long, default_value = "workbook")]
    workbook: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh the sprint overview tab
    Sprints,
    /// Write the sprint report tab
    Report {
        /// Report this sprint instead of the active one
        #[arg(long, conflicts_with = "last_closed")]
        sprint: Option<u64>,
        /// Report the most recently closed sprint
        #[arg(long)]
        last_closed: bool,
    },
    /// Write the issue listing of one sprint
    Issues {
        /// The sprint ID; prompted for when omitted
        sprint: Option<u64>,
    },
    /// Run a JQL query into the custom report tab
    Query {
        /// The JQL query; prompted for when omitted
        jql: Option<String>,
    },
    /// Manage stored credentials
    Credentials {
        #[command(subcommand)]
        action: CredentialsCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CredentialsCommand {
    /// Prompt for and overwrite the stored credentials
    Set,
    /// Delete the stored credentials
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Some(Command::Sprints) => refresh_overview(&cli.workbook).await,
        Some(Command::Report {
            sprint: Some(id), ..
        }) => report_for(&cli.workbook, id).await,
        Some(Command::Report {
            last_closed: true, ..
        }) => report_last_closed(&cli.workbook).await,
        Some(Command::Report { .. }) => report_current(&cli.workbook).await,
        Some(Command::Issues { sprint }) => {
            let id = match sprint {
                Some(id) => id,
                None => prompt_sprint_id()?,
            };
            sprint_issues(&cli.workbook, id).await
        }
        Some(Command::Query { jql }) => {
            let jql = match jql {
                Some(q) => q,
                None => prompt_query()?,
            };
            custom_report(&cli.workbook, &jql).await
        }
        Some(Command::Credentials { action }) => match action {
            CredentialsCommand::Set => {
                Credentials::prompt_and_store()?;
                Ok(())
            }
            CredentialsCommand::Clear => {
                Credentials::clear();
                Ok(())
            }
        },
        None => menu(&cli.workbook).await,
    }
}

/// The interactive menu: one report flow per entry, looping until exit.
///
/// A failed action reports its error and returns to the menu; only prompt
/// failures end the loop.
async fn menu(workbook: &Path) -> Result<(), AppError> {
    let items = [
        "Refresh sprint list",
        "Sprint report (current)",
        "Sprint report (last closed)",
        "Sprint report (custom)",
        "Issues (custom query)",
        "Reset credentials",
        "Delete credentials",
        "Exit",
    ];

    loop {
        let selection = Select::new()
            .with_prompt("Jira")
            .items(&items)
            .default(0)
            .interact()
            .map_err(AppError::Io)?;

        let result = match selection {
            0 => refresh_overview(workbook).await,
            1 => report_current(workbook).await,
            2 => report_last_closed(workbook).await,
            3 => match prompt_sprint_id() {
                Ok(id) => report_for(workbook, id).await,
                Err(e) => Err(e),
            },
            4 => match prompt_query() {
                Ok(jql) => custom_report(workbook, &jql).await,
                Err(e) => Err(e),
            },
            5 => Credentials::prompt_and_store().map(drop).map_err(Into::into),
            6 => {
                Credentials::clear();
                Ok(())
            }
            _ => break,
        };

        if let Err(e) = result {
            error!("{}", e);
            eprintln!("Error: {}", e.user_message());
        }
    }

    Ok(())
}

/// Assemble the application for one action.
///
/// Credentials are ensured (prompting if absent) before the client exists,
/// so no flow can reach the network without them.
fn build_app(workbook: &Path) -> Result<App<ReqwestFetcher, CsvWorkbook>, AppError> {
    let credentials = Credentials::load_or_prompt()?;
    let fetcher = ReqwestFetcher::new()?;
    let sink = CsvWorkbook::new(workbook);
    Ok(App::new(&credentials, fetcher, sink))
}

async fn refresh_overview(workbook: &Path) -> Result<(), AppError> {
    build_app(workbook)?.refresh_sprint_overview().await
}

async fn report_current(workbook: &Path) -> Result<(), AppError> {
    build_app(workbook)?.sprint_report_current().await
}

async fn report_last_closed(workbook: &Path) -> Result<(), AppError> {
    build_app(workbook)?.sprint_report_last_closed().await
}

async fn report_for(workbook: &Path, sprint_id: u64) -> Result<(), AppError> {
    build_app(workbook)?.sprint_report_for(sprint_id).await
}

async fn sprint_issues(workbook: &Path, sprint_id: u64) -> Result<(), AppError> {
    build_app(workbook)?.sprint_issue_listing(sprint_id).await
}

async fn custom_report(workbook: &Path, jql: &str) -> Result<(), AppError> {
    build_app(workbook)?.custom_issue_report(jql).await
}

fn prompt_sprint_id() -> Result<u64, AppError> {
    Input::new()
        .with_prompt("Please enter a Sprint ID")
        .interact_text()
        .map_err(AppError::Io)
}

fn prompt_query() -> Result<String, AppError> {
    Input::new()
        .with_prompt("Please enter a query")
        .interact_text()
        .map_err(AppError::Io)
}
