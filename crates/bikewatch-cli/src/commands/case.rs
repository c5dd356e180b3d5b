use bikewatch_core::model::{CaseId, CitizenId, NewCase};
use clap::{Args, Subcommand};

use super::{case_line, lines, App};

#[derive(Debug, Args)]
pub struct CaseArgs {
    #[command(subcommand)]
    pub command: CaseCommand,
}

#[derive(Debug, Subcommand)]
pub enum CaseCommand {
    /// Report a stolen bike on behalf of a citizen
    Report {
        /// Reporting citizen id
        #[arg(long)]
        reporter: i64,
        description: String,
    },

    /// Mark a case's bike as found
    Resolve { id: i64 },

    /// Show one case
    Show { id: i64 },

    /// List cases
    List {
        /// Only cases still waiting for an officer
        #[arg(long)]
        waiting: bool,
    },
}

pub fn execute(app: &App, args: CaseArgs) -> anyhow::Result<()> {
    match args.command {
        CaseCommand::Report {
            reporter,
            description,
        } => {
            let outcome = app.cases.report_case(
                &app.ctx,
                NewCase {
                    description,
                    reporter: CitizenId(reporter),
                },
            )?;
            app.emit(&outcome, || match outcome.assigned_officer {
                Some(officer) => format!(
                    "Reported case {}, assigned officer {}",
                    outcome.case.id, officer
                ),
                None => format!("Reported case {}, waiting for an officer", outcome.case.id),
            })
        }
        CaseCommand::Resolve { id } => {
            let outcome = app.cases.resolve_case(&app.ctx, CaseId(id))?;
            app.emit(&outcome, || match (outcome.released_officer, outcome.next_case) {
                (Some(officer), Some(next)) => format!(
                    "Resolved case {}, officer {} moved to case {}",
                    id, officer, next
                ),
                (Some(officer), None) => {
                    format!("Resolved case {}, officer {} is available", id, officer)
                }
                (None, _) => format!("Resolved case {}", id),
            })
        }
        CaseCommand::Show { id } => {
            let case = app.cases.get_case(CaseId(id))?;
            app.emit(&case, || case_line(&case))
        }
        CaseCommand::List { waiting } => {
            let mut cases = app.cases.list_cases()?;
            if waiting {
                cases.retain(|c| c.is_pending_unassigned());
            }
            app.emit(&cases, || lines(&cases, case_line, "No cases"))
        }
    }
}
