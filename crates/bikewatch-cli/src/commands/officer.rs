use bikewatch_core::model::{NewOfficer, OfficerId};
use clap::{Args, Subcommand};

use super::{lines, officer_line, App};

#[derive(Debug, Args)]
pub struct OfficerArgs {
    #[command(subcommand)]
    pub command: OfficerCommand,
}

#[derive(Debug, Subcommand)]
pub enum OfficerCommand {
    /// Add an officer; they pick up the oldest waiting case
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Remove an officer; their case goes back to waiting
    Remove { id: i64 },

    /// Change an officer's display name
    Rename {
        id: i64,
        #[arg(long)]
        name: String,
    },

    /// List active officers
    List,
}

pub fn execute(app: &App, args: OfficerArgs) -> anyhow::Result<()> {
    match args.command {
        OfficerCommand::Add { name, email } => {
            let outcome = app
                .officers
                .add_officer(&app.ctx, NewOfficer { name, email })?;
            app.emit(&outcome, || match outcome.assigned_case {
                Some(case) => format!(
                    "Added officer {}, assigned case {}",
                    outcome.officer.id, case
                ),
                None => format!("Added officer {}, no case waiting", outcome.officer.id),
            })
        }
        OfficerCommand::Remove { id } => {
            let outcome = app.officers.remove_officer(&app.ctx, OfficerId(id))?;
            app.emit(&outcome, || match outcome.released_case {
                Some(case) => format!("Removed officer {}, case {} is waiting", id, case),
                None => format!("Removed officer {}", id),
            })
        }
        OfficerCommand::Rename { id, name } => {
            let officer = app.officers.rename_officer(&app.ctx, OfficerId(id), name)?;
            app.emit(&officer, || officer_line(&officer))
        }
        OfficerCommand::List => {
            let officers = app.officers.list_officers()?;
            app.emit(&officers, || lines(&officers, officer_line, "No officers"))
        }
    }
}
