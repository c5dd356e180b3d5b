use bikewatch_core::model::NewCitizen;
use clap::{Args, Subcommand};

use super::{citizen_line, lines, App};

#[derive(Debug, Args)]
pub struct CitizenArgs {
    #[command(subcommand)]
    pub command: CitizenCommand,
}

#[derive(Debug, Subcommand)]
pub enum CitizenCommand {
    /// Register a citizen who can report cases
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// List registered citizens
    List,
}

pub fn execute(app: &App, args: CitizenArgs) -> anyhow::Result<()> {
    match args.command {
        CitizenCommand::Add { name, email } => {
            let citizen = app
                .citizens
                .register_citizen(&app.ctx, NewCitizen { name, email })?;
            app.emit(&citizen, || format!("Registered citizen {}", citizen.id))
        }
        CitizenCommand::List => {
            let citizens = app.citizens.list_citizens()?;
            app.emit(&citizens, || lines(&citizens, citizen_line, "No citizens"))
        }
    }
}
