//! BikeWatch CLI
//!
//! Command-line front end for officers, citizens and stolen-bike cases.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bikewatch")]
#[command(about = "BikeWatch - stolen bike cases and officer assignment", long_about = None)]
struct Cli {
    /// SQLite database file (overrides config and BIKEWATCH_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (default: ./bikewatch.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Officer roster operations
    Officer(commands::officer::OfficerArgs),
    /// Citizen registration
    Citizen(commands::citizen::CitizenArgs),
    /// Case intake and resolution
    Case(commands::case::CaseArgs),
}

fn main() {
    // No .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let app = commands::App::open(cli.config.as_deref(), cli.db, cli.json)?;

    match cli.command {
        Commands::Officer(args) => commands::officer::execute(&app, args),
        Commands::Citizen(args) => commands::citizen::execute(&app, args),
        Commands::Case(args) => commands::case::execute(&app, args),
    }
}
