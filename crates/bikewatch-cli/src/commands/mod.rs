//! Subcommand implementations and shared output helpers

pub mod case;
pub mod citizen;
pub mod officer;

use std::path::{Path, PathBuf};

use anyhow::Context;
use bikewatch_core::logging_facility;
use bikewatch_core::model::{Assignment, Case, CaseStatus, Citizen, Officer};
use bikewatch_core_types::RequestContext;
use bikewatch_engine::{
    open_store, CaseService, CitizenService, Config, OfficerService, RetryPolicy,
};
use serde::Serialize;

/// Services wired to the configured store, plus output settings
pub struct App {
    pub cases: CaseService,
    pub officers: OfficerService,
    pub citizens: CitizenService,
    /// One request per invocation
    pub ctx: RequestContext,
    json: bool,
}

impl App {
    /// Load config, apply the `--db` override, start logging and open the store
    pub fn open(
        config_path: Option<&Path>,
        db: Option<PathBuf>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let mut config = Config::load(config_path)?;
        if let Some(db) = db {
            config.db_path = db;
        }

        logging_facility::init(config.log_profile);

        let store = open_store(&config)
            .with_context(|| format!("opening database {}", config.db_path.display()))?;
        let retry = RetryPolicy::from(&config);

        Ok(Self {
            cases: CaseService::new(store.clone(), retry),
            officers: OfficerService::new(store.clone(), retry),
            citizens: CitizenService::new(store),
            ctx: RequestContext::new(),
            json,
        })
    }

    /// Print `value` as JSON, or its human rendering
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        human: impl FnOnce() -> String,
    ) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }
}

pub fn officer_line(officer: &Officer) -> String {
    let status = match officer.assignment {
        Assignment::Assigned(case) => format!("on case {}", case),
        Assignment::Unassigned => "available".to_string(),
    };
    format!(
        "officer {:>4}  {} <{}>  {}",
        officer.id, officer.name, officer.email, status
    )
}

pub fn citizen_line(citizen: &Citizen) -> String {
    format!("citizen {:>4}  {} <{}>", citizen.id, citizen.name, citizen.email)
}

pub fn case_line(case: &Case) -> String {
    let status = match case.status {
        CaseStatus::Resolved => "resolved".to_string(),
        CaseStatus::Pending(Assignment::Assigned(officer)) => format!("officer {}", officer),
        CaseStatus::Pending(Assignment::Unassigned) => "waiting".to_string(),
    };
    format!(
        "case {:>4}  [{}]  {}  (citizen {}, {})",
        case.id,
        status,
        case.description,
        case.reporter,
        case.reported_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// One line per item, or `empty` when there are none
pub fn lines<T>(items: &[T], render: fn(&T) -> String, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}
