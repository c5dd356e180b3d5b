//! Row hydration
//!
//! Converts database rows back into domain records. Timestamps are stored as
//! integer microseconds since the epoch so FIFO order survives a round trip.

use bikewatch_core::model::{
    Assignment, Case, CaseId, CaseStatus, Citizen, CitizenId, Officer, OfficerId,
};
use chrono::{DateTime, Utc};
use rusqlite::Row;

pub(crate) const OFFICER_COLUMNS: &str = "id, name, email, active, case_id, created_at";
pub(crate) const CASE_COLUMNS: &str =
    "id, description, reporter_id, reported_at, resolved, officer_id";
pub(crate) const CITIZEN_COLUMNS: &str = "id, name, email, created_at";

pub(crate) fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}

pub(crate) fn officer_from_row(row: &Row<'_>) -> rusqlite::Result<Officer> {
    let case_id: Option<i64> = row.get(4)?;
    Ok(Officer {
        id: OfficerId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        active: row.get::<_, i64>(3)? != 0,
        assignment: Assignment::from(case_id.map(CaseId)),
        created_at: timestamp(row, 5)?,
    })
}

pub(crate) fn case_from_row(row: &Row<'_>) -> rusqlite::Result<Case> {
    let resolved: i64 = row.get(4)?;
    let officer_id: Option<i64> = row.get(5)?;

    let status = if resolved != 0 {
        CaseStatus::Resolved
    } else {
        CaseStatus::Pending(Assignment::from(officer_id.map(OfficerId)))
    };

    Ok(Case {
        id: CaseId(row.get(0)?),
        description: row.get(1)?,
        reporter: CitizenId(row.get(2)?),
        reported_at: timestamp(row, 3)?,
        status,
    })
}

pub(crate) fn citizen_from_row(row: &Row<'_>) -> rusqlite::Result<Citizen> {
    Ok(Citizen {
        id: CitizenId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: timestamp(row, 3)?,
    })
}
