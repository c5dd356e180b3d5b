//! SQLite-backed entity store
//!
//! One connection behind a mutex serialises callers within a process. Every
//! transition runs in a `BEGIN IMMEDIATE` transaction, which also serialises
//! writers across processes sharing the file. Each step is a guarded UPDATE
//! that must touch exactly one row; anything else means the plan is stale and
//! the whole transaction rolls back as `Conflict`.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use bikewatch_core::assignment_engine::{AssignmentView, PendingCase};
use bikewatch_core::errors::{BikeWatchError, ExError, ExErrorKind, ExResult};
use bikewatch_core::model::{
    Case, CaseId, Citizen, CitizenId, NewCase, NewCitizen, NewOfficer, Officer, OfficerId,
};
use bikewatch_core::rules::invariants;
use bikewatch_core::rules::validation::{validate_description, validate_email, validate_name};
use bikewatch_core::transition::{Link, Transition};
use bikewatch_core::EntityStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::rows::{
    case_from_row, citizen_from_row, officer_from_row, to_micros, CASE_COLUMNS, CITIZEN_COLUMNS,
    OFFICER_COLUMNS,
};
use crate::db;
use crate::errors::{apply_error, from_rusqlite, is_constraint_violation, Result};
use crate::migrations::apply_migrations;

/// Durable `EntityStore` over a single SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// Fresh private in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure and migrate an existing connection
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Re-check every assignment invariant over all rows, removed officers included
    ///
    /// # Errors
    /// `InvariantViolation` for the first broken rule, `Persistence` on read failure.
    pub fn verify_invariants(&self) -> Result<()> {
        let conn = self.lock()?;
        let officers: Vec<Officer> = query_all(
            &conn,
            &format!("SELECT {} FROM officers ORDER BY id", OFFICER_COLUMNS),
            officer_from_row,
        )?;
        let cases = query_all(
            &conn,
            &format!("SELECT {} FROM cases ORDER BY id", CASE_COLUMNS),
            case_from_row,
        )?;

        let officer_refs: Vec<&Officer> = officers.iter().collect();
        let case_refs: Vec<&Case> = cases.iter().collect();
        invariants::check_assignments(&officer_refs, &case_refs)
            .map_err(|e| ExError::from(e).with_op("verify_invariants"))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("sqlite_store_lock")
                .with_message("connection lock poisoned by a panicking writer")
        })
    }
}

fn query_all<T>(
    conn: &Connection,
    sql: &str,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], map)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn query_officer(conn: &Connection, id: OfficerId) -> Result<Option<Officer>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM officers WHERE id = ?1 AND active = 1",
            OFFICER_COLUMNS
        ),
        [id.get()],
        officer_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

fn query_case(conn: &Connection, id: CaseId) -> Result<Option<Case>> {
    conn.query_row(
        &format!("SELECT {} FROM cases WHERE id = ?1", CASE_COLUMNS),
        [id.get()],
        case_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

fn query_citizen(conn: &Connection, id: CitizenId) -> Result<Option<Citizen>> {
    conn.query_row(
        &format!("SELECT {} FROM citizens WHERE id = ?1", CITIZEN_COLUMNS),
        [id.get()],
        citizen_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

fn query_available(conn: &Connection) -> Result<Vec<OfficerId>> {
    query_all(
        conn,
        "SELECT id FROM officers WHERE active = 1 AND case_id IS NULL ORDER BY id",
        |row| Ok(OfficerId(row.get(0)?)),
    )
}

fn query_pending(conn: &Connection) -> Result<Vec<PendingCase>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM cases \
             WHERE resolved = 0 AND officer_id IS NULL \
             ORDER BY reported_at, id",
            CASE_COLUMNS
        ),
        |row| {
            let case = case_from_row(row)?;
            Ok(PendingCase::new(case.id, case.reported_at))
        },
    )
}

/// A row we just wrote must read back
fn written<T>(record: Option<T>, op: &str) -> Result<T> {
    record.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op.to_string())
            .with_message("row vanished immediately after insert")
    })
}

fn domain(err: BikeWatchError, op: &str) -> ExError {
    ExError::from(err).with_op(op.to_string())
}

/// A guarded UPDATE must touch exactly one row
fn exactly_one(changed: usize, reason: impl FnOnce() -> String) -> Result<()> {
    if changed == 1 {
        Ok(())
    } else {
        Err(ExError::from(BikeWatchError::Conflict { reason: reason() }))
    }
}

fn unlink(conn: &Connection, link: Link) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE officers SET case_id = NULL WHERE id = ?1 AND active = 1 AND case_id = ?2",
            params![link.officer.get(), link.case.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || format!("{} is no longer linked", link))?;

    let changed = conn
        .execute(
            "UPDATE cases SET officer_id = NULL WHERE id = ?1 AND resolved = 0 AND officer_id = ?2",
            params![link.case.get(), link.officer.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || format!("{} is no longer linked", link))
}

fn resolve(conn: &Connection, case_id: CaseId) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE cases SET resolved = 1 WHERE id = ?1 AND resolved = 0 AND officer_id IS NULL",
            [case_id.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || {
        format!("case {} is not unresolved and released", case_id)
    })
}

fn remove_officer(conn: &Connection, officer_id: OfficerId) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE officers SET active = 0 WHERE id = ?1 AND active = 1 AND case_id IS NULL",
            [officer_id.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || {
        format!("officer {} is not active and released", officer_id)
    })
}

fn link_pair(conn: &Connection, link: Link) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE cases SET officer_id = ?1 \
             WHERE id = ?2 AND resolved = 0 AND officer_id IS NULL",
            params![link.officer.get(), link.case.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || {
        format!("case {} is no longer pending and unassigned", link.case)
    })?;

    let changed = conn
        .execute(
            "UPDATE officers SET case_id = ?1 WHERE id = ?2 AND active = 1 AND case_id IS NULL",
            params![link.case.get(), link.officer.get()],
        )
        .map_err(apply_error)?;
    exactly_one(changed, || {
        format!("officer {} is no longer available", link.officer)
    })
}

impl EntityStore for SqliteStore {
    fn create_officer(&self, new: NewOfficer) -> ExResult<Officer> {
        const OP: &str = "create_officer";
        validate_name(&new.name).map_err(|e| domain(e, OP))?;
        validate_email(&new.email).map_err(|e| domain(e, OP))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO officers (name, email, active, created_at) VALUES (?1, ?2, 1, ?3)",
            params![new.name.trim(), new.email, to_micros(Utc::now())],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                domain(
                    BikeWatchError::EmailTaken {
                        email: new.email.clone(),
                    },
                    OP,
                )
            } else {
                from_rusqlite(e).with_op(OP)
            }
        })?;

        let id = OfficerId(conn.last_insert_rowid());
        written(query_officer(&conn, id)?, OP)
    }

    fn create_citizen(&self, new: NewCitizen) -> ExResult<Citizen> {
        const OP: &str = "create_citizen";
        validate_name(&new.name).map_err(|e| domain(e, OP))?;
        validate_email(&new.email).map_err(|e| domain(e, OP))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO citizens (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![new.name.trim(), new.email, to_micros(Utc::now())],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                domain(
                    BikeWatchError::EmailTaken {
                        email: new.email.clone(),
                    },
                    OP,
                )
            } else {
                from_rusqlite(e).with_op(OP)
            }
        })?;

        let id = CitizenId(conn.last_insert_rowid());
        written(query_citizen(&conn, id)?, OP)
    }

    fn create_case(&self, new: NewCase) -> ExResult<Case> {
        const OP: &str = "create_case";
        validate_description(&new.description).map_err(|e| domain(e, OP))?;

        let conn = self.lock()?;
        if query_citizen(&conn, new.reporter)?.is_none() {
            return Err(domain(
                BikeWatchError::CitizenNotFound {
                    citizen_id: new.reporter,
                },
                OP,
            ));
        }

        conn.execute(
            "INSERT INTO cases (description, reporter_id, reported_at) VALUES (?1, ?2, ?3)",
            params![new.description, new.reporter.get(), to_micros(Utc::now())],
        )
        .map_err(|e| from_rusqlite(e).with_op(OP))?;

        let id = CaseId(conn.last_insert_rowid());
        written(query_case(&conn, id)?, OP)
    }

    fn rename_officer(&self, id: OfficerId, name: String) -> ExResult<Officer> {
        const OP: &str = "rename_officer";
        validate_name(&name).map_err(|e| domain(e, OP))?;

        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE officers SET name = ?1 WHERE id = ?2 AND active = 1",
                params![name.trim(), id.get()],
            )
            .map_err(|e| from_rusqlite(e).with_op(OP))?;
        if changed == 0 {
            return Err(domain(BikeWatchError::OfficerNotFound { officer_id: id }, OP));
        }

        written(query_officer(&conn, id)?, OP)
    }

    fn get_officer(&self, id: OfficerId) -> ExResult<Option<Officer>> {
        let conn = self.lock()?;
        query_officer(&conn, id)
    }

    fn get_case(&self, id: CaseId) -> ExResult<Option<Case>> {
        let conn = self.lock()?;
        query_case(&conn, id)
    }

    fn get_citizen(&self, id: CitizenId) -> ExResult<Option<Citizen>> {
        let conn = self.lock()?;
        query_citizen(&conn, id)
    }

    fn list_officers(&self) -> ExResult<Vec<Officer>> {
        let conn = self.lock()?;
        query_all(
            &conn,
            &format!(
                "SELECT {} FROM officers WHERE active = 1 ORDER BY id",
                OFFICER_COLUMNS
            ),
            officer_from_row,
        )
    }

    fn list_cases(&self) -> ExResult<Vec<Case>> {
        let conn = self.lock()?;
        query_all(
            &conn,
            &format!("SELECT {} FROM cases ORDER BY id", CASE_COLUMNS),
            case_from_row,
        )
    }

    fn list_citizens(&self) -> ExResult<Vec<Citizen>> {
        let conn = self.lock()?;
        query_all(
            &conn,
            &format!("SELECT {} FROM citizens ORDER BY id", CITIZEN_COLUMNS),
            citizen_from_row,
        )
    }

    fn list_available_officers(&self) -> ExResult<Vec<OfficerId>> {
        let conn = self.lock()?;
        query_available(&conn)
    }

    fn list_pending_unassigned_cases(&self) -> ExResult<Vec<PendingCase>> {
        let conn = self.lock()?;
        query_pending(&conn)
    }

    fn apply_transition(&self, transition: &Transition) -> ExResult<()> {
        let op = transition.event.op();
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| apply_error(e).with_op(op))?;

        let steps = || -> Result<()> {
            for link in &transition.unlinks {
                unlink(&tx, *link)?;
            }
            if let Some(case_id) = transition.resolve {
                resolve(&tx, case_id)?;
            }
            if let Some(officer_id) = transition.remove_officer {
                remove_officer(&tx, officer_id)?;
            }
            for link in &transition.links {
                link_pair(&tx, *link)?;
            }
            Ok(())
        };

        // Dropping an uncommitted transaction rolls it back
        steps().map_err(|e| e.with_op(op))?;
        tx.commit().map_err(|e| apply_error(e).with_op(op))?;

        tracing::debug!(op, summary = %transition.summary(), "transition committed");
        Ok(())
    }

    fn assignment_view(&self) -> ExResult<AssignmentView> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let view = AssignmentView::new(query_available(&tx)?, query_pending(&tx)?);
        tx.commit().map_err(from_rusqlite)?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikewatch_core::transition::AssignmentEvent;

    fn store_with_case() -> (SqliteStore, Officer, Case) {
        let store = SqliteStore::open_in_memory().unwrap();
        let officer = store
            .create_officer(NewOfficer {
                name: " Ada ".to_string(),
                email: "ada@pd.test".to_string(),
            })
            .unwrap();
        let citizen = store
            .create_citizen(NewCitizen {
                name: "Sam".to_string(),
                email: "sam@mail.test".to_string(),
            })
            .unwrap();
        let case = store
            .create_case(NewCase {
                description: "Red bike".to_string(),
                reporter: citizen.id,
            })
            .unwrap();
        (store, officer, case)
    }

    #[test]
    fn test_created_records_read_back() {
        let (store, officer, case) = store_with_case();

        assert_eq!(officer.name, "Ada");
        assert!(officer.is_available());
        assert_eq!(store.get_officer(officer.id).unwrap(), Some(officer));
        assert_eq!(store.get_case(case.id).unwrap(), Some(case.clone()));
        assert!(case.is_pending_unassigned());
    }

    #[test]
    fn test_stale_link_rolls_back_whole_transition() {
        let (store, officer, case) = store_with_case();
        let link = Link::new(officer.id, case.id);

        // First step is valid, second links the same officer to a missing case
        let t = Transition::new(AssignmentEvent::CaseReported(case.id))
            .with_link(link)
            .with_link(Link::new(officer.id, CaseId(99)));

        let err = store.apply_transition(&t).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Conflict);
        assert_eq!(err.op(), Some("case_reported"));

        assert!(store.get_case(case.id).unwrap().unwrap().is_pending_unassigned());
        assert!(store.get_officer(officer.id).unwrap().unwrap().is_available());
        store.verify_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_email_is_already_exists() {
        let (store, _, _) = store_with_case();
        let err = store
            .create_officer(NewOfficer {
                name: "Other".to_string(),
                email: "ADA@pd.test".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_case_requires_known_reporter() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .create_case(NewCase {
                description: "Red bike".to_string(),
                reporter: CitizenId(5),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("citizen:5"));
    }
}
