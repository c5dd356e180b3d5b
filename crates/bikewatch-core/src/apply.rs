//! Functional-boundary apply for transitions
//!
//! ## Atomicity Contract
//!
//! `apply_transition()` takes ownership of the current ledger and either
//! returns the new ledger with every step of the transition applied, or an
//! error. On error the caller keeps its original (or simply drops the
//! partially mutated copy); no step is ever half-committed.
//!
//! Every step re-checks its precondition against the ledger it is applied
//! to. A failed precondition is reported as `Conflict`: the transition was
//! computed from state that has since changed, and the caller should
//! recompute it from fresh reads.
//!
//! ## Example
//!
//! ```
//! use bikewatch_core::apply::apply_transition;
//! use bikewatch_core::model::{Case, CaseId, CitizenId, Officer, OfficerId};
//! use bikewatch_core::transition::{AssignmentEvent, Link, Transition};
//! use bikewatch_core::Ledger;
//!
//! let mut ledger = Ledger::new();
//! ledger.insert_officer(Officer::new(OfficerId(1), "Ada".into(), "ada@pd.test".into()));
//! ledger.insert_case(Case::new(CaseId(1), "Red bike".into(), CitizenId(1)));
//!
//! let t = Transition::new(AssignmentEvent::CaseReported(CaseId(1)))
//!     .with_link(Link::new(OfficerId(1), CaseId(1)));
//!
//! let ledger = apply_transition(ledger, &t).unwrap();
//! assert_eq!(ledger.get_case(CaseId(1)).unwrap().assigned_officer(), Some(OfficerId(1)));
//! ```

use crate::errors::{BikeWatchError, Result};
use crate::model::{Assignment, CaseId, CaseStatus, OfficerId};
use crate::ops::Ledger;
use crate::rules::invariants;
use crate::transition::{Link, Transition};

/// Apply a transition to a ledger, returning the new ledger state
///
/// Steps run in the order documented on `Transition`: unlinks, resolve,
/// officer removal, links. The resulting ledger is re-validated against
/// every assignment invariant before it is returned.
///
/// # Errors
///
/// * `Conflict` - A step's precondition does not hold against `state`
/// * `InvariantViolation` - The result would break an assignment invariant
pub fn apply_transition(mut state: Ledger, transition: &Transition) -> Result<Ledger> {
    for link in &transition.unlinks {
        unlink(&mut state, *link)?;
    }

    if let Some(case_id) = transition.resolve {
        resolve(&mut state, case_id)?;
    }

    if let Some(officer_id) = transition.remove_officer {
        remove_officer(&mut state, officer_id)?;
    }

    for link in &transition.links {
        link_pair(&mut state, *link)?;
    }

    invariants::check_ledger(&state)?;
    Ok(state)
}

fn conflict(reason: String) -> BikeWatchError {
    BikeWatchError::Conflict { reason }
}

/// Break an existing link; both sides must currently name each other
fn unlink(state: &mut Ledger, link: Link) -> Result<()> {
    let officer = state
        .get_officer_mut(link.officer)
        .map_err(|_| conflict(format!("officer {} vanished before unlink", link.officer)))?;
    if officer.assigned_case() != Some(link.case) {
        return Err(conflict(format!("{} is no longer linked", link)));
    }
    officer.assignment = Assignment::Unassigned;

    let case = state
        .get_case_mut(link.case)
        .map_err(|_| conflict(format!("case {} vanished before unlink", link.case)))?;
    if case.assigned_officer() != Some(link.officer) {
        return Err(conflict(format!("{} is no longer linked", link)));
    }
    case.status = CaseStatus::Pending(Assignment::Unassigned);

    Ok(())
}

/// Mark a case found; it must be unresolved and already released
fn resolve(state: &mut Ledger, case_id: CaseId) -> Result<()> {
    let case = state
        .get_case_mut(case_id)
        .map_err(|_| conflict(format!("case {} vanished before resolve", case_id)))?;

    match case.status {
        CaseStatus::Pending(Assignment::Unassigned) => {
            case.status = CaseStatus::Resolved;
            Ok(())
        }
        CaseStatus::Pending(Assignment::Assigned(officer)) => Err(conflict(format!(
            "case {} gained officer {} before resolve",
            case_id, officer
        ))),
        CaseStatus::Resolved => Err(conflict(format!(
            "case {} was resolved concurrently",
            case_id
        ))),
    }
}

/// Tombstone an officer; it must be active and already released
fn remove_officer(state: &mut Ledger, officer_id: OfficerId) -> Result<()> {
    let officer = state
        .get_officer_mut(officer_id)
        .map_err(|_| conflict(format!("officer {} was removed concurrently", officer_id)))?;

    if let Some(case) = officer.assigned_case() {
        return Err(conflict(format!(
            "officer {} picked up case {} before removal",
            officer_id, case
        )));
    }
    officer.active = false;
    Ok(())
}

/// Create a link; the officer must be available and the case pending and unassigned
fn link_pair(state: &mut Ledger, link: Link) -> Result<()> {
    let case_free = state
        .get_case(link.case)
        .map(|c| c.is_pending_unassigned())
        .unwrap_or(false);
    if !case_free {
        return Err(conflict(format!(
            "case {} is no longer pending and unassigned",
            link.case
        )));
    }

    let officer = state
        .get_officer_mut(link.officer)
        .map_err(|_| conflict(format!("officer {} was removed concurrently", link.officer)))?;
    if !officer.is_available() {
        return Err(conflict(format!("officer {} is no longer available", link.officer)));
    }
    officer.assignment = Assignment::Assigned(link.case);

    let case = state.get_case_mut(link.case)?;
    case.status = CaseStatus::Pending(Assignment::Assigned(link.officer));

    Ok(())
}
