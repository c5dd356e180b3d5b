//! Assignment engine boundary module.
//!
//! Pure decision logic: each function takes the records touched by one event
//! plus an `AssignmentView` read from the entity store, and returns the
//! `Transition` that event implies. Nothing here reads or writes a store.
//!
//! ## Selection rules
//!
//! - Case-side events (a case is reported) take the available officer with
//!   the lowest id.
//! - Officer-side events (an officer is added, or released by a resolved
//!   case) take the oldest pending unassigned case, ordered by
//!   `(reported_at, id)`.
//! - Removing an officer only releases its case. No other officer is pulled
//!   in; the case waits for the next report, resolve or add event.

mod view;

pub use view::{AssignmentView, PendingCase};

use crate::errors::{BikeWatchError, Result};
use crate::model::{Case, CaseId, Officer, OfficerId};
use crate::transition::{AssignmentEvent, Link, Transition};

/// A newly reported case: link it to the lowest-id available officer.
///
/// Having no available officer is a normal outcome and yields an empty
/// transition, as does a case that is no longer pending and unassigned.
pub fn on_case_reported(case: &Case, view: &AssignmentView) -> Transition {
    let transition = Transition::new(AssignmentEvent::CaseReported(case.id));

    if !case.is_pending_unassigned() {
        return transition;
    }

    match view.pick_officer() {
        Some(officer) => transition.with_link(Link::new(officer, case.id)),
        None => transition,
    }
}

/// A case was marked found.
///
/// Resolves the case, releases its officer (if any) and hands that same
/// officer the oldest pending unassigned case.
///
/// # Errors
///
/// - `CaseNotFound` if `case` is `None`
/// - `AlreadyResolved` if the case was resolved before; nothing is released twice
pub fn on_case_resolved(
    case_id: CaseId,
    case: Option<&Case>,
    view: &AssignmentView,
) -> Result<Transition> {
    let case = case.ok_or(BikeWatchError::CaseNotFound { case_id })?;

    if case.is_resolved() {
        return Err(BikeWatchError::AlreadyResolved { case_id: case.id });
    }

    let mut transition = Transition::new(AssignmentEvent::CaseResolved(case.id)).resolving(case.id);

    if let Some(officer) = case.assigned_officer() {
        transition = transition.with_unlink(Link::new(officer, case.id));

        if let Some(next) = view.oldest_pending(Some(case.id)) {
            transition = transition.with_link(Link::new(officer, next));
        }
    }

    Ok(transition)
}

/// A new officer joined: give them the oldest pending unassigned case.
pub fn on_officer_added(officer: &Officer, view: &AssignmentView) -> Transition {
    let transition = Transition::new(AssignmentEvent::OfficerAdded(officer.id));

    if !officer.is_available() {
        return transition;
    }

    match view.oldest_pending(None) {
        Some(case) => transition.with_link(Link::new(officer.id, case)),
        None => transition,
    }
}

/// An officer is being removed: release their case and tombstone them.
///
/// # Errors
///
/// - `OfficerNotFound` if `officer` is `None` or already removed
pub fn on_officer_removed(officer_id: OfficerId, officer: Option<&Officer>) -> Result<Transition> {
    let officer = officer
        .filter(|o| o.active)
        .ok_or(BikeWatchError::OfficerNotFound { officer_id })?;

    let mut transition = Transition::new(AssignmentEvent::OfficerRemoved(officer.id));

    if let Some(case) = officer.assigned_case() {
        transition = transition.with_unlink(Link::new(officer.id, case));
    }

    Ok(transition.removing(officer.id))
}
