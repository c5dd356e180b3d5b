//! Assignment invariants
//!
//! Each `find_*` function returns every violation of one rule so tests can
//! report them all; `check_assignments` returns the first as an error. The
//! checks only need the records themselves, so they run equally against the
//! in-memory ledger and against rows read back from SQLite.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors::{BikeWatchError, Result};
use crate::model::{Case, CaseId, Officer, OfficerId};
use crate::ops::Ledger;
use crate::transition::Link;

/// Officers referenced as assigned by more than one case
///
/// Returns list of (officer_id, case_ids) tuples
pub fn find_double_booked_officers<'a>(
    cases: impl IntoIterator<Item = &'a Case>,
) -> Vec<(OfficerId, Vec<CaseId>)> {
    let mut by_officer: BTreeMap<OfficerId, Vec<CaseId>> = BTreeMap::new();

    for case in cases {
        if let Some(officer) = case.assigned_officer() {
            by_officer.entry(officer).or_default().push(case.id);
        }
    }

    by_officer
        .into_iter()
        .filter(|(_, cases)| cases.len() > 1)
        .collect()
}

/// Cases claimed by more than one officer
///
/// Returns list of (case_id, officer_ids) tuples
pub fn find_double_staffed_cases<'a>(
    officers: impl IntoIterator<Item = &'a Officer>,
) -> Vec<(CaseId, Vec<OfficerId>)> {
    let mut by_case: BTreeMap<CaseId, Vec<OfficerId>> = BTreeMap::new();

    for officer in officers {
        if let Some(case) = officer.assigned_case() {
            by_case.entry(case).or_default().push(officer.id);
        }
    }

    by_case
        .into_iter()
        .filter(|(_, officers)| officers.len() > 1)
        .collect()
}

/// Officers still pointing at a case that has been resolved
pub fn find_officers_on_resolved_cases<'a>(
    officers: impl IntoIterator<Item = &'a Officer>,
    cases: impl IntoIterator<Item = &'a Case>,
) -> Vec<Link> {
    let resolved: BTreeSet<CaseId> = cases
        .into_iter()
        .filter(|c| c.is_resolved())
        .map(|c| c.id)
        .collect();

    officers
        .into_iter()
        .filter_map(|o| o.assigned_case().map(|c| Link::new(o.id, c)))
        .filter(|l| resolved.contains(&l.case))
        .collect()
}

/// Links recorded on one side only
///
/// A case naming an officer that does not name it back (or that is absent
/// or tombstoned), and an officer naming a case that does not name it back.
pub fn find_unmirrored_links<'a>(
    officers: impl IntoIterator<Item = &'a Officer>,
    cases: impl IntoIterator<Item = &'a Case>,
) -> Vec<Link> {
    let officers: HashMap<OfficerId, &Officer> = officers.into_iter().map(|o| (o.id, o)).collect();
    let cases: HashMap<CaseId, &Case> = cases.into_iter().map(|c| (c.id, c)).collect();
    let mut broken = BTreeSet::new();

    for case in cases.values() {
        if let Some(officer_id) = case.assigned_officer() {
            let mirrored = officers
                .get(&officer_id)
                .map(|o| o.active && o.assigned_case() == Some(case.id))
                .unwrap_or(false);
            if !mirrored {
                broken.insert(Link::new(officer_id, case.id));
            }
        }
    }

    for officer in officers.values() {
        if let Some(case_id) = officer.assigned_case() {
            let mirrored = officer.active
                && cases
                    .get(&case_id)
                    .map(|c| c.assigned_officer() == Some(officer.id))
                    .unwrap_or(false);
            if !mirrored {
                broken.insert(Link::new(officer.id, case_id));
            }
        }
    }

    broken.into_iter().collect()
}

/// The set of (officer, case) pairs currently linked, read from the case side
pub fn assignment_ledger<'a>(cases: impl IntoIterator<Item = &'a Case>) -> BTreeSet<Link> {
    cases
        .into_iter()
        .filter_map(|c| c.assigned_officer().map(|o| Link::new(o, c.id)))
        .collect()
}

/// Check every assignment invariant over a set of records
///
/// # Errors
/// Returns the first violation found as `InvariantViolation`.
pub fn check_assignments(officers: &[&Officer], cases: &[&Case]) -> Result<()> {
    if let Some((officer, case_ids)) = find_double_booked_officers(cases.iter().copied()).first() {
        return Err(BikeWatchError::InvariantViolation {
            invariant: "officer_single_case",
            detail: format!("officer {} assigned to cases {:?}", officer, case_ids),
        });
    }

    if let Some((case, officer_ids)) = find_double_staffed_cases(officers.iter().copied()).first()
    {
        return Err(BikeWatchError::InvariantViolation {
            invariant: "case_single_officer",
            detail: format!("case {} claimed by officers {:?}", case, officer_ids),
        });
    }

    if let Some(link) =
        find_officers_on_resolved_cases(officers.iter().copied(), cases.iter().copied()).first()
    {
        return Err(BikeWatchError::InvariantViolation {
            invariant: "resolved_case_unstaffed",
            detail: format!("{} but the case is resolved", link),
        });
    }

    if let Some(link) =
        find_unmirrored_links(officers.iter().copied(), cases.iter().copied()).first()
    {
        return Err(BikeWatchError::InvariantViolation {
            invariant: "link_mirrored",
            detail: format!("{} is recorded on one side only", link),
        });
    }

    Ok(())
}

/// Check every assignment invariant over an in-memory ledger, tombstones included
///
/// # Errors
/// Returns the first violation found as `InvariantViolation`.
pub fn check_ledger(ledger: &Ledger) -> Result<()> {
    let officers: Vec<&Officer> = ledger.officers.values().collect();
    let cases: Vec<&Case> = ledger.cases.values().collect();
    check_assignments(&officers, &cases)
}
