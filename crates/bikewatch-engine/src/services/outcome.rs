//! What each mutating service call did

use bikewatch_core::model::{Case, CaseId, Officer, OfficerId};
use serde::Serialize;

/// Result of reporting a case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutcome {
    /// The case as stored after assignment
    pub case: Case,
    pub assigned_officer: Option<OfficerId>,
    pub attempts: u32,
}

/// Result of resolving a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveOutcome {
    pub case_id: CaseId,
    /// Officer that was working the case, if any
    pub released_officer: Option<OfficerId>,
    /// Case that officer was handed next, if any was pending
    pub next_case: Option<CaseId>,
    pub attempts: u32,
}

/// Result of adding an officer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOfficerOutcome {
    /// The officer as stored after assignment
    pub officer: Officer,
    pub assigned_case: Option<CaseId>,
    pub attempts: u32,
}

/// Result of removing an officer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveOfficerOutcome {
    pub officer_id: OfficerId,
    /// Case left pending by the removal
    pub released_case: Option<CaseId>,
    pub attempts: u32,
}
