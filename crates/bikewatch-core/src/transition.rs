//! Transition types produced by the assignment engine
//!
//! A `Transition` is the complete set of changes one event implies. It is
//! applied by an `EntityStore` as a single atomic unit, in this order:
//!
//! 1. `unlinks` - each pair must currently be linked on both sides
//! 2. `resolve` - the case must exist, be unresolved and (after step 1) unassigned
//! 3. `remove_officer` - the officer must be active and (after step 1) unassigned
//! 4. `links` - the officer must be active and available, the case pending and unassigned
//!
//! A precondition that does not hold means the state moved on since the
//! transition was computed; the store reports `Conflict` and changes nothing.

use serde::{Deserialize, Serialize};

use crate::model::{CaseId, OfficerId};

/// An officer/case pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub officer: OfficerId,
    pub case: CaseId,
}

impl Link {
    pub fn new(officer: OfficerId, case: CaseId) -> Self {
        Self { officer, case }
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "officer:{}<->case:{}", self.officer, self.case)
    }
}

/// The mutating event a transition was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "id", rename_all = "snake_case")]
pub enum AssignmentEvent {
    CaseReported(CaseId),
    CaseResolved(CaseId),
    OfficerAdded(OfficerId),
    OfficerRemoved(OfficerId),
}

impl AssignmentEvent {
    /// Stable operation name used in logs and errors
    pub fn op(&self) -> &'static str {
        match self {
            AssignmentEvent::CaseReported(_) => "case_reported",
            AssignmentEvent::CaseResolved(_) => "case_resolved",
            AssignmentEvent::OfficerAdded(_) => "officer_added",
            AssignmentEvent::OfficerRemoved(_) => "officer_removed",
        }
    }
}

/// Changes implied by one assignment event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub event: AssignmentEvent,
    pub unlinks: Vec<Link>,
    pub resolve: Option<CaseId>,
    pub remove_officer: Option<OfficerId>,
    pub links: Vec<Link>,
}

impl Transition {
    /// An empty transition for the given event
    pub fn new(event: AssignmentEvent) -> Self {
        Self {
            event,
            unlinks: Vec::new(),
            resolve: None,
            remove_officer: None,
            links: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_unlink(mut self, link: Link) -> Self {
        self.unlinks.push(link);
        self
    }

    pub fn resolving(mut self, case: CaseId) -> Self {
        self.resolve = Some(case);
        self
    }

    pub fn removing(mut self, officer: OfficerId) -> Self {
        self.remove_officer = Some(officer);
        self
    }

    /// True if applying this transition changes nothing
    pub fn is_noop(&self) -> bool {
        self.unlinks.is_empty()
            && self.resolve.is_none()
            && self.remove_officer.is_none()
            && self.links.is_empty()
    }

    /// The case this officer ends up linked to, if the transition links it
    pub fn linked_case_for(&self, officer: OfficerId) -> Option<CaseId> {
        self.links
            .iter()
            .find(|l| l.officer == officer)
            .map(|l| l.case)
    }

    /// The officer this case ends up linked to, if the transition links it
    pub fn linked_officer_for(&self, case: CaseId) -> Option<OfficerId> {
        self.links.iter().find(|l| l.case == case).map(|l| l.officer)
    }

    /// One-line description for logs and CLI output
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        for l in &self.unlinks {
            parts.push(format!("unlink {}", l));
        }
        if let Some(case) = self.resolve {
            parts.push(format!("resolve case:{}", case));
        }
        if let Some(officer) = self.remove_officer {
            parts.push(format!("remove officer:{}", officer));
        }
        for l in &self.links {
            parts.push(format!("link {}", l));
        }
        if parts.is_empty() {
            format!("{}: no change", self.event.op())
        } else {
            format!("{}: {}", self.event.op(), parts.join(", "))
        }
    }
}
