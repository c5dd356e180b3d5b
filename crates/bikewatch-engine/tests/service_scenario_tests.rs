//! Service Scenario Tests
//!
//! The case and officer services driven end to end over both store backends.
//!
//! ## Scenarios Covered
//!
//! 1. Report with no officers, then an officer joins
//! 2. Resolve hands the officer the oldest waiting case
//! 3. Remove releases the case and never reassigns it
//! 4. Resolve twice and unknown ids
//! 5. Rename leaves assignments alone
//! 6. Errors carry the request id

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use bikewatch_core::errors::ExErrorKind;
use bikewatch_core::model::{CaseId, CitizenId, OfficerId};
use bikewatch_core::{CaseStatus, EntityStore, MemoryStore};
use bikewatch_core_types::{RequestContext, RequestId};
use bikewatch_store::SqliteStore;
use common::*;

fn backends() -> Vec<(&'static str, Arc<dyn EntityStore>)> {
    vec![
        ("memory", Arc::new(MemoryStore::new())),
        ("sqlite", Arc::new(SqliteStore::open_in_memory().unwrap())),
    ]
}

#[test]
fn test_full_assignment_lifecycle() {
    for (backend, store) in backends() {
        let svc = Services::over(store);
        let reporter = svc.citizen("sam@mail.test");

        // GIVEN no officers WHEN C1 is reported THEN it waits
        let report = svc
            .cases
            .report_case(&ctx(), new_case(reporter, "Blue fixie"))
            .unwrap();
        let c1 = report.case.id;
        assert_eq!(report.assigned_officer, None, "{}", backend);
        assert!(report.case.is_pending_unassigned(), "{}", backend);

        // WHEN O1 joins THEN O1 takes C1
        let added = svc
            .officers
            .add_officer(&ctx(), new_officer("o1@pd.test"))
            .unwrap();
        let o1 = added.officer.id;
        assert_eq!(added.assigned_case, Some(c1), "{}", backend);
        assert_eq!(added.officer.assigned_case(), Some(c1), "{}", backend);

        // WHEN C1 is resolved with C2 waiting THEN O1 moves to C2
        let c2 = svc.report(reporter, "Green cruiser");
        let resolved = svc.cases.resolve_case(&ctx(), c1).unwrap();
        assert_eq!(resolved.released_officer, Some(o1), "{}", backend);
        assert_eq!(resolved.next_case, Some(c2), "{}", backend);
        assert_eq!(svc.cases.get_case(c1).unwrap().status, CaseStatus::Resolved);
        assert_eq!(svc.cases.get_case(c2).unwrap().assigned_officer(), Some(o1));

        // WHEN O1 is removed THEN C2 waits and O1 is gone
        let o2 = svc.officer("o2@pd.test");
        let removed = svc.officers.remove_officer(&ctx(), o1).unwrap();
        assert_eq!(removed.released_case, Some(c2), "{}", backend);
        assert!(svc.cases.get_case(c2).unwrap().is_pending_unassigned());
        let roster: Vec<_> = svc.officers.list_officers().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(roster, vec![o2], "{}", backend);

        // AND the available O2 was not pulled in by the removal
        assert!(svc.officers.list_officers().unwrap()[0].is_available());
    }
}

#[test]
fn test_report_picks_lowest_available_officer() {
    for (backend, store) in backends() {
        let svc = Services::over(store);
        let reporter = svc.citizen("sam@mail.test");
        let o1 = svc.officer("o1@pd.test");
        let o2 = svc.officer("o2@pd.test");
        let o3 = svc.officer("o3@pd.test");

        // O1 busy, O2 removed: O3 is the only candidate
        svc.report(reporter, "first");
        svc.officers.remove_officer(&ctx(), o2).unwrap();
        let report = svc
            .cases
            .report_case(&ctx(), new_case(reporter, "second"))
            .unwrap();

        assert_eq!(report.assigned_officer, Some(o3), "{}", backend);
        assert_ne!(report.assigned_officer, Some(o1));
    }
}

#[test]
fn test_resolve_twice_and_unknown_ids() {
    for (backend, store) in backends() {
        let svc = Services::over(store);
        let reporter = svc.citizen("sam@mail.test");
        let o1 = svc.officer("o1@pd.test");
        let c1 = svc.report(reporter, "Blue fixie");
        svc.cases.resolve_case(&ctx(), c1).unwrap();

        let err = svc.cases.resolve_case(&ctx(), c1).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyResolved, "{}", backend);
        assert!(svc.officers.list_officers().unwrap()[0].is_available());

        let err = svc.cases.resolve_case(&ctx(), CaseId(404)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);

        let err = svc.officers.remove_officer(&ctx(), OfficerId(o1.get() + 100)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }
}

#[test]
fn test_rename_keeps_assignment() {
    for (backend, store) in backends() {
        let svc = Services::over(store);
        let reporter = svc.citizen("sam@mail.test");
        let o1 = svc.officer("o1@pd.test");
        let c1 = svc.report(reporter, "Blue fixie");

        let renamed = svc
            .officers
            .rename_officer(&ctx(), o1, "Sgt. Angel".to_string())
            .unwrap();

        assert_eq!(renamed.name, "Sgt. Angel", "{}", backend);
        assert_eq!(renamed.assigned_case(), Some(c1), "{}", backend);

        let err = svc
            .officers
            .rename_officer(&ctx(), o1, "   ".to_string())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}

#[test]
fn test_invalid_reports_create_nothing() {
    for (backend, store) in backends() {
        let svc = Services::over(store);
        let reporter = svc.citizen("sam@mail.test");

        let err = svc
            .cases
            .report_case(&ctx(), new_case(reporter, "  "))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{}", backend);

        let err = svc
            .cases
            .report_case(&ctx(), new_case(CitizenId(reporter.get() + 100), "Blue fixie"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound, "{}", backend);

        assert!(svc.cases.list_cases().unwrap().is_empty());
    }
}

#[test]
fn test_errors_carry_request_id() {
    let svc = Services::over(Arc::new(MemoryStore::new()));
    let ctx = RequestContext::with_request_id(RequestId::from_string("req-42".to_string()));

    let err = svc.cases.resolve_case(&ctx, CaseId(1)).unwrap_err();

    assert_eq!(err.request_id().map(|r| r.as_str()), Some("req-42"));
    assert_eq!(err.entity_id(), Some("case:1"));
}
