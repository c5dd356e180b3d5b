use std::sync::Arc;
use std::time::Instant;

use bikewatch_core::assignment_engine::{on_case_reported, on_case_resolved};
use bikewatch_core::errors::{BikeWatchError, ExResult};
use bikewatch_core::model::{Case, CaseId, NewCase};
use bikewatch_core::{log_op_end, log_op_error, log_op_start, EntityStore};
use bikewatch_core_types::RequestContext;

use super::outcome::{ReportOutcome, ResolveOutcome};
use super::retry::RetryPolicy;
use super::{correlate, elapsed_ms, must_exist};

/// Case intake and resolution
///
/// Makes no assignment decisions itself: every link comes from the
/// assignment engine.
#[derive(Clone)]
pub struct CaseService {
    store: Arc<dyn EntityStore>,
    retry: RetryPolicy,
}

impl CaseService {
    pub fn new(store: Arc<dyn EntityStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Record a new case and assign the lowest-id available officer, if any
    ///
    /// The case is committed as pending before assignment is attempted, so a
    /// case is never lost because assignment conflicted.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: blank or oversized description
    /// - `NotFound`: unknown reporter
    /// - `Conflict`: assignment kept conflicting past the retry limit
    /// - `Persistence`: store failure
    pub fn report_case(&self, ctx: &RequestContext, new: NewCase) -> ExResult<ReportOutcome> {
        log_op_start!(
            "report_case",
            request_id = %ctx.request_id,
            citizen_id = new.reporter.get()
        );
        let start = Instant::now();

        let outcome = self.report_case_impl(ctx, new).map_err(|e| {
            log_op_error!(
                "report_case",
                e,
                duration_ms = elapsed_ms(start),
                request_id = %ctx.request_id
            );
            correlate(e, ctx)
        })?;

        log_op_end!(
            "report_case",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            case_id = outcome.case.id.get(),
            officer_id = ?outcome.assigned_officer.map(|o| o.get()),
            attempt = outcome.attempts
        );

        Ok(outcome)
    }

    fn report_case_impl(&self, ctx: &RequestContext, new: NewCase) -> ExResult<ReportOutcome> {
        let created = self.store.create_case(new)?;
        let case_id = created.id;

        let applied = self
            .retry
            .apply(self.store.as_ref(), ctx, "report_case", |store| {
                let case = must_exist(
                    store.get_case(case_id)?,
                    "report_case",
                    format!("case:{}", case_id),
                )?;
                Ok(on_case_reported(&case, &store.assignment_view()?))
            })?;

        let case = must_exist(
            self.store.get_case(case_id)?,
            "report_case",
            format!("case:{}", case_id),
        )?;

        Ok(ReportOutcome {
            assigned_officer: case.assigned_officer(),
            case,
            attempts: applied.attempts,
        })
    }

    /// Mark a case found, release its officer and hand them the oldest pending case
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown case
    /// - `AlreadyResolved`: the case was resolved before; nothing changes
    /// - `Conflict`: kept conflicting past the retry limit
    /// - `Persistence`: store failure
    pub fn resolve_case(&self, ctx: &RequestContext, case_id: CaseId) -> ExResult<ResolveOutcome> {
        log_op_start!(
            "resolve_case",
            request_id = %ctx.request_id,
            case_id = case_id.get()
        );
        let start = Instant::now();

        let outcome = self.resolve_case_impl(ctx, case_id).map_err(|e| {
            log_op_error!(
                "resolve_case",
                e,
                duration_ms = elapsed_ms(start),
                request_id = %ctx.request_id,
                case_id = case_id.get()
            );
            correlate(e, ctx)
        })?;

        log_op_end!(
            "resolve_case",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            case_id = case_id.get(),
            officer_id = ?outcome.released_officer.map(|o| o.get()),
            attempt = outcome.attempts
        );

        Ok(outcome)
    }

    fn resolve_case_impl(&self, ctx: &RequestContext, case_id: CaseId) -> ExResult<ResolveOutcome> {
        let applied = self
            .retry
            .apply(self.store.as_ref(), ctx, "resolve_case", |store| {
                let case = store.get_case(case_id)?;
                Ok(on_case_resolved(case_id, case.as_ref(), &store.assignment_view()?)?)
            })?;

        let released_officer = applied.transition.unlinks.first().map(|l| l.officer);
        let next_case = released_officer.and_then(|o| applied.transition.linked_case_for(o));

        Ok(ResolveOutcome {
            case_id,
            released_officer,
            next_case,
            attempts: applied.attempts,
        })
    }

    /// All cases by ascending id
    pub fn list_cases(&self) -> ExResult<Vec<Case>> {
        self.store.list_cases()
    }

    /// # Errors
    /// `NotFound` if no such case exists.
    pub fn get_case(&self, case_id: CaseId) -> ExResult<Case> {
        self.store
            .get_case(case_id)?
            .ok_or_else(|| BikeWatchError::CaseNotFound { case_id }.into())
    }
}
