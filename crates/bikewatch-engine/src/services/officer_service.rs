use std::sync::Arc;
use std::time::Instant;

use bikewatch_core::assignment_engine::{on_officer_added, on_officer_removed};
use bikewatch_core::errors::ExResult;
use bikewatch_core::model::{NewOfficer, Officer, OfficerId};
use bikewatch_core::{log_op_end, log_op_error, log_op_start, EntityStore};
use bikewatch_core_types::RequestContext;

use super::outcome::{AddOfficerOutcome, RemoveOfficerOutcome};
use super::retry::RetryPolicy;
use super::{correlate, elapsed_ms, must_exist};

/// Officer roster management
#[derive(Clone)]
pub struct OfficerService {
    store: Arc<dyn EntityStore>,
    retry: RetryPolicy,
}

impl OfficerService {
    pub fn new(store: Arc<dyn EntityStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Add an officer and hand them the oldest pending case, if any
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: malformed name or email
    /// - `AlreadyExists`: email used by another active officer
    /// - `Conflict`: assignment kept conflicting past the retry limit
    /// - `Persistence`: store failure
    pub fn add_officer(
        &self,
        ctx: &RequestContext,
        new: NewOfficer,
    ) -> ExResult<AddOfficerOutcome> {
        log_op_start!("add_officer", request_id = %ctx.request_id);
        let start = Instant::now();

        let outcome = self.add_officer_impl(ctx, new).map_err(|e| {
            log_op_error!(
                "add_officer",
                e,
                duration_ms = elapsed_ms(start),
                request_id = %ctx.request_id
            );
            correlate(e, ctx)
        })?;

        log_op_end!(
            "add_officer",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            officer_id = outcome.officer.id.get(),
            case_id = ?outcome.assigned_case.map(|c| c.get()),
            attempt = outcome.attempts
        );

        Ok(outcome)
    }

    fn add_officer_impl(
        &self,
        ctx: &RequestContext,
        new: NewOfficer,
    ) -> ExResult<AddOfficerOutcome> {
        let officer_id = self.store.create_officer(new)?.id;
        let entity = format!("officer:{}", officer_id);

        let applied = self
            .retry
            .apply(self.store.as_ref(), ctx, "add_officer", |store| {
                let officer = must_exist(
                    store.get_officer(officer_id)?,
                    "add_officer",
                    entity.clone(),
                )?;
                Ok(on_officer_added(&officer, &store.assignment_view()?))
            })?;

        let officer = must_exist(self.store.get_officer(officer_id)?, "add_officer", entity)?;

        Ok(AddOfficerOutcome {
            assigned_case: officer.assigned_case(),
            officer,
            attempts: applied.attempts,
        })
    }

    /// Remove an officer, leaving any case they held pending
    ///
    /// The released case is not handed to another officer here; it is picked
    /// up by the next report, resolve or add event.
    ///
    /// # Errors
    ///
    /// - `NotFound`: unknown or already removed officer
    /// - `Conflict`: kept conflicting past the retry limit
    /// - `Persistence`: store failure
    pub fn remove_officer(
        &self,
        ctx: &RequestContext,
        officer_id: OfficerId,
    ) -> ExResult<RemoveOfficerOutcome> {
        log_op_start!(
            "remove_officer",
            request_id = %ctx.request_id,
            officer_id = officer_id.get()
        );
        let start = Instant::now();

        let outcome = self.remove_officer_impl(ctx, officer_id).map_err(|e| {
            log_op_error!(
                "remove_officer",
                e,
                duration_ms = elapsed_ms(start),
                request_id = %ctx.request_id,
                officer_id = officer_id.get()
            );
            correlate(e, ctx)
        })?;

        log_op_end!(
            "remove_officer",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            officer_id = officer_id.get(),
            case_id = ?outcome.released_case.map(|c| c.get()),
            attempt = outcome.attempts
        );

        Ok(outcome)
    }

    fn remove_officer_impl(
        &self,
        ctx: &RequestContext,
        officer_id: OfficerId,
    ) -> ExResult<RemoveOfficerOutcome> {
        let applied = self
            .retry
            .apply(self.store.as_ref(), ctx, "remove_officer", |store| {
                let officer = store.get_officer(officer_id)?;
                Ok(on_officer_removed(officer_id, officer.as_ref())?)
            })?;

        Ok(RemoveOfficerOutcome {
            officer_id,
            released_case: applied.transition.unlinks.first().map(|l| l.case),
            attempts: applied.attempts,
        })
    }

    /// Change an officer's display name without touching assignments
    ///
    /// # Errors
    /// `InvalidInput`, `NotFound`, `Persistence`.
    pub fn rename_officer(
        &self,
        ctx: &RequestContext,
        officer_id: OfficerId,
        name: String,
    ) -> ExResult<Officer> {
        log_op_start!(
            "rename_officer",
            request_id = %ctx.request_id,
            officer_id = officer_id.get()
        );
        let start = Instant::now();

        let officer = self
            .store
            .rename_officer(officer_id, name)
            .map_err(|e| {
                log_op_error!(
                    "rename_officer",
                    e,
                    duration_ms = elapsed_ms(start),
                    request_id = %ctx.request_id
                );
                correlate(e, ctx)
            })?;

        log_op_end!(
            "rename_officer",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            officer_id = officer_id.get()
        );

        Ok(officer)
    }

    /// Active officers by ascending id
    pub fn list_officers(&self) -> ExResult<Vec<Officer>> {
        self.store.list_officers()
    }
}
