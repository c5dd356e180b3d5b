use std::sync::Arc;
use std::time::Instant;

use bikewatch_core::errors::ExResult;
use bikewatch_core::model::{Citizen, NewCitizen};
use bikewatch_core::{log_op_end, log_op_error, log_op_start, EntityStore};
use bikewatch_core_types::RequestContext;

use super::{correlate, elapsed_ms};

/// Registration of the citizens who report cases
#[derive(Clone)]
pub struct CitizenService {
    store: Arc<dyn EntityStore>,
}

impl CitizenService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// `InvalidInput`, `AlreadyExists` (email in use), `Persistence`.
    pub fn register_citizen(&self, ctx: &RequestContext, new: NewCitizen) -> ExResult<Citizen> {
        log_op_start!("register_citizen", request_id = %ctx.request_id);
        let start = Instant::now();

        let citizen = self.store.create_citizen(new).map_err(|e| {
            log_op_error!(
                "register_citizen",
                e,
                duration_ms = elapsed_ms(start),
                request_id = %ctx.request_id
            );
            correlate(e, ctx)
        })?;

        log_op_end!(
            "register_citizen",
            duration_ms = elapsed_ms(start),
            request_id = %ctx.request_id,
            citizen_id = citizen.id.get()
        );

        Ok(citizen)
    }

    pub fn list_citizens(&self) -> ExResult<Vec<Citizen>> {
        self.store.list_citizens()
    }
}
