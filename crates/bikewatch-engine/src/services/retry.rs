use bikewatch_core::core_types::schema::EVENT_RETRY;
use bikewatch_core::errors::ExResult;
use bikewatch_core::{EntityStore, Transition};
use bikewatch_core_types::RequestContext;

use crate::config::Config;

/// Bounded recompute-and-reapply on `Conflict`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; at least 1
    pub max_conflict_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_conflict_retries: config.max_conflict_retries.max(1),
        }
    }
}

/// A transition that was applied, and how many attempts it took
#[derive(Debug, Clone)]
pub(crate) struct Applied {
    pub transition: Transition,
    pub attempts: u32,
}

impl RetryPolicy {
    /// Plan and apply a transition, replanning from fresh reads on `Conflict`
    ///
    /// `plan` reads whatever it needs from the store and returns the
    /// transition; its errors are returned as-is. A no-op plan is not
    /// applied. After `max_conflict_retries` retries the last `Conflict` is
    /// returned.
    pub(crate) fn apply(
        &self,
        store: &dyn EntityStore,
        ctx: &RequestContext,
        op: &'static str,
        mut plan: impl FnMut(&dyn EntityStore) -> ExResult<Transition>,
    ) -> ExResult<Applied> {
        let mut attempts = 1;
        loop {
            let transition = plan(store)?;
            if transition.is_noop() {
                return Ok(Applied {
                    transition,
                    attempts,
                });
            }

            match store.apply_transition(&transition) {
                Ok(()) => {
                    return Ok(Applied {
                        transition,
                        attempts,
                    })
                }
                Err(e) if e.kind().is_retryable() && attempts <= self.max_conflict_retries => {
                    tracing::warn!(
                        op,
                        event = EVENT_RETRY,
                        attempt = attempts,
                        request_id = %ctx.request_id,
                        reason = e.message(),
                        "transition conflicted, recomputing"
                    );
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
