//! Types shared by the BikeWatch error and logging facilities
//!
//! - Correlation ids carried through every service call
//! - Canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
