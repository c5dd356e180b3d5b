use bikewatch_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::model::{CaseId, CitizenId, OfficerId};

/// Result type alias using BikeWatchError
pub type Result<T> = std::result::Result<T, BikeWatchError>;

/// Result type alias using the structured ExError (store and service boundary)
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the API layer, the
/// CLI, tests) match on instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    AlreadyExists,

    // Lookup
    NotFound,

    // Assignment
    AlreadyResolved,
    /// A transition's preconditions no longer hold; retry from fresh reads
    Conflict,
    InvariantViolation,

    // Integration/IO
    Persistence,
    Config,
    Io,
    Serialization,

    // Bugs and unexpected states
    Internal,
}

impl ExErrorKind {
    /// Stable `ERR_*` code, safe to match on
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyResolved => "ERR_ALREADY_RESOLVED",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the failed operation may succeed if retried from fresh reads
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::Conflict)
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built with the `with_*` helpers.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Bare error of `kind`; context is added with the `with_*` builders
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Name the service or store operation that failed
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (e.g. `case:7`, `officer:3`)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Correlate with the request that produced it
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Correlate with an upstream trace
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Human-readable detail
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Shorthand for `self.kind().code()`
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " ({})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for assignment operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BikeWatchError {
    // ===== Lookup Errors =====
    /// Officer does not exist or was removed
    #[error("Officer not found: {officer_id}")]
    OfficerNotFound { officer_id: OfficerId },

    #[error("Case not found: {case_id}")]
    CaseNotFound { case_id: CaseId },

    #[error("Citizen not found: {citizen_id}")]
    CitizenNotFound { citizen_id: CitizenId },

    // ===== Assignment Errors =====
    /// Case was already marked found; resolving again must not release an officer twice
    #[error("Case {case_id} is already resolved")]
    AlreadyResolved { case_id: CaseId },

    /// A transition precondition no longer holds against the current state
    #[error("Conflicting concurrent update: {reason}")]
    Conflict { reason: String },

    /// An assignment invariant would be broken by the resulting state
    #[error("Assignment invariant {invariant} violated: {detail}")]
    InvariantViolation {
        invariant: &'static str,
        detail: String,
    },

    // ===== Input =====
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Email is already used by another active record of the same kind
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    // ===== Other =====
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<BikeWatchError> for ExError {
    fn from(err: BikeWatchError) -> Self {
        match err {
            BikeWatchError::OfficerNotFound { officer_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(format!("officer:{}", officer_id))
                    .with_message("Officer not found")
            }

            BikeWatchError::CaseNotFound { case_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("case:{}", case_id))
                .with_message("Case not found"),

            BikeWatchError::CitizenNotFound { citizen_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(format!("citizen:{}", citizen_id))
                    .with_message("Citizen not found")
            }

            BikeWatchError::AlreadyResolved { case_id } => {
                ExError::new(ExErrorKind::AlreadyResolved)
                    .with_entity_id(format!("case:{}", case_id))
                    .with_message("Case is already resolved")
            }

            BikeWatchError::Conflict { reason } => {
                ExError::new(ExErrorKind::Conflict).with_message(reason)
            }

            BikeWatchError::InvariantViolation { invariant, detail } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_message(format!("{}: {}", invariant, detail))
            }

            BikeWatchError::InvalidInput { field, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_message(format!("Invalid {}: {}", field, reason))
            }

            BikeWatchError::EmailTaken { email } => ExError::new(ExErrorKind::AlreadyExists)
                .with_message(format!("Email already registered: {}", email)),

            BikeWatchError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
