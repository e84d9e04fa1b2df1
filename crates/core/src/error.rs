//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Infrastructure
/// concerns (storage, locking) are mapped into these kinds at the service
/// boundary, never surfaced raw.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced equipment, member, or reservation does not exist.
    #[error("not found")]
    NotFound,

    /// A loan window violated a Period invariant (past start, inverted
    /// window, window too long).
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// A non-positive quantity, or a quantity exceeding total inventory.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Granting the requested window/quantity would over-allocate the
    /// equipment during some overlapping instant.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The requested status change is not a permitted lifecycle edge.
    #[error("illegal status transition: {0}")]
    IllegalTransition(String),

    /// Mutation attempted on a returned (terminal) reservation.
    #[error("reservation is returned and can no longer be changed")]
    TerminalStateImmutable,

    /// Deletion attempted while the equipment is physically out.
    #[error("cannot delete a reservation that is in progress")]
    DeleteNotAllowed,

    /// A value failed validation (e.g. malformed or empty input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflict with existing state (e.g. duplicate name, record in use).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_period(msg: impl Into<String>) -> Self {
        Self::InvalidPeriod(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn capacity_exceeded(msg: impl Into<String>) -> Self {
        Self::CapacityExceeded(msg.into())
    }

    pub fn illegal_transition(msg: impl Into<String>) -> Self {
        Self::IllegalTransition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
