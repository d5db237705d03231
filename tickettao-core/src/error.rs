//! Error types for TicketTao operations
//!
//! Errors are grouped by kind (validation, access, storage, construction,
//! config) and collected in [`TicketError`]. Operations that fail part-way
//! wrap the underlying error in a [`TicketError::Context`] marker, so callers
//! can ask both "what kind of failure is this" and "which step failed"
//! without matching on strings.

use crate::identity::{ClientId, TicketId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Entity type discriminator used in storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Ticket,
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticket title cannot be empty")]
    EmptyTitle,

    #[error("ticket status cannot be empty")]
    EmptyStatus,

    #[error("unknown ticket status: {value:?}")]
    InvalidStatus { value: String },

    #[error("nil ticket ID")]
    NilTicketId,

    #[error("nil client ID")]
    NilClientId,

    #[error("nil agent ID")]
    NilAgentId,

    #[error("creation time cannot be zero")]
    NilCreationTime,

    #[error("creation time {created_at} is in the future")]
    FutureCreationTime { created_at: Timestamp },

    #[error("response cannot be empty")]
    EmptyComment,
}

/// Access-control errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("ticket {ticket_id} is not accessible to client {client_id}")]
    TicketNotAccessible {
        client_id: ClientId,
        ticket_id: TicketId,
    },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Insert failed for {entity_type:?}: {reason}")]
    InsertFailed { entity_type: EntityType, reason: String },

    /// Raised by external drivers when their backing store fails.
    #[error("Storage backend error: {reason}")]
    Backend { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Errors raised while wiring actors and repositories together.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("{component} repository not provided")]
    RepositoryNotProvided { component: &'static str },

    #[error("ticket persistence driver not provided")]
    PersistenceNotProvided,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Tracing subscriber could not be installed: {reason}")]
    SubscriberInit { reason: String },
}

/// Marks the step an operation was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    CreatingTicket,
    RetrievingTicket,
    SavingNewTicket,
    UpdatingTicket,
    ValidatingComment,
    ClosingTicket,
    CreatingClient,
    CreatingAgent,
    InstantiatingAgent,
    CreatingClientRepository,
    CreatingAgentRepository,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::CreatingTicket => "error creating ticket",
            Self::RetrievingTicket => "error while retrieving ticket",
            Self::SavingNewTicket => "error saving new ticket for client",
            Self::UpdatingTicket => "error updating ticket",
            Self::ValidatingComment => "error while validating comment",
            Self::ClosingTicket => "error closing ticket",
            Self::CreatingClient => "error creating client",
            Self::CreatingAgent => "error creating agent",
            Self::InstantiatingAgent => "error instantiating agent",
            Self::CreatingClientRepository => "error creating client ticket repository",
            Self::CreatingAgentRepository => "error creating agent ticket repository",
        };
        f.write_str(msg)
    }
}

/// Coarse classification of the root cause of a [`TicketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Access,
    NotFound,
    Storage,
    Construction,
    Config,
}

/// Master error type for all TicketTao errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TicketError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{context}: {source}")]
    Context {
        context: ErrorContext,
        source: Box<TicketError>,
    },
}

impl TicketError {
    /// Wrap this error in a context marker.
    pub fn context(self, context: ErrorContext) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context markers stripped.
    pub fn root(&self) -> &TicketError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify the root cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Access(_) => ErrorKind::Access,
            Self::Storage(StorageError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Construction(_) => ErrorKind::Construction,
            Self::Config(_) => ErrorKind::Config,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// True if any layer of the chain carries the given context marker.
    pub fn has_context(&self, context: ErrorContext) -> bool {
        match self {
            Self::Context {
                context: own,
                source,
            } => *own == context || source.has_context(context),
            _ => false,
        }
    }

    /// Context markers from outermost to innermost.
    pub fn contexts(&self) -> Vec<ErrorContext> {
        let mut out = Vec::new();
        let mut current = self;
        while let Self::Context { context, source } = current {
            out.push(*context);
            current = source;
        }
        out
    }

    /// True if the root cause is exactly the given validation error.
    pub fn is_validation(&self, expected: &ValidationError) -> bool {
        matches!(self.root(), Self::Validation(e) if e == expected)
    }

    /// True if the root cause is a client trying to reach a ticket it does not own.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self.root(),
            Self::Access(AccessError::TicketNotAccessible { .. })
        )
    }
}

/// Result type alias for TicketTao operations.
pub type TicketResult<T> = Result<T, TicketError>;

/// Attach a context marker to the error side of a result.
pub trait ResultExt<T> {
    fn context(self, context: ErrorContext) -> TicketResult<T>;
}

impl<T, E: Into<TicketError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: ErrorContext) -> TicketResult<T> {
        self.map_err(|e| e.into().context(context))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::EntityIdType;
    use std::error::Error as _;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            entity_type: EntityType::Ticket,
            id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Entity not found"));
        assert!(msg.contains("Ticket"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_access_error_display() {
        let err = AccessError::TicketNotAccessible {
            client_id: ClientId::nil(),
            ticket_id: TicketId::nil(),
        };
        assert!(err.to_string().contains("not accessible"));
    }

    #[test]
    fn test_ticket_error_from_variants() {
        let validation = TicketError::from(ValidationError::EmptyTitle);
        assert!(matches!(validation, TicketError::Validation(_)));

        let storage = TicketError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, TicketError::Storage(_)));

        let construction = TicketError::from(ConstructionError::PersistenceNotProvided);
        assert!(matches!(construction, TicketError::Construction(_)));

        let config = TicketError::from(ConfigError::SubscriberInit {
            reason: "already set".to_string(),
        });
        assert!(matches!(config, TicketError::Config(_)));
    }

    #[test]
    fn test_context_preserves_kind_and_root() {
        let err = TicketError::from(ValidationError::NilTicketId)
            .context(ErrorContext::ValidatingComment)
            .context(ErrorContext::RetrievingTicket);

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.is_validation(&ValidationError::NilTicketId));
        assert!(!err.is_validation(&ValidationError::EmptyTitle));
        assert!(err.has_context(ErrorContext::ValidatingComment));
        assert!(err.has_context(ErrorContext::RetrievingTicket));
        assert!(!err.has_context(ErrorContext::ClosingTicket));
        assert_eq!(
            err.contexts(),
            vec![ErrorContext::RetrievingTicket, ErrorContext::ValidatingComment]
        );
    }

    #[test]
    fn test_context_exposes_source_chain() {
        let err = TicketError::from(StorageError::LockPoisoned).context(ErrorContext::UpdatingTicket);
        let source = err.source().expect("context should expose its source");
        assert!(source.to_string().contains("lock poisoned"));
        assert!(err.to_string().starts_with("error updating ticket"));
    }

    #[test]
    fn test_not_found_kind() {
        let err = TicketError::from(StorageError::NotFound {
            entity_type: EntityType::Ticket,
            id: Uuid::nil(),
        })
        .context(ErrorContext::RetrievingTicket);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_result_ext_wraps_plain_kind_errors() {
        let result: Result<(), ValidationError> = Err(ValidationError::EmptyComment);
        let err = result.context(ErrorContext::ValidatingComment).unwrap_err();
        assert!(err.has_context(ErrorContext::ValidatingComment));
        assert!(err.is_validation(&ValidationError::EmptyComment));
    }

    #[test]
    fn test_backend_error_is_storage_kind() {
        let err = TicketError::from(StorageError::Backend {
            reason: "connection reset".to_string(),
        })
        .context(ErrorContext::RetrievingTicket);
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_is_access_denied() {
        let err = TicketError::from(AccessError::TicketNotAccessible {
            client_id: ClientId::now_v7(),
            ticket_id: TicketId::now_v7(),
        })
        .context(ErrorContext::RetrievingTicket);
        assert!(err.is_access_denied());
        assert_eq!(err.kind(), ErrorKind::Access);
    }
}
