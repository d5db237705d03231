//! TicketTao Core - Entity Types
//!
//! Tickets, responses and the identity and error types shared by every other
//! crate. Tickets own their status transitions; who may trigger them is
//! decided by the repository ports in `tickettao-storage` and the actors in
//! `tickettao-actors`.

pub mod config;
pub mod error;
pub mod identity;
pub mod response;
pub mod status;
pub mod ticket;

pub use config::{LogConfig, LogFormat, TicketingConfig};
pub use error::{
    AccessError, ConfigError, ConstructionError, EntityType, ErrorContext, ErrorKind, ResultExt,
    StorageError, TicketError, TicketResult, ValidationError,
};
pub use identity::{
    is_unset_timestamp, new_entity_id, AgentId, ClientId, Created, EntityId, EntityIdType,
    Identifiable, TicketId, Timestamp,
};
pub use response::Response;
pub use status::TicketStatus;
pub use ticket::{Ticket, TicketData};
