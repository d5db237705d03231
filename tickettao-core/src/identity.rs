//! Identity types for TicketTao entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Untyped entity identifier. Response authors are stored this way since
/// either a client or an agent can write one.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Returns true for the zero timestamp (`Timestamp::default()`, the Unix epoch),
/// which marks a creation time that was never set.
pub fn is_unset_timestamp(ts: &Timestamp) -> bool {
    *ts == Timestamp::default()
}

/// Common behaviour of the strongly-typed id newtypes.
pub trait EntityIdType: Copy + Eq + fmt::Display {
    /// Wrap an existing UUID.
    fn new(id: Uuid) -> Self;

    /// The underlying UUID.
    fn as_uuid(&self) -> Uuid;

    /// Generate a fresh, timestamp-sortable id.
    fn now_v7() -> Self {
        Self::new(Uuid::now_v7())
    }

    /// The nil id. Never assigned to a live entity.
    fn nil() -> Self {
        Self::new(Uuid::nil())
    }

    fn is_nil(&self) -> bool {
        self.as_uuid().is_nil()
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl EntityIdType for $name {
            fn new(id: Uuid) -> Self {
                Self(id)
            }

            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a ticket.
    TicketId
);
entity_id!(
    /// Identifier of a client, the actor who opens tickets.
    ClientId
);
entity_id!(
    /// Identifier of an agent, the actor who answers tickets.
    AgentId
);

/// An entity with a stable identity.
pub trait Identifiable {
    type Id: EntityIdType;

    fn id(&self) -> Self::Id;
}

/// An entity that records when it was created.
pub trait Created {
    fn created_at(&self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_id_is_v7() {
        let id = new_entity_id();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_typed_ids_are_sortable() {
        let id1 = TicketId::now_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TicketId::now_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_nil_ids() {
        assert!(ClientId::nil().is_nil());
        assert!(!AgentId::now_v7().is_nil());
        assert_eq!(TicketId::nil().as_uuid(), Uuid::nil());
    }

    #[test]
    fn test_typed_id_converts_to_entity_id() {
        let client = ClientId::now_v7();
        let author: EntityId = client.into();
        assert_eq!(author, client.as_uuid());
        assert_eq!(client.to_string(), author.to_string());
    }

    #[test]
    fn test_unset_timestamp() {
        assert!(is_unset_timestamp(&Timestamp::default()));
        assert!(!is_unset_timestamp(&Utc::now()));
    }

    #[test]
    fn test_typed_id_serializes_as_plain_uuid() {
        let id = AgentId::now_v7();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
