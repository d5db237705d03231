//! Responses attached to tickets

use crate::identity::{EntityId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A comment on a ticket, written by either a client or an agent.
///
/// Immutable once built. Two responses are equal when author, content and
/// timestamp all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    author_id: EntityId,
    content: String,
    timestamp: Timestamp,
}

impl Response {
    /// Create a response stamped with the current time.
    pub fn create(author_id: impl Into<EntityId>, content: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Rebuild a stored response.
    pub fn reconstruct(
        author_id: impl Into<EntityId>,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn author_id(&self) -> EntityId {
        self.author_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
