//! Ticket entity

use crate::error::{ErrorContext, ResultExt, TicketError, TicketResult, ValidationError};
use crate::identity::{is_unset_timestamp, Created, EntityIdType, Identifiable, TicketId, Timestamp};
use crate::response::Response;
use crate::status::TicketStatus;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Mutable part of a ticket, as handed over by a persistence driver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketData {
    pub title: String,
    pub description: String,
    /// `None` stands for a missing status column and is rejected on reconstruction.
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl TicketData {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: TicketStatus,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: Some(status),
            responses: Vec::new(),
        }
    }

    pub fn with_responses(mut self, responses: Vec<Response>) -> Self {
        self.responses = responses;
        self
    }
}

/// A support ticket.
///
/// Tickets handed out by repositories are detached copies: changes made
/// through [`Ticket::add_response`] or [`Ticket::close`] only reach storage
/// once the ticket is saved back through a repository port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketRecord", into = "TicketRecord")]
pub struct Ticket {
    ticket_id: TicketId,
    created_at: Timestamp,
    title: String,
    description: String,
    status: TicketStatus,
    responses: Vec<Response>,
}

impl Ticket {
    /// Open a new ticket with a fresh id and the current time.
    pub fn create(title: impl Into<String>, description: impl Into<String>) -> TicketResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(TicketError::from(ValidationError::EmptyTitle)
                .context(ErrorContext::CreatingTicket));
        }
        Ok(Self {
            ticket_id: TicketId::now_v7(),
            created_at: Utc::now(),
            title,
            description: description.into(),
            status: TicketStatus::Open,
            responses: Vec::new(),
        })
    }

    /// Rebuild a ticket from stored state.
    ///
    /// The id must not be nil, the creation time must be set and not in the
    /// future, the title must not be empty and a status must be present.
    pub fn reconstruct(
        ticket_id: TicketId,
        created_at: Timestamp,
        data: TicketData,
    ) -> TicketResult<Self> {
        let status = validate_stored(ticket_id, created_at, &data)
            .context(ErrorContext::CreatingTicket)?;
        Ok(Self {
            ticket_id,
            created_at,
            title: data.title,
            description: data.description,
            status,
            responses: data.responses,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Responses in the order they were added.
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Append a response. The ticket moves to `InProgress` whatever its
    /// previous status, including `Closed`.
    pub fn add_response(&mut self, response: Response) {
        self.responses.push(response);
        self.status = TicketStatus::InProgress;
    }

    /// Close the ticket. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.status = TicketStatus::Closed;
    }

    /// Export the mutable state, suitable for [`Ticket::reconstruct`].
    pub fn data(&self) -> TicketData {
        TicketData {
            title: self.title.clone(),
            description: self.description.clone(),
            status: Some(self.status),
            responses: self.responses.clone(),
        }
    }
}

impl Identifiable for Ticket {
    type Id = TicketId;

    fn id(&self) -> TicketId {
        self.ticket_id
    }
}

impl Created for Ticket {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

fn validate_stored(
    ticket_id: TicketId,
    created_at: Timestamp,
    data: &TicketData,
) -> Result<TicketStatus, ValidationError> {
    if ticket_id.is_nil() {
        return Err(ValidationError::NilTicketId);
    }
    if is_unset_timestamp(&created_at) {
        return Err(ValidationError::NilCreationTime);
    }
    if created_at > Utc::now() {
        return Err(ValidationError::FutureCreationTime { created_at });
    }
    if data.title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    data.status.ok_or(ValidationError::EmptyStatus)
}

/// Flat serialized form of a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TicketRecord {
    ticket_id: TicketId,
    created_at: Timestamp,
    #[serde(flatten)]
    data: TicketData,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = TicketError;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        Ticket::reconstruct(record.ticket_id, record.created_at, record.data)
    }
}

impl From<Ticket> for TicketRecord {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id,
            created_at: ticket.created_at,
            data: TicketData {
                title: ticket.title,
                description: ticket.description,
                status: Some(ticket.status),
                responses: ticket.responses,
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
