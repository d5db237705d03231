//! Client actor.
//!
//! A client files tickets and follows up on its own tickets. Every call goes
//! through a client-scoped port, which refuses tickets the client does not own.

use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    ClientId, ConstructionError, Created, EntityIdType, ErrorContext, Identifiable, Response,
    ResultExt, Ticket, TicketId, TicketResult, Timestamp, ValidationError,
};
use tickettao_storage::ClientTicketAccess;
use tracing::info;

/// Read side of the client contract.
pub trait TicketReader {
    /// Fetch one of this client's tickets.
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket>;

    /// Every ticket this client has filed, oldest first.
    fn get_tickets(&self) -> TicketResult<Vec<Ticket>>;

    fn ticket_count(&self) -> TicketResult<usize>;
}

/// Write side of the client contract.
pub trait TicketWriter {
    /// File a new ticket and return its id.
    fn create_ticket(&self, title: &str, description: &str) -> TicketResult<TicketId>;

    /// Append a comment authored by this client. Moves the ticket to `InProgress`.
    fn add_comment(&self, ticket_id: TicketId, content: &str) -> TicketResult<()>;

    fn close_ticket(&self, ticket_id: TicketId) -> TicketResult<()>;
}

/// Full client capability set.
pub trait TicketClient:
    Identifiable<Id = ClientId> + Created + TicketReader + TicketWriter + Send + Sync
{
}

impl<T> TicketClient for T where
    T: Identifiable<Id = ClientId> + Created + TicketReader + TicketWriter + Send + Sync
{
}

/// Client bound to a client-scoped repository port.
#[derive(Clone)]
pub struct BasicClient {
    client_id: ClientId,
    created_at: Timestamp,
    repository: Arc<dyn ClientTicketAccess>,
}

impl BasicClient {
    /// Create a client with a fresh identity.
    pub fn new(repository: Option<Arc<dyn ClientTicketAccess>>) -> TicketResult<Self> {
        let repository = require_repository(repository).context(ErrorContext::CreatingClient)?;
        Ok(Self::bound(ClientId::now_v7(), chrono::Utc::now(), repository))
    }

    /// Rebuild a known client. The creation time is taken as stored.
    pub fn instantiate(
        client_id: ClientId,
        created_at: Timestamp,
        repository: Option<Arc<dyn ClientTicketAccess>>,
    ) -> TicketResult<Self> {
        let repository = require_repository(repository).context(ErrorContext::CreatingClient)?;
        if client_id.is_nil() {
            return Err(ValidationError::NilClientId).context(ErrorContext::CreatingClient);
        }
        Ok(Self::bound(client_id, created_at, repository))
    }

    pub(crate) fn bound(
        client_id: ClientId,
        created_at: Timestamp,
        repository: Arc<dyn ClientTicketAccess>,
    ) -> Self {
        Self {
            client_id,
            created_at,
            repository,
        }
    }

    fn fetch(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        self.repository
            .get_ticket(self.client_id, ticket_id)
            .context(ErrorContext::RetrievingTicket)
    }

    fn store(&self, ticket: &Ticket) -> TicketResult<()> {
        self.repository
            .update_ticket(self.client_id, ticket)
            .context(ErrorContext::UpdatingTicket)
    }

    fn close(&self, ticket_id: TicketId) -> TicketResult<()> {
        let mut ticket = self.fetch(ticket_id)?;
        ticket.close();
        self.store(&ticket)
    }
}

fn require_repository(
    repository: Option<Arc<dyn ClientTicketAccess>>,
) -> Result<Arc<dyn ClientTicketAccess>, ConstructionError> {
    repository.ok_or(ConstructionError::RepositoryNotProvided {
        component: "client ticket",
    })
}

impl fmt::Debug for BasicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicClient")
            .field("client_id", &self.client_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Identifiable for BasicClient {
    type Id = ClientId;

    fn id(&self) -> ClientId {
        self.client_id
    }
}

impl Created for BasicClient {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl TicketReader for BasicClient {
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        self.fetch(ticket_id)
    }

    fn get_tickets(&self) -> TicketResult<Vec<Ticket>> {
        self.repository
            .get_all_tickets(self.client_id)
            .context(ErrorContext::RetrievingTicket)
    }

    fn ticket_count(&self) -> TicketResult<usize> {
        self.repository
            .get_ticket_count(self.client_id)
            .context(ErrorContext::RetrievingTicket)
    }
}

impl TicketWriter for BasicClient {
    fn create_ticket(&self, title: &str, description: &str) -> TicketResult<TicketId> {
        let ticket = Ticket::create(title, description)?;
        self.repository
            .save_new_ticket(self.client_id, &ticket)
            .context(ErrorContext::CreatingTicket)?;
        info!(client_id = %self.client_id, ticket_id = %ticket.id(), "ticket created");
        Ok(ticket.id())
    }

    fn add_comment(&self, ticket_id: TicketId, content: &str) -> TicketResult<()> {
        if content.is_empty() {
            return Err(ValidationError::EmptyComment).context(ErrorContext::ValidatingComment);
        }
        let mut ticket = self.fetch(ticket_id)?;
        ticket.add_response(Response::create(self.client_id, content));
        self.store(&ticket)
    }

    fn close_ticket(&self, ticket_id: TicketId) -> TicketResult<()> {
        self.close(ticket_id).context(ErrorContext::ClosingTicket)?;
        info!(client_id = %self.client_id, %ticket_id, "ticket closed by client");
        Ok(())
    }
}
