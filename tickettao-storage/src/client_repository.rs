//! Client-scoped ticket repository.

use crate::persistence::TicketPersistence;
use crate::ports::{ClientTicketReader, ClientTicketWriter};
use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    AccessError, ClientId, ConstructionError, EntityIdType, ErrorContext, Identifiable,
    ResultExt, Ticket, TicketId, TicketResult, ValidationError,
};
use tracing::{debug, warn};

/// Client port implementation on top of a persistence driver.
///
/// Every read and update first asks the driver who owns the ticket and
/// refuses the call when that is not the requesting client.
#[derive(Clone)]
pub struct ClientTicketRepository {
    persistence: Arc<dyn TicketPersistence>,
}

impl ClientTicketRepository {
    /// Fails with `ConstructionError::PersistenceNotProvided` when no driver is given.
    pub fn new(persistence: Option<Arc<dyn TicketPersistence>>) -> TicketResult<Self> {
        let persistence = persistence
            .ok_or(ConstructionError::PersistenceNotProvided)
            .context(ErrorContext::CreatingClientRepository)?;
        Ok(Self { persistence })
    }

    fn ensure_owner(&self, client_id: ClientId, ticket_id: TicketId) -> TicketResult<()> {
        let owner = self.persistence.get_ticket_owner(ticket_id)?;
        if owner != client_id {
            warn!(%client_id, %ticket_id, "client denied access to ticket it does not own");
            return Err(AccessError::TicketNotAccessible {
                client_id,
                ticket_id,
            }
            .into());
        }
        Ok(())
    }

    fn insert_checked(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
        require_client(client_id)?;
        if ticket.title().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        self.persistence.save_new_ticket_for_client(client_id, ticket)
    }
}

impl fmt::Debug for ClientTicketRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientTicketRepository").finish_non_exhaustive()
    }
}

fn require_client(client_id: ClientId) -> Result<(), ValidationError> {
    if client_id.is_nil() {
        return Err(ValidationError::NilClientId);
    }
    Ok(())
}

fn require_ticket(ticket_id: TicketId) -> Result<(), ValidationError> {
    if ticket_id.is_nil() {
        return Err(ValidationError::NilTicketId);
    }
    Ok(())
}

impl ClientTicketReader for ClientTicketRepository {
    fn get_ticket(&self, client_id: ClientId, ticket_id: TicketId) -> TicketResult<Ticket> {
        require_client(client_id)?;
        require_ticket(ticket_id)?;
        self.ensure_owner(client_id, ticket_id)?;
        let ticket = self.persistence.get_ticket(ticket_id)?;
        debug!(%client_id, %ticket_id, "client ticket retrieved");
        Ok(ticket)
    }

    fn get_all_tickets(&self, client_id: ClientId) -> TicketResult<Vec<Ticket>> {
        require_client(client_id)?;
        self.persistence.get_client_tickets(client_id)
    }

    fn get_ticket_count(&self, client_id: ClientId) -> TicketResult<usize> {
        require_client(client_id)?;
        self.persistence.get_client_ticket_count(client_id)
    }
}

impl ClientTicketWriter for ClientTicketRepository {
    fn save_new_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
        self.insert_checked(client_id, ticket)
            .context(ErrorContext::SavingNewTicket)?;
        debug!(%client_id, ticket_id = %ticket.id(), "new ticket saved");
        Ok(())
    }

    fn update_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
        require_client(client_id)?;
        self.ensure_owner(client_id, ticket.id())?;
        self.persistence.update_ticket(ticket)?;
        debug!(%client_id, ticket_id = %ticket.id(), status = %ticket.status(), "client ticket updated");
        Ok(())
    }
}
