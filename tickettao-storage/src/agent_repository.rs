//! Agent-scoped ticket repository.

use crate::persistence::TicketPersistence;
use crate::ports::{AgentTicketReader, AgentTicketWriter};
use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    ConstructionError, EntityIdType, ErrorContext, Identifiable, ResultExt, Ticket, TicketId,
    TicketResult, ValidationError,
};
use tracing::debug;

/// Agent port implementation on top of a persistence driver. Agents can
/// read and update any ticket, so no owner lookup happens here.
#[derive(Clone)]
pub struct AgentTicketRepository {
    persistence: Arc<dyn TicketPersistence>,
}

impl AgentTicketRepository {
    /// Fails with `ConstructionError::PersistenceNotProvided` when no driver is given.
    pub fn new(persistence: Option<Arc<dyn TicketPersistence>>) -> TicketResult<Self> {
        let persistence = persistence
            .ok_or(ConstructionError::PersistenceNotProvided)
            .context(ErrorContext::CreatingAgentRepository)?;
        Ok(Self { persistence })
    }
}

impl fmt::Debug for AgentTicketRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentTicketRepository").finish_non_exhaustive()
    }
}

impl AgentTicketReader for AgentTicketRepository {
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        if ticket_id.is_nil() {
            return Err(ValidationError::NilTicketId.into());
        }
        let ticket = self.persistence.get_ticket(ticket_id)?;
        debug!(%ticket_id, "agent ticket retrieved");
        Ok(ticket)
    }
}

impl AgentTicketWriter for AgentTicketRepository {
    fn update_ticket(&self, ticket: &Ticket) -> TicketResult<()> {
        self.persistence.update_ticket(ticket)?;
        debug!(ticket_id = %ticket.id(), status = %ticket.status(), "agent ticket updated");
        Ok(())
    }
}
