//! Ticket-closing capability layered over any [`Agent`].

use crate::agent::Agent;
use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    AgentId, Created, EntityIdType, ErrorContext, Identifiable, ResultExt, Ticket, TicketId,
    TicketResult, Timestamp, ValidationError,
};
use tickettao_storage::AgentTicketAccess;
use tracing::info;

/// An agent that may also close tickets.
pub trait TicketCloserAgent: Agent {
    fn close_ticket(&self, ticket_id: TicketId) -> TicketResult<()>;
}

/// Wraps an agent and adds [`TicketCloserAgent::close_ticket`].
///
/// Identity and the base agent calls are forwarded to the wrapped agent.
#[derive(Clone)]
pub struct TicketCloser<A> {
    agent: A,
    repository: Arc<dyn AgentTicketAccess>,
}

impl<A: Agent> TicketCloser<A> {
    pub fn new(agent: A, repository: Arc<dyn AgentTicketAccess>) -> Self {
        Self { agent, repository }
    }

    pub fn inner(&self) -> &A {
        &self.agent
    }

    pub fn into_inner(self) -> A {
        self.agent
    }

    fn close(&self, ticket_id: TicketId) -> TicketResult<()> {
        if ticket_id.is_nil() {
            return Err(ValidationError::NilTicketId.into());
        }
        let mut ticket = self
            .repository
            .get_ticket(ticket_id)
            .context(ErrorContext::RetrievingTicket)?;
        ticket.close();
        self.repository
            .update_ticket(&ticket)
            .context(ErrorContext::UpdatingTicket)
    }
}

impl<A: fmt::Debug> fmt::Debug for TicketCloser<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketCloser")
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}

impl<A: Agent> Identifiable for TicketCloser<A> {
    type Id = AgentId;

    fn id(&self) -> AgentId {
        self.agent.id()
    }
}

impl<A: Agent> Created for TicketCloser<A> {
    fn created_at(&self) -> Timestamp {
        self.agent.created_at()
    }
}

impl<A: Agent> Agent for TicketCloser<A> {
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        self.agent.get_ticket(ticket_id)
    }

    fn answer_ticket(&self, ticket_id: TicketId, content: &str) -> TicketResult<()> {
        self.agent.answer_ticket(ticket_id, content)
    }
}

impl<A: Agent> TicketCloserAgent for TicketCloser<A> {
    fn close_ticket(&self, ticket_id: TicketId) -> TicketResult<()> {
        self.close(ticket_id).context(ErrorContext::ClosingTicket)?;
        info!(agent_id = %self.id(), %ticket_id, "ticket closed by agent");
        Ok(())
    }
}
