//! Agent actor.

use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    AgentId, ConstructionError, Created, EntityIdType, ErrorContext, Identifiable, Response,
    ResultExt, Ticket, TicketId, TicketResult, Timestamp, ValidationError,
};
use tickettao_storage::AgentTicketAccess;
use tracing::debug;

/// Capabilities every support agent has: read any ticket and answer it.
pub trait Agent: Identifiable<Id = AgentId> + Created + Send + Sync {
    /// Fetch any ticket. Fails with `ValidationError::NilTicketId` for the nil id.
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket>;

    /// Append an answer authored by this agent and persist the ticket.
    fn answer_ticket(&self, ticket_id: TicketId, content: &str) -> TicketResult<()>;
}

/// Agent bound to an agent-scoped repository port.
#[derive(Clone)]
pub struct BasicAgent {
    agent_id: AgentId,
    created_at: Timestamp,
    repository: Arc<dyn AgentTicketAccess>,
}

impl BasicAgent {
    pub fn new(repository: Option<Arc<dyn AgentTicketAccess>>) -> TicketResult<Self> {
        let repository = require_repository(repository).context(ErrorContext::CreatingAgent)?;
        Ok(Self::bound(AgentId::now_v7(), chrono::Utc::now(), repository))
    }

    /// Rebuild a known agent. The creation time is taken as stored.
    pub fn instantiate(
        agent_id: AgentId,
        created_at: Timestamp,
        repository: Option<Arc<dyn AgentTicketAccess>>,
    ) -> TicketResult<Self> {
        let repository =
            require_repository(repository).context(ErrorContext::InstantiatingAgent)?;
        if agent_id.is_nil() {
            return Err(ValidationError::NilAgentId).context(ErrorContext::InstantiatingAgent);
        }
        Ok(Self::bound(agent_id, created_at, repository))
    }

    pub(crate) fn bound(
        agent_id: AgentId,
        created_at: Timestamp,
        repository: Arc<dyn AgentTicketAccess>,
    ) -> Self {
        Self {
            agent_id,
            created_at,
            repository,
        }
    }
}

pub(crate) fn require_repository(
    repository: Option<Arc<dyn AgentTicketAccess>>,
) -> Result<Arc<dyn AgentTicketAccess>, ConstructionError> {
    repository.ok_or(ConstructionError::RepositoryNotProvided {
        component: "agent ticket",
    })
}

fn validate_answer(ticket_id: TicketId, content: &str) -> Result<(), ValidationError> {
    if ticket_id.is_nil() {
        return Err(ValidationError::NilTicketId);
    }
    if content.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(())
}

impl fmt::Debug for BasicAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAgent")
            .field("agent_id", &self.agent_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Identifiable for BasicAgent {
    type Id = AgentId;

    fn id(&self) -> AgentId {
        self.agent_id
    }
}

impl Created for BasicAgent {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl Agent for BasicAgent {
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        if ticket_id.is_nil() {
            return Err(ValidationError::NilTicketId.into());
        }
        self.repository
            .get_ticket(ticket_id)
            .context(ErrorContext::RetrievingTicket)
    }

    fn answer_ticket(&self, ticket_id: TicketId, content: &str) -> TicketResult<()> {
        validate_answer(ticket_id, content).context(ErrorContext::ValidatingComment)?;
        let mut ticket = self.get_ticket(ticket_id)?;
        ticket.add_response(Response::create(self.agent_id, content));
        self.repository
            .update_ticket(&ticket)
            .context(ErrorContext::UpdatingTicket)?;
        debug!(agent_id = %self.agent_id, %ticket_id, responses = ticket.responses().len(), "ticket answered");
        Ok(())
    }
}
