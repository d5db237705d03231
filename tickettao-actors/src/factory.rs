//! Factories that bind actors to a repository port.
//!
//! A factory holds one port and hands it to every actor it builds, so the
//! presentation layer only wires storage once.

use crate::agent::{self, BasicAgent};
use crate::client::BasicClient;
use crate::closer::TicketCloser;
use std::fmt;
use std::sync::Arc;
use tickettao_core::{
    AgentId, ClientId, ConstructionError, EntityIdType, TicketResult, Timestamp,
};
use tickettao_storage::{AgentTicketAccess, ClientTicketAccess};

/// Builds clients bound to a client-scoped port.
#[derive(Clone)]
pub struct ClientFactory {
    repository: Arc<dyn ClientTicketAccess>,
}

impl ClientFactory {
    /// Fails with `ConstructionError::RepositoryNotProvided` when no port is given.
    pub fn new(repository: Option<Arc<dyn ClientTicketAccess>>) -> TicketResult<Self> {
        let repository = repository.ok_or(ConstructionError::RepositoryNotProvided {
            component: "client ticket",
        })?;
        Ok(Self { repository })
    }

    pub fn new_client(&self) -> BasicClient {
        BasicClient::bound(ClientId::now_v7(), chrono::Utc::now(), self.repository.clone())
    }

    pub fn instantiate_client(
        &self,
        client_id: ClientId,
        created_at: Timestamp,
    ) -> TicketResult<BasicClient> {
        BasicClient::instantiate(client_id, created_at, Some(self.repository.clone()))
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFactory").finish_non_exhaustive()
    }
}

/// Builds agents, plain or with the ticket-closing capability.
#[derive(Clone)]
pub struct AgentFactory {
    repository: Arc<dyn AgentTicketAccess>,
}

impl AgentFactory {
    /// Fails with `ConstructionError::RepositoryNotProvided` when no port is given.
    pub fn new(repository: Option<Arc<dyn AgentTicketAccess>>) -> TicketResult<Self> {
        let repository = agent::require_repository(repository)?;
        Ok(Self { repository })
    }

    pub fn new_agent(&self) -> BasicAgent {
        BasicAgent::bound(AgentId::now_v7(), chrono::Utc::now(), self.repository.clone())
    }

    pub fn instantiate_agent(
        &self,
        agent_id: AgentId,
        created_at: Timestamp,
    ) -> TicketResult<BasicAgent> {
        BasicAgent::instantiate(agent_id, created_at, Some(self.repository.clone()))
    }

    pub fn new_ticket_closer_agent(&self) -> TicketCloser<BasicAgent> {
        TicketCloser::new(self.new_agent(), self.repository.clone())
    }

    pub fn instantiate_ticket_closer_agent(
        &self,
        agent_id: AgentId,
        created_at: Timestamp,
    ) -> TicketResult<TicketCloser<BasicAgent>> {
        let agent = self.instantiate_agent(agent_id, created_at)?;
        Ok(TicketCloser::new(agent, self.repository.clone()))
    }
}

impl fmt::Debug for AgentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentFactory").finish_non_exhaustive()
    }
}
