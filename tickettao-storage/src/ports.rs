//! Role-scoped repository ports.
//!
//! Clients and agents reach ticket storage through separate traits. A client
//! port always takes the requesting client's id and only hands out tickets
//! that client owns; the agent port sees every ticket. No trait
//! combines the two.

use tickettao_core::{ClientId, Ticket, TicketId, TicketResult};

/// Read access for a client.
pub trait ClientTicketReader: Send + Sync {
    /// Fetch one ticket. Fails with `AccessError::TicketNotAccessible` if the
    /// ticket belongs to another client.
    fn get_ticket(&self, client_id: ClientId, ticket_id: TicketId) -> TicketResult<Ticket>;

    /// All tickets owned by the client, oldest first.
    fn get_all_tickets(&self, client_id: ClientId) -> TicketResult<Vec<Ticket>>;

    fn get_ticket_count(&self, client_id: ClientId) -> TicketResult<usize>;
}

/// Write access for a client.
pub trait ClientTicketWriter: Send + Sync {
    /// Persist a freshly created ticket, recording `client_id` as its owner.
    fn save_new_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()>;

    /// Persist changes to a ticket the client owns.
    fn update_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()>;
}

/// Everything a client may do against ticket storage.
pub trait ClientTicketAccess: ClientTicketReader + ClientTicketWriter {}

impl<T: ClientTicketReader + ClientTicketWriter + ?Sized> ClientTicketAccess for T {}

/// Read access for an agent. No ownership check.
pub trait AgentTicketReader: Send + Sync {
    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket>;
}

/// Write access for an agent.
pub trait AgentTicketWriter: Send + Sync {
    fn update_ticket(&self, ticket: &Ticket) -> TicketResult<()>;
}

/// Everything an agent may do against ticket storage.
pub trait AgentTicketAccess: AgentTicketReader + AgentTicketWriter {}

impl<T: AgentTicketReader + AgentTicketWriter + ?Sized> AgentTicketAccess for T {}
