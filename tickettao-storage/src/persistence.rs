//! Persistence driver port.
//!
//! A driver stores tickets together with their owning client and knows
//! nothing about access rules. The repositories in this crate sit on top of
//! a driver and enforce those rules.

use tickettao_core::{ClientId, Ticket, TicketId, TicketResult};

/// Storage backend for tickets.
pub trait TicketPersistence: Send + Sync {
    /// Insert a new ticket owned by `client_id`.
    fn save_new_ticket_for_client(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()>;

    /// The client recorded as owner of the ticket.
    fn get_ticket_owner(&self, ticket_id: TicketId) -> TicketResult<ClientId>;

    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket>;

    /// Replace the stored state of an existing ticket. The owner is unchanged.
    fn update_ticket(&self, ticket: &Ticket) -> TicketResult<()>;

    /// Tickets owned by the client, in the order they were saved.
    fn get_client_tickets(&self, client_id: ClientId) -> TicketResult<Vec<Ticket>>;

    fn get_client_ticket_count(&self, client_id: ClientId) -> TicketResult<usize>;
}
