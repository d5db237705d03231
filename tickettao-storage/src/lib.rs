//! TicketTao Storage - Repository Ports and Persistence
//!
//! Defines the role-scoped ports clients and agents use to reach ticket
//! storage, the driver port a concrete store implements, repositories that
//! enforce access rules over a driver, and an in-memory driver.

pub mod agent_repository;
pub mod client_repository;
pub mod memory;
pub mod persistence;
pub mod ports;

pub use agent_repository::AgentTicketRepository;
pub use client_repository::ClientTicketRepository;
pub use memory::InMemoryTicketPersistence;
pub use persistence::TicketPersistence;
pub use ports::{
    AgentTicketAccess, AgentTicketReader, AgentTicketWriter, ClientTicketAccess,
    ClientTicketReader, ClientTicketWriter,
};
