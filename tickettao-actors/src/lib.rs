//! TicketTao Actors - Clients, Agents and Factories
//!
//! The callable surface of the ticketing core:
//! - [`BasicClient`] files tickets and follows up on its own tickets
//! - [`BasicAgent`] reads and answers any ticket
//! - [`TicketCloser`] layers ticket closing over any [`Agent`]
//! - [`ClientFactory`] and [`AgentFactory`] bind actors to a repository port
//!
//! Actors load a ticket through their port, change it in memory and write it
//! back. They keep no ticket state between calls.

pub mod agent;
pub mod client;
pub mod closer;
pub mod factory;
pub mod telemetry;

pub use agent::{Agent, BasicAgent};
pub use client::{BasicClient, TicketClient, TicketReader, TicketWriter};
pub use closer::{TicketCloser, TicketCloserAgent};
pub use factory::{AgentFactory, ClientFactory};
pub use telemetry::init_tracing;
