//! In-memory persistence driver.

use crate::persistence::TicketPersistence;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tickettao_core::{
    ClientId, EntityType, Identifiable, StorageError, Ticket, TicketId, TicketResult,
};

#[derive(Debug, Clone)]
struct StoredTicket {
    owner: ClientId,
    ticket: Ticket,
}

#[derive(Debug, Default)]
struct Tables {
    tickets: HashMap<TicketId, StoredTicket>,
    by_client: HashMap<ClientId, Vec<TicketId>>,
}

/// In-memory ticket store for tests and single-process embedding.
///
/// Updates overwrite the stored snapshot; the last writer wins.
#[derive(Debug, Default)]
pub struct InMemoryTicketPersistence {
    tables: RwLock<Tables>,
}

impl InMemoryTicketPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets across all clients.
    pub fn ticket_count(&self) -> TicketResult<usize> {
        Ok(self.read()?.tickets.len())
    }

    /// Clear all stored data.
    pub fn clear(&self) -> TicketResult<()> {
        let mut tables = self.write()?;
        tables.tickets.clear();
        tables.by_client.clear();
        Ok(())
    }

    fn read(&self) -> TicketResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::LockPoisoned.into())
    }

    fn write(&self) -> TicketResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::LockPoisoned.into())
    }
}

fn not_found(ticket_id: TicketId) -> StorageError {
    StorageError::NotFound {
        entity_type: EntityType::Ticket,
        id: ticket_id.into(),
    }
}

impl TicketPersistence for InMemoryTicketPersistence {
    fn save_new_ticket_for_client(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
        let mut tables = self.write()?;
        let ticket_id = ticket.id();
        if tables.tickets.contains_key(&ticket_id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Ticket,
                reason: format!("ticket {ticket_id} already exists"),
            }
            .into());
        }
        tables.tickets.insert(
            ticket_id,
            StoredTicket {
                owner: client_id,
                ticket: ticket.clone(),
            },
        );
        tables.by_client.entry(client_id).or_default().push(ticket_id);
        Ok(())
    }

    fn get_ticket_owner(&self, ticket_id: TicketId) -> TicketResult<ClientId> {
        let tables = self.read()?;
        tables
            .tickets
            .get(&ticket_id)
            .map(|stored| stored.owner)
            .ok_or_else(|| not_found(ticket_id).into())
    }

    fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
        let tables = self.read()?;
        tables
            .tickets
            .get(&ticket_id)
            .map(|stored| stored.ticket.clone())
            .ok_or_else(|| not_found(ticket_id).into())
    }

    fn update_ticket(&self, ticket: &Ticket) -> TicketResult<()> {
        let mut tables = self.write()?;
        let stored = tables
            .tickets
            .get_mut(&ticket.id())
            .ok_or_else(|| not_found(ticket.id()))?;
        stored.ticket = ticket.clone();
        Ok(())
    }

    fn get_client_tickets(&self, client_id: ClientId) -> TicketResult<Vec<Ticket>> {
        let tables = self.read()?;
        let Some(ids) = tables.by_client.get(&client_id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| tables.tickets.get(id))
            .map(|stored| stored.ticket.clone())
            .collect())
    }

    fn get_client_ticket_count(&self, client_id: ClientId) -> TicketResult<usize> {
        let tables = self.read()?;
        Ok(tables.by_client.get(&client_id).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickettao_core::{EntityIdType, ErrorKind, Response, TicketError, TicketStatus};

    #[test]
    fn test_save_and_get_ticket() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let client = ClientId::now_v7();
        let ticket = Ticket::create("Printer broken", "won't turn on")?;

        store.save_new_ticket_for_client(client, &ticket)?;

        assert_eq!(store.get_ticket(ticket.id())?, ticket);
        assert_eq!(store.get_ticket_owner(ticket.id())?, client);
        assert_eq!(store.ticket_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_duplicate_insert_fails() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let client = ClientId::now_v7();
        let ticket = Ticket::create("title", "")?;
        store.save_new_ticket_for_client(client, &ticket)?;

        let err = store.save_new_ticket_for_client(client, &ticket).unwrap_err();
        assert!(matches!(
            err,
            TicketError::Storage(StorageError::InsertFailed { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_ticket_is_not_found() {
        let store = InMemoryTicketPersistence::new();
        let err = store.get_ticket(TicketId::now_v7()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = store.get_ticket_owner(TicketId::now_v7()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_replaces_snapshot_and_keeps_owner() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let client = ClientId::now_v7();
        let mut ticket = Ticket::create("title", "description")?;
        store.save_new_ticket_for_client(client, &ticket)?;

        ticket.add_response(Response::create(client, "any news?"));
        store.update_ticket(&ticket)?;

        let stored = store.get_ticket(ticket.id())?;
        assert_eq!(stored.status(), TicketStatus::InProgress);
        assert_eq!(stored.responses().len(), 1);
        assert_eq!(store.get_ticket_owner(ticket.id())?, client);
        Ok(())
    }

    #[test]
    fn test_update_unknown_ticket_fails() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let ticket = Ticket::create("title", "")?;
        let err = store.update_ticket(&ticket).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_client_tickets_in_save_order() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let client = ClientId::now_v7();
        let other = ClientId::now_v7();
        let first = Ticket::create("first", "")?;
        let second = Ticket::create("second", "")?;
        let foreign = Ticket::create("foreign", "")?;

        store.save_new_ticket_for_client(client, &first)?;
        store.save_new_ticket_for_client(other, &foreign)?;
        store.save_new_ticket_for_client(client, &second)?;

        let titles: Vec<String> = store
            .get_client_tickets(client)?
            .iter()
            .map(|t| t.title().to_string())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(store.get_client_ticket_count(client)?, 2);
        assert_eq!(store.get_client_ticket_count(ClientId::now_v7())?, 0);
        assert!(store.get_client_tickets(ClientId::now_v7())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_clear() -> TicketResult<()> {
        let store = InMemoryTicketPersistence::new();
        let client = ClientId::now_v7();
        store.save_new_ticket_for_client(client, &Ticket::create("title", "")?)?;
        store.clear()?;
        assert_eq!(store.ticket_count()?, 0);
        assert_eq!(store.get_client_ticket_count(client)?, 0);
        Ok(())
    }
}
