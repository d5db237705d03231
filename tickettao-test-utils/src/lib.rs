//! TicketTao Test Utilities
//!
//! Shared test infrastructure for the TicketTao workspace:
//! - Proptest generators for ids, statuses, responses and tickets
//! - Ready-made tickets and in-memory repositories
//! - Recording doubles for the client and agent repository ports
//! - Assertions on error kinds and context markers

pub use tickettao_core::{
    AgentId, ClientId, EntityIdType, ErrorContext, Identifiable, Response, StorageError, Ticket,
    TicketData, TicketError, TicketId, TicketResult, TicketStatus, Timestamp, ValidationError,
};
pub use tickettao_storage::{
    AgentTicketRepository, ClientTicketRepository, InMemoryTicketPersistence, TicketPersistence,
};

use chrono::Utc;
use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for TicketTao entity types.

    use super::*;
    use proptest::prelude::*;

    // === Identity Generators ===

    /// Generate a random non-nil UUID.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>()
            .prop_map(Uuid::from_bytes)
            .prop_filter("uuid must not be nil", |id| !id.is_nil())
    }

    pub fn arb_ticket_id() -> impl Strategy<Value = TicketId> {
        arb_uuid().prop_map(TicketId::new)
    }

    pub fn arb_client_id() -> impl Strategy<Value = ClientId> {
        arb_uuid().prop_map(ClientId::new)
    }

    pub fn arb_agent_id() -> impl Strategy<Value = AgentId> {
        arb_uuid().prop_map(AgentId::new)
    }

    /// Generate a timestamp safely in the past (2020-2025).
    pub fn arb_past_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1735689600i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    // === Value Generators ===

    pub fn arb_status() -> impl Strategy<Value = TicketStatus> {
        prop_oneof![
            Just(TicketStatus::Open),
            Just(TicketStatus::InProgress),
            Just(TicketStatus::Closed),
        ]
    }

    /// Generate a non-empty ticket title.
    pub fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,39}"
    }

    /// Generate a description, possibly empty.
    pub fn arb_description() -> impl Strategy<Value = String> {
        "[ -~]{0,80}"
    }

    /// Generate non-empty comment content.
    pub fn arb_comment() -> impl Strategy<Value = String> {
        "[ -~]{1,80}"
    }

    pub fn arb_response() -> impl Strategy<Value = Response> {
        (arb_uuid(), arb_comment(), arb_past_timestamp())
            .prop_map(|(author, content, at)| Response::reconstruct(author, content, at))
    }

    // === Entity Generators ===

    /// Generate stored ticket data that passes reconstruction.
    pub fn arb_ticket_data() -> impl Strategy<Value = TicketData> {
        (
            arb_title(),
            arb_description(),
            arb_status(),
            prop::collection::vec(arb_response(), 0..5),
        )
            .prop_map(|(title, description, status, responses)| {
                TicketData::new(title, description, status).with_responses(responses)
            })
    }

    /// Generate a valid ticket in any status.
    pub fn arb_ticket() -> impl Strategy<Value = Ticket> {
        (arb_ticket_id(), arb_past_timestamp(), arb_ticket_data()).prop_filter_map(
            "generated ticket must reconstruct",
            |(id, at, data)| Ticket::reconstruct(id, at, data).ok(),
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built tickets and stores for common scenarios.

    use super::*;
    use std::sync::Arc;

    /// A fresh ticket with no responses.
    pub fn open_ticket() -> Ticket {
        Ticket::create("Printer broken", "won't turn on").expect("fixture title is not empty")
    }

    /// A ticket with one client comment.
    pub fn in_progress_ticket() -> Ticket {
        let mut ticket = open_ticket();
        ticket.add_response(Response::create(ClientId::now_v7(), "any news?"));
        ticket
    }

    /// A ticket opened an hour ago, answered and closed.
    pub fn closed_ticket() -> Ticket {
        let created_at = Utc::now() - chrono::Duration::hours(1);
        let data = TicketData::new("VPN drops", "every few minutes", TicketStatus::Closed)
            .with_responses(vec![Response::reconstruct(
                AgentId::now_v7(),
                "Fixed by the router update",
                created_at + chrono::Duration::minutes(30),
            )]);
        Ticket::reconstruct(TicketId::now_v7(), created_at, data)
            .expect("fixture ticket data is valid")
    }

    /// Client and agent repositories sharing one in-memory store.
    #[derive(Clone)]
    pub struct InMemoryRepositories {
        pub persistence: Arc<InMemoryTicketPersistence>,
        pub clients: Arc<ClientTicketRepository>,
        pub agents: Arc<AgentTicketRepository>,
    }

    pub fn in_memory_repositories() -> InMemoryRepositories {
        let persistence = Arc::new(InMemoryTicketPersistence::new());
        let driver: Arc<dyn TicketPersistence> = persistence.clone();
        InMemoryRepositories {
            clients: Arc::new(
                ClientTicketRepository::new(Some(driver.clone()))
                    .expect("driver is provided"),
            ),
            agents: Arc::new(AgentTicketRepository::new(Some(driver)).expect("driver is provided")),
            persistence,
        }
    }
}

// ============================================================================
// REPOSITORY DOUBLES
// ============================================================================

pub mod doubles {
    //! Recording stand-ins for the repository ports.
    //!
    //! Both doubles keep tickets in a plain list, record every call and can be
    //! told to fail. Neither checks ownership.

    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tickettao_core::EntityType;
    use tickettao_storage::{
        AgentTicketReader, AgentTicketWriter, ClientTicketReader, ClientTicketWriter,
    };

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn not_found(ticket_id: TicketId) -> TicketError {
        StorageError::NotFound {
            entity_type: EntityType::Ticket,
            id: ticket_id.into(),
        }
        .into()
    }

    fn replace(tickets: &mut [Ticket], ticket: &Ticket) -> TicketResult<()> {
        let slot = tickets
            .iter_mut()
            .find(|t| t.id() == ticket.id())
            .ok_or_else(|| not_found(ticket.id()))?;
        *slot = ticket.clone();
        Ok(())
    }

    fn find(tickets: &[Ticket], ticket_id: TicketId) -> TicketResult<Ticket> {
        tickets
            .iter()
            .find(|t| t.id() == ticket_id)
            .cloned()
            .ok_or_else(|| not_found(ticket_id))
    }

    /// A call seen by [`SpyClientRepository`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ClientCall {
        GetTicket { client_id: ClientId, ticket_id: TicketId },
        GetAllTickets { client_id: ClientId },
        GetTicketCount { client_id: ClientId },
        SaveNewTicket { client_id: ClientId, ticket_id: TicketId },
        UpdateTicket { client_id: ClientId, ticket_id: TicketId },
    }

    /// Client port double that records calls.
    #[derive(Debug, Default)]
    pub struct SpyClientRepository {
        tickets: Mutex<Vec<Ticket>>,
        calls: Mutex<Vec<ClientCall>>,
        failure: Mutex<Option<TicketError>>,
    }

    impl SpyClientRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Preload a ticket.
        pub fn with_ticket(self, ticket: Ticket) -> Self {
            lock(&self.tickets).push(ticket);
            self
        }

        /// Make every following call fail with `error`.
        pub fn fail_with(&self, error: impl Into<TicketError>) {
            *lock(&self.failure) = Some(error.into());
        }

        pub fn calls(&self) -> Vec<ClientCall> {
            lock(&self.calls).clone()
        }

        pub fn stored(&self, ticket_id: TicketId) -> Option<Ticket> {
            find(&lock(&self.tickets), ticket_id).ok()
        }

        pub fn ticket_ids(&self) -> Vec<TicketId> {
            lock(&self.tickets).iter().map(Identifiable::id).collect()
        }

        fn record(&self, call: ClientCall) -> TicketResult<()> {
            lock(&self.calls).push(call);
            match lock(&self.failure).clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl ClientTicketReader for SpyClientRepository {
        fn get_ticket(&self, client_id: ClientId, ticket_id: TicketId) -> TicketResult<Ticket> {
            self.record(ClientCall::GetTicket {
                client_id,
                ticket_id,
            })?;
            find(&lock(&self.tickets), ticket_id)
        }

        fn get_all_tickets(&self, client_id: ClientId) -> TicketResult<Vec<Ticket>> {
            self.record(ClientCall::GetAllTickets { client_id })?;
            Ok(lock(&self.tickets).clone())
        }

        fn get_ticket_count(&self, client_id: ClientId) -> TicketResult<usize> {
            self.record(ClientCall::GetTicketCount { client_id })?;
            Ok(lock(&self.tickets).len())
        }
    }

    impl ClientTicketWriter for SpyClientRepository {
        fn save_new_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
            self.record(ClientCall::SaveNewTicket {
                client_id,
                ticket_id: ticket.id(),
            })?;
            lock(&self.tickets).push(ticket.clone());
            Ok(())
        }

        fn update_ticket(&self, client_id: ClientId, ticket: &Ticket) -> TicketResult<()> {
            self.record(ClientCall::UpdateTicket {
                client_id,
                ticket_id: ticket.id(),
            })?;
            replace(&mut lock(&self.tickets), ticket)
        }
    }

    /// A call seen by [`StubAgentRepository`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AgentCall {
        GetTicket(TicketId),
        UpdateTicket(TicketId),
    }

    /// Agent port double with configurable failures.
    #[derive(Debug, Default)]
    pub struct StubAgentRepository {
        tickets: Mutex<Vec<Ticket>>,
        calls: Mutex<Vec<AgentCall>>,
        updates: Mutex<Vec<Ticket>>,
        failure: Mutex<Option<TicketError>>,
        update_failure: Mutex<Option<TicketError>>,
    }

    impl StubAgentRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_ticket(self, ticket: Ticket) -> Self {
            lock(&self.tickets).push(ticket);
            self
        }

        /// Make every following call fail with `error`.
        pub fn fail_with(&self, error: impl Into<TicketError>) {
            *lock(&self.failure) = Some(error.into());
        }

        /// Make only updates fail; reads keep working.
        pub fn fail_updates_with(&self, error: impl Into<TicketError>) {
            *lock(&self.update_failure) = Some(error.into());
        }

        pub fn calls(&self) -> Vec<AgentCall> {
            lock(&self.calls).clone()
        }

        pub fn call_count(&self) -> usize {
            lock(&self.calls).len()
        }

        /// The last ticket passed to a successful update.
        pub fn last_update(&self) -> Option<Ticket> {
            lock(&self.updates).last().cloned()
        }

        fn record(&self, call: AgentCall) -> TicketResult<()> {
            lock(&self.calls).push(call);
            match lock(&self.failure).clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl AgentTicketReader for StubAgentRepository {
        fn get_ticket(&self, ticket_id: TicketId) -> TicketResult<Ticket> {
            self.record(AgentCall::GetTicket(ticket_id))?;
            find(&lock(&self.tickets), ticket_id)
        }
    }

    impl AgentTicketWriter for StubAgentRepository {
        fn update_ticket(&self, ticket: &Ticket) -> TicketResult<()> {
            self.record(AgentCall::UpdateTicket(ticket.id()))?;
            if let Some(err) = lock(&self.update_failure).clone() {
                return Err(err);
            }
            replace(&mut lock(&self.tickets), ticket)?;
            lock(&self.updates).push(ticket.clone());
            Ok(())
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions on TicketTao error chains and ticket state.

    use super::*;
    use tickettao_core::ErrorKind;

    /// Assert that the root cause is exactly `expected`.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(
        result: &TicketResult<T>,
        expected: &ValidationError,
    ) {
        match result {
            Err(err) if err.is_validation(expected) => {}
            other => panic!("Expected validation error {:?}, got: {:?}", expected, other),
        }
    }

    /// Assert that a client was refused a ticket it does not own.
    #[track_caller]
    pub fn assert_access_denied<T: std::fmt::Debug>(result: &TicketResult<T>) {
        match result {
            Err(err) if err.is_access_denied() => {}
            other => panic!("Expected access denied, got: {:?}", other),
        }
    }

    /// Assert that the error chain carries `context`.
    #[track_caller]
    pub fn assert_has_context<T: std::fmt::Debug>(result: &TicketResult<T>, context: ErrorContext) {
        match result {
            Err(err) if err.has_context(context) => {}
            other => panic!("Expected error marked {:?}, got: {:?}", context, other),
        }
    }

    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &TicketResult<T>) {
        match result {
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_status(ticket: &Ticket, expected: TicketStatus) {
        assert_eq!(
            ticket.status(),
            expected,
            "Ticket {} has status {}, expected {}",
            ticket.id(),
            ticket.status(),
            expected
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tickettao_core::Created;
    use tickettao_storage::{AgentTicketReader, ClientTicketReader, ClientTicketWriter};

    #[test]
    fn test_ticket_fixtures() {
        assertions::assert_status(&fixtures::open_ticket(), TicketStatus::Open);
        assertions::assert_status(&fixtures::in_progress_ticket(), TicketStatus::InProgress);
        let closed = fixtures::closed_ticket();
        assertions::assert_status(&closed, TicketStatus::Closed);
        assert!(closed.created_at() < Utc::now());
    }

    #[test]
    fn test_in_memory_repositories_share_one_store() -> TicketResult<()> {
        let repos = fixtures::in_memory_repositories();
        let client = ClientId::now_v7();
        let ticket = fixtures::open_ticket();

        repos.clients.save_new_ticket(client, &ticket)?;

        assert_eq!(repos.agents.get_ticket(ticket.id())?, ticket);
        assert_eq!(repos.persistence.ticket_count()?, 1);
        assertions::assert_access_denied(&repos.clients.get_ticket(ClientId::now_v7(), ticket.id()));
        Ok(())
    }

    #[test]
    fn test_spy_records_and_fails_on_demand() {
        let spy = doubles::SpyClientRepository::new();
        let client = ClientId::now_v7();
        spy.fail_with(StorageError::LockPoisoned);

        let result = spy.get_ticket_count(client);

        assert!(result.is_err());
        assert_eq!(
            spy.calls(),
            vec![doubles::ClientCall::GetTicketCount { client_id: client }]
        );
    }

    #[test]
    fn test_assertions_on_error_chain() {
        let result: TicketResult<()> = Err(TicketError::from(ValidationError::EmptyComment)
            .context(ErrorContext::ValidatingComment));
        assertions::assert_validation_error(&result, &ValidationError::EmptyComment);
        assertions::assert_has_context(&result, ErrorContext::ValidatingComment);
    }

    #[test]
    #[should_panic(expected = "Expected access denied")]
    fn test_assert_access_denied_panics_on_ok() {
        assertions::assert_access_denied(&Ok::<(), TicketError>(()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_ticket_is_valid(ticket in generators::arb_ticket()) {
            prop_assert!(!ticket.id().is_nil());
            prop_assert!(!ticket.title().is_empty());
            prop_assert!(ticket.created_at() < Utc::now());
        }

        #[test]
        fn prop_generated_ids_are_not_nil(
            client in generators::arb_client_id(),
            agent in generators::arb_agent_id(),
        ) {
            prop_assert!(!client.is_nil());
            prop_assert!(!agent.is_nil());
        }
    }
}
