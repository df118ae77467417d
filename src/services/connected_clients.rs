//! Registry of live WebSocket connections.
//!
//! One mutex guards the connection map; every change is fanned out to all
//! sockets through a broadcast channel. Each user holds at most one live
//! connection: registering again evicts the older socket.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

use crate::config::CLIENT_EVENTS_CAPACITY;
use crate::domain::User;

/// Event pushed to every connected socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Connection ids currently registered, in registration order
    ClientsUpdated(Vec<Uuid>),
    #[serde(rename_all = "camelCase")]
    MessageFromServer { full_name: String, message: String },
}

struct Entry {
    user_id: Uuid,
    full_name: String,
    seq: u64,
    evict: oneshot::Sender<()>,
}

#[derive(Default)]
struct Clients {
    next_seq: u64,
    by_connection: HashMap<Uuid, Entry>,
}

impl Clients {
    fn ids(&self) -> Vec<Uuid> {
        let mut entries: Vec<(&Uuid, &Entry)> = self.by_connection.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries.into_iter().map(|(id, _)| *id).collect()
    }
}

/// Handle returned to a newly registered socket.
pub struct Registration {
    pub connection_id: Uuid,
    /// Resolves when a newer connection of the same user replaced this one.
    pub evicted: oneshot::Receiver<()>,
}

pub struct ClientRegistry {
    clients: Mutex<Clients>,
    events: broadcast::Sender<ServerEvent>,
}

impl ClientRegistry {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            clients: Mutex::new(Clients::default()),
            events,
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    /// Add a connection for `user`, evicting any connection they already hold.
    pub fn register(&self, user: &User) -> Registration {
        let connection_id = Uuid::new_v4();
        let (evict, evicted) = oneshot::channel();

        let mut clients = self.clients.lock();

        let stale: Vec<Uuid> = clients
            .by_connection
            .iter()
            .filter(|(_, entry)| entry.user_id == user.id)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some(entry) = clients.by_connection.remove(&id) {
                tracing::debug!(connection_id = %id, user_id = %user.id, "Evicting previous connection");
                let _ = entry.evict.send(());
            }
        }

        let seq = clients.next_seq;
        clients.next_seq += 1;
        clients.by_connection.insert(
            connection_id,
            Entry {
                user_id: user.id,
                full_name: user.full_name.clone(),
                seq,
                evict,
            },
        );

        // Published under the lock so snapshots reach subscribers in order
        self.publish(ServerEvent::ClientsUpdated(clients.ids()));

        Registration {
            connection_id,
            evicted,
        }
    }

    /// Drop a connection. Returns false if it was already gone.
    pub fn remove(&self, connection_id: Uuid) -> bool {
        let mut clients = self.clients.lock();
        if clients.by_connection.remove(&connection_id).is_none() {
            return false;
        }

        self.publish(ServerEvent::ClientsUpdated(clients.ids()));
        true
    }

    /// Connection ids in registration order
    pub fn connected_clients(&self) -> Vec<Uuid> {
        self.clients.lock().ids()
    }

    pub fn full_name(&self, connection_id: Uuid) -> Option<String> {
        self.clients
            .lock()
            .by_connection
            .get(&connection_id)
            .map(|entry| entry.full_name.clone())
    }

    /// Relay a chat message from `connection_id` to every socket.
    ///
    /// Returns false when the sender is no longer registered.
    pub fn broadcast_message(&self, connection_id: Uuid, message: String) -> bool {
        let Some(full_name) = self.full_name(connection_id) else {
            return false;
        };

        self.publish(ServerEvent::MessageFromServer { full_name, message });
        true
    }

    fn publish(&self, event: ServerEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new(CLIENT_EVENTS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn user(full_name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", full_name.to_lowercase()),
            password_hash: "hash".to_string(),
            full_name: full_name.to_string(),
            is_active: true,
            roles: vec![UserRole::User],
        }
    }

    #[test]
    fn test_register_keeps_registration_order() {
        let registry = ClientRegistry::default();

        let first = registry.register(&user("Ana"));
        let second = registry.register(&user("Bob"));
        let third = registry.register(&user("Cid"));

        assert_eq!(
            registry.connected_clients(),
            vec![first.connection_id, second.connection_id, third.connection_id]
        );
    }

    #[tokio::test]
    async fn test_register_same_user_evicts_previous_connection() {
        let registry = ClientRegistry::default();
        let ana = user("Ana");

        let old = registry.register(&ana);
        let new = registry.register(&ana);

        assert_eq!(registry.connected_clients(), vec![new.connection_id]);
        assert!(old.evicted.await.is_ok());
        assert!(!registry.remove(old.connection_id));
    }

    #[tokio::test]
    async fn test_changes_are_broadcast() {
        let registry = ClientRegistry::default();
        let mut events = registry.subscribe();

        let reg = registry.register(&user("Ana"));
        assert_eq!(
            events.recv().await.unwrap(),
            ServerEvent::ClientsUpdated(vec![reg.connection_id])
        );

        assert!(registry.remove(reg.connection_id));
        assert_eq!(events.recv().await.unwrap(), ServerEvent::ClientsUpdated(vec![]));
    }

    #[tokio::test]
    async fn test_broadcast_message_uses_registered_name() {
        let registry = ClientRegistry::default();
        let reg = registry.register(&user("Ana"));
        let mut events = registry.subscribe();

        assert!(registry.broadcast_message(reg.connection_id, "hola".to_string()));
        assert_eq!(
            events.recv().await.unwrap(),
            ServerEvent::MessageFromServer {
                full_name: "Ana".to_string(),
                message: "hola".to_string(),
            }
        );

        assert!(!registry.broadcast_message(Uuid::new_v4(), "ghost".to_string()));
    }

    #[test]
    fn test_event_wire_format() {
        let id = Uuid::nil();
        let updated = serde_json::to_value(ServerEvent::ClientsUpdated(vec![id])).unwrap();
        assert_eq!(updated["event"], "clients-updated");
        assert_eq!(updated["payload"][0], id.to_string());

        let message = serde_json::to_value(ServerEvent::MessageFromServer {
            full_name: "Ana".to_string(),
            message: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(message["event"], "message-from-server");
        assert_eq!(message["payload"]["fullName"], "Ana");
        assert_eq!(message["payload"]["message"], "hi");
    }

    #[test]
    fn test_full_name_unknown_connection() {
        let registry = ClientRegistry::default();
        assert!(registry.full_name(Uuid::new_v4()).is_none());
    }
}
