//! Session coordination: serialized transactions and fan-out to connections.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::game::{Action, Audience, GameError, Outbound, Session, SessionOptions};
use crate::util::id::new_connection_id;
use crate::ws::protocol::{ClientEvent, ServerEvent};

pub const DEFAULT_SESSION: &str = "default";

pub type ClientTx = mpsc::UnboundedSender<ServerEvent>;

#[derive(Debug)]
struct Client {
    tx: ClientTx,
    // name this connection joined as
    player: Option<String>,
}

/// Owns one [`Session`] and the connections watching it.
///
/// Each inbound event runs as one transaction under the session lock:
/// validate, mutate, snapshot, enqueue. The client table is only locked
/// while the session lock is held, so broadcasts leave in transaction order.
/// Enqueueing is unbounded and never waits on a socket.
#[derive(Debug)]
pub struct SessionCoordinator {
    id: String,
    session: Mutex<Session>,
    clients: Mutex<HashMap<String, Client>>,
}

impl SessionCoordinator {
    pub fn new(id: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            id: id.into(),
            session: Mutex::new(Session::new(options)),
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register a connection and send it the current state. Returns its id.
    pub fn connect(&self, tx: ClientTx) -> String {
        let conn = new_connection_id();
        let session = self.session.lock();
        let snapshot = session.snapshot();
        let mut clients = self.clients.lock();
        let _ = tx.send(ServerEvent::GameState(snapshot));
        clients.insert(conn.clone(), Client { tx, player: None });
        info!(session = %self.id, %conn, clients = clients.len(), "client connected");
        conn
    }

    /// Drop a connection; its player, if any, leaves the session.
    pub fn disconnect(&self, conn: &str) {
        let mut session = self.session.lock();
        let player = self.clients.lock().remove(conn).and_then(|c| c.player);
        info!(session = %self.id, %conn, player = ?player, "client disconnected");
        let Some(name) = player else { return };
        match session.leave(&name) {
            Ok(out) => self.deliver(conn, out),
            Err(err) => warn!(session = %self.id, %conn, error = %err, "leave failed"),
        }
    }

    pub fn handle(&self, conn: &str, event: ClientEvent) {
        if let ClientEvent::Ping = event {
            self.send_to(conn, ServerEvent::Pong);
            return;
        }
        let mut session = self.session.lock();
        match self.apply(&mut session, conn, event) {
            Ok(out) => self.deliver(conn, out),
            Err(err) => self.reject(conn, &err),
        }
    }

    /// Report a rejection to `conn` alone.
    pub fn reject(&self, conn: &str, err: &GameError) {
        debug!(session = %self.id, %conn, error = %err, "rejected");
        self.send_to(conn, ServerEvent::from(err));
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_idle(&self) -> bool {
        self.client_count() == 0 && self.session.lock().players().is_empty()
    }

    /// Read the session under its lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.session.lock())
    }

    fn apply(
        &self,
        session: &mut Session,
        conn: &str,
        event: ClientEvent,
    ) -> Result<Vec<Outbound>, GameError> {
        match event {
            ClientEvent::JoinGame { username } => {
                if let Some(bound) = self.bound_player(conn) {
                    return Err(GameError::AlreadyJoined(bound));
                }
                let out = session.join(&username)?;
                if let Some(client) = self.clients.lock().get_mut(conn) {
                    client.player = Some(username);
                }
                Ok(out)
            }
            ClientEvent::Ready { username } => {
                self.check_seat(conn, &username)?;
                session.set_ready(&username)
            }
            ClientEvent::Action(raw) => {
                let action = Action::try_from(raw)?;
                self.check_seat(conn, action.player())?;
                session.apply_action(action)
            }
            ClientEvent::RevealCard { username, card_index } => {
                self.check_seat(conn, &username)?;
                session.reveal(&username, card_index)
            }
            ClientEvent::Ping => Ok(Vec::new()),
        }
    }

    fn bound_player(&self, conn: &str) -> Option<String> {
        self.clients.lock().get(conn).and_then(|c| c.player.clone())
    }

    fn check_seat(&self, conn: &str, name: &str) -> Result<(), GameError> {
        match self.bound_player(conn) {
            Some(bound) if bound == name => Ok(()),
            _ => Err(GameError::NotYourSeat(name.to_string())),
        }
    }

    fn deliver(&self, conn: &str, out: Vec<Outbound>) {
        let clients = self.clients.lock();
        for Outbound { to, event } in out {
            let event = ServerEvent::from(event);
            match to {
                Audience::Everyone => {
                    for client in clients.values() {
                        let _ = client.tx.send(event.clone());
                    }
                }
                Audience::Caller => {
                    if let Some(client) = clients.get(conn) {
                        let _ = client.tx.send(event);
                    }
                }
            }
        }
    }

    fn send_to(&self, conn: &str, event: ServerEvent) {
        if let Some(client) = self.clients.lock().get(conn) {
            let _ = client.tx.send(event);
        }
    }
}

/// Sessions by id. The default session always exists.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<SessionCoordinator>>,
    options: SessionOptions,
}

impl SessionRegistry {
    pub fn new(options: SessionOptions) -> Self {
        let sessions = DashMap::new();
        sessions.insert(
            DEFAULT_SESSION.to_string(),
            Arc::new(SessionCoordinator::new(DEFAULT_SESSION, options)),
        );
        Self { sessions, options }
    }

    /// Resolve `id`, creating it if needed, and register a connection on it.
    ///
    /// Both happen under the map entry guard, so `prune_if_idle` cannot drop
    /// the session between lookup and connect.
    pub fn connect(&self, id: &str, tx: ClientTx) -> (Arc<SessionCoordinator>, String) {
        let entry = self.sessions.entry(id.to_string()).or_insert_with(|| {
            info!(session = %id, "session created");
            Arc::new(SessionCoordinator::new(id, self.options))
        });
        let session = entry.value().clone();
        let conn = session.connect(tx);
        drop(entry);
        (session, conn)
    }

    pub fn get(&self, id: &str) -> Option<Arc<SessionCoordinator>> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Forget `id` once nobody is connected or seated. The default session is kept.
    pub fn prune_if_idle(&self, id: &str) {
        if id == DEFAULT_SESSION {
            return;
        }
        if self.sessions.remove_if(id, |_, s| s.is_idle()).is_some() {
            info!(session = %id, "session removed");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
