//! Room-code lobby relay.
//!
//! Each lobby has one host and any number of guests. The relay stores the
//! last state blob published in a lobby, hands it to newcomers, and forwards
//! every update to the other members. It never interprets the blob.

use crate::protocol::{ClientMsg, ServerMsg};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use warp::ws::{Message, WebSocket};

pub const CODE_LEN: usize = 5;
const DEFAULT_HOST_NAME: &str = "Host";
const DEFAULT_GUEST_NAME: &str = "Player";

pub type ConnId = u64;

/// Refusals sent back to the offending connection as an `error` message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Unknown message type")]
    UnknownType,
    #[error("Lobby not found")]
    LobbyNotFound,
    #[error("Not in a lobby")]
    NotInLobby,
}

/// Work for a connection's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Msg(ServerMsg),
    Close,
}

pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

#[derive(Debug)]
struct Conn {
    tx: OutboundSender,
    name: String,
    lobby: Option<String>,
}

#[derive(Debug)]
struct Lobby {
    host: ConnId,
    members: Vec<ConnId>,
    state: Value,
}

#[derive(Debug, Default)]
struct RelayState {
    conns: HashMap<ConnId, Conn>,
    lobbies: HashMap<String, Lobby>,
}

impl RelayState {
    fn send(&self, conn: ConnId, out: Outbound) {
        if let Some(c) = self.conns.get(&conn) {
            // a closed receiver means the socket is already going away
            let _ = c.tx.send(out);
        }
    }

    fn send_to_others(&self, code: &str, except: ConnId, msg: &ServerMsg) {
        if let Some(lobby) = self.lobbies.get(code) {
            for member in lobby.members.iter().filter(|m| **m != except) {
                self.send(*member, Outbound::Msg(msg.clone()));
            }
        }
    }

    fn fresh_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
                .collect();
            if !self.lobbies.contains_key(&code) {
                return code;
            }
        }
    }

    /// Takes `conn` out of its lobby. A departing host closes the lobby.
    fn leave(&mut self, conn: ConnId) {
        let Some(c) = self.conns.get_mut(&conn) else {
            return;
        };
        let Some(code) = c.lobby.take() else {
            return;
        };
        let name = c.name.clone();
        let Some(lobby) = self.lobbies.get_mut(&code) else {
            return;
        };
        lobby.members.retain(|m| *m != conn);

        if lobby.host == conn {
            let Some(lobby) = self.lobbies.remove(&code) else {
                return;
            };
            tracing::info!(code = %code, guests = lobby.members.len(), "host left, closing lobby");
            for member in lobby.members {
                if let Some(guest) = self.conns.get_mut(&member) {
                    guest.lobby = None;
                }
                self.send(member, Outbound::Msg(ServerMsg::LobbyClosed));
                self.send(member, Outbound::Close);
            }
        } else {
            tracing::debug!(code = %code, name = %name, "guest left lobby");
            self.send_to_others(&code, conn, &ServerMsg::PlayerLeft { name });
        }
    }
}

/// All open connections and lobbies of one relay.
#[derive(Debug, Default)]
pub struct LobbyRegistry {
    inner: Mutex<RelayState>,
    next_id: AtomicU64,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation completes under the lock before any message is queued
    // on an unbounded channel, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a connection whose outgoing messages go to `tx`.
    pub fn connect(&self, tx: OutboundSender) -> ConnId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().conns.insert(
            id,
            Conn {
                tx,
                name: DEFAULT_GUEST_NAME.to_string(),
                lobby: None,
            },
        );
        tracing::debug!(conn = id, "relay connection opened");
        id
    }

    /// Handles one text frame; refusals are answered to the sender only.
    pub fn handle_text(&self, conn: ConnId, text: &str) {
        let result = ClientMsg::parse(text).and_then(|msg| self.handle(conn, msg));
        if let Err(err) = result {
            tracing::debug!(conn, error = %err, "relay message refused");
            self.lock().send(conn, Outbound::Msg(err.into()));
        }
    }

    pub fn handle(&self, conn: ConnId, msg: ClientMsg) -> Result<(), RelayError> {
        match msg {
            ClientMsg::CreateLobby { name } => {
                self.create_lobby(conn, name);
                Ok(())
            }
            ClientMsg::JoinLobby { code, name } => self.join_lobby(conn, code.as_deref(), name),
            ClientMsg::UpdateState { state } => self.update_state(conn, state),
        }
    }

    /// Opens a lobby hosted by `conn` and returns its code.
    pub fn create_lobby(&self, conn: ConnId, name: Option<String>) -> String {
        let mut state = self.lock();
        state.leave(conn);
        let code = state.fresh_code();
        if let Some(c) = state.conns.get_mut(&conn) {
            c.name = name.unwrap_or_else(|| DEFAULT_HOST_NAME.to_string());
            c.lobby = Some(code.clone());
        }
        state.lobbies.insert(
            code.clone(),
            Lobby {
                host: conn,
                members: vec![conn],
                state: Value::Object(Default::default()),
            },
        );
        tracing::info!(code = %code, conn, "lobby created");
        state.send(conn, Outbound::Msg(ServerMsg::LobbyCreated { code: code.clone() }));
        code
    }

    pub fn join_lobby(
        &self,
        conn: ConnId,
        code: Option<&str>,
        name: Option<String>,
    ) -> Result<(), RelayError> {
        let mut state = self.lock();
        let code = code
            .filter(|c| state.lobbies.contains_key(*c))
            .ok_or(RelayError::LobbyNotFound)?
            .to_string();

        let current = state.conns.get(&conn).and_then(|c| c.lobby.clone());
        if current.as_deref() == Some(code.as_str()) {
            let snapshot = state
                .lobbies
                .get(&code)
                .map(|lobby| lobby.state.clone())
                .unwrap_or_default();
            state.send(
                conn,
                Outbound::Msg(ServerMsg::JoinedLobby {
                    code,
                    state: snapshot,
                }),
            );
            return Ok(());
        }

        state.leave(conn);
        let Some(lobby) = state.lobbies.get_mut(&code) else {
            return Err(RelayError::LobbyNotFound);
        };
        lobby.members.push(conn);
        let snapshot = lobby.state.clone();

        let name = name.unwrap_or_else(|| DEFAULT_GUEST_NAME.to_string());
        if let Some(c) = state.conns.get_mut(&conn) {
            c.name = name.clone();
            c.lobby = Some(code.clone());
        }
        tracing::info!(code = %code, conn, name = %name, "player joined lobby");
        state.send(
            conn,
            Outbound::Msg(ServerMsg::JoinedLobby {
                code: code.clone(),
                state: snapshot,
            }),
        );
        state.send_to_others(&code, conn, &ServerMsg::PlayerJoined { name });
        Ok(())
    }

    /// Stores `blob` as the lobby state and forwards it to everyone else.
    pub fn update_state(&self, conn: ConnId, blob: Value) -> Result<(), RelayError> {
        let mut state = self.lock();
        let code = state
            .conns
            .get(&conn)
            .and_then(|c| c.lobby.clone())
            .ok_or(RelayError::NotInLobby)?;
        let lobby = state
            .lobbies
            .get_mut(&code)
            .ok_or(RelayError::NotInLobby)?;
        lobby.state = blob.clone();
        state.send_to_others(&code, conn, &ServerMsg::StateUpdate { state: blob });
        Ok(())
    }

    pub fn disconnect(&self, conn: ConnId) {
        let mut state = self.lock();
        state.leave(conn);
        state.conns.remove(&conn);
        tracing::debug!(conn, "relay connection closed");
    }

    pub fn lobby_count(&self) -> usize {
        self.lock().lobbies.len()
    }

    pub fn lobby_members(&self, code: &str) -> usize {
        self.lock()
            .lobbies
            .get(code)
            .map_or(0, |lobby| lobby.members.len())
    }
}

/// Drives one upgraded socket until either side closes it.
pub async fn client_connected(ws: WebSocket, registry: Arc<LobbyRegistry>) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut outbound = UnboundedReceiverStream::new(rx);
    let conn = registry.connect(tx);

    tokio::spawn(async move {
        while let Some(out) = outbound.next().await {
            let frame = match out {
                Outbound::Msg(msg) => match serde_json::to_string(&msg) {
                    Ok(text) => Message::text(text),
                    Err(err) => {
                        tracing::warn!(conn, error = %err, "cannot encode relay message");
                        continue;
                    }
                },
                Outbound::Close => {
                    let _ = ws_tx.send(Message::close()).await;
                    break;
                }
            };
            if ws_tx.send(frame).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(conn, error = %err, "relay socket error");
                break;
            }
        };
        if frame.is_close() {
            break;
        }
        if !(frame.is_text() || frame.is_binary()) {
            continue;
        }
        match std::str::from_utf8(frame.as_bytes()) {
            Ok(text) => registry.handle_text(conn, text),
            Err(_) => registry
                .lock()
                .send(conn, Outbound::Msg(RelayError::InvalidJson.into())),
        }
    }

    registry.disconnect(conn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Client {
        id: ConnId,
        rx: mpsc::UnboundedReceiver<Outbound>,
    }

    impl Client {
        fn connect(registry: &LobbyRegistry) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            Self {
                id: registry.connect(tx),
                rx,
            }
        }

        fn next(&mut self) -> Option<Outbound> {
            self.rx.try_recv().ok()
        }

        fn next_msg(&mut self) -> ServerMsg {
            match self.next() {
                Some(Outbound::Msg(msg)) => msg,
                other => panic!("expected a message, got {other:?}"),
            }
        }
    }

    fn host_lobby(registry: &LobbyRegistry) -> (Client, String) {
        let mut host = Client::connect(registry);
        registry.handle_text(host.id, r#"{"type":"createLobby","name":"Ana"}"#);
        let ServerMsg::LobbyCreated { code } = host.next_msg() else {
            panic!("expected lobbyCreated");
        };
        (host, code)
    }

    #[test]
    fn codes_are_five_uppercase_letters() {
        let registry = LobbyRegistry::new();
        let (_host, code) = host_lobby(&registry);
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(registry.lobby_count(), 1);
    }

    #[test]
    fn joiner_gets_current_state_and_others_hear_about_it() {
        let registry = LobbyRegistry::new();
        let (mut host, code) = host_lobby(&registry);
        registry
            .update_state(host.id, json!({"round": 2}))
            .unwrap();

        let mut guest = Client::connect(&registry);
        registry
            .join_lobby(guest.id, Some(&code), Some("Bo".into()))
            .unwrap();

        assert_eq!(
            guest.next_msg(),
            ServerMsg::JoinedLobby {
                code: code.clone(),
                state: json!({"round": 2})
            }
        );
        assert_eq!(
            host.next_msg(),
            ServerMsg::PlayerJoined { name: "Bo".into() }
        );
        assert_eq!(registry.lobby_members(&code), 2);
    }

    #[test]
    fn updates_skip_the_sender() {
        let registry = LobbyRegistry::new();
        let (mut host, code) = host_lobby(&registry);
        let mut a = Client::connect(&registry);
        let mut b = Client::connect(&registry);
        registry.join_lobby(a.id, Some(&code), None).unwrap();
        registry.join_lobby(b.id, Some(&code), None).unwrap();
        while host.next().is_some() {}
        while a.next().is_some() {}
        while b.next().is_some() {}

        registry.handle_text(a.id, r#"{"type":"updateState","state":{"turn":1}}"#);

        let update = ServerMsg::StateUpdate {
            state: json!({"turn": 1}),
        };
        assert_eq!(host.next_msg(), update);
        assert_eq!(b.next_msg(), update);
        assert!(a.next().is_none());
    }

    #[test]
    fn refusals_answer_only_the_sender() {
        let registry = LobbyRegistry::new();
        let (mut host, code) = host_lobby(&registry);
        let mut stranger = Client::connect(&registry);

        registry.handle_text(stranger.id, "not json");
        registry.handle_text(stranger.id, r#"{"type":"shout"}"#);
        registry.handle_text(stranger.id, r#"{"type":"joinLobby","code":"ZZZZZ"}"#);
        registry.handle_text(stranger.id, r#"{"type":"updateState","state":1}"#);

        for expected in [
            "Invalid JSON",
            "Unknown message type",
            "Lobby not found",
            "Not in a lobby",
        ] {
            assert_eq!(
                stranger.next_msg(),
                ServerMsg::Error {
                    message: expected.into()
                }
            );
        }
        assert!(host.next().is_none());
        assert_eq!(registry.lobby_members(&code), 1);
    }

    #[test]
    fn guest_leaving_is_announced() {
        let registry = LobbyRegistry::new();
        let (mut host, code) = host_lobby(&registry);
        let guest = Client::connect(&registry);
        registry.join_lobby(guest.id, Some(&code), None).unwrap();
        let _ = host.next();

        registry.disconnect(guest.id);

        assert_eq!(
            host.next_msg(),
            ServerMsg::PlayerLeft {
                name: "Player".into()
            }
        );
        assert_eq!(registry.lobby_count(), 1);
    }

    #[test]
    fn host_leaving_closes_the_lobby() {
        let registry = LobbyRegistry::new();
        let (host, code) = host_lobby(&registry);
        let mut guest = Client::connect(&registry);
        registry.join_lobby(guest.id, Some(&code), None).unwrap();
        let _ = guest.next();

        registry.disconnect(host.id);

        assert_eq!(guest.next_msg(), ServerMsg::LobbyClosed);
        assert_eq!(guest.next(), Some(Outbound::Close));
        assert_eq!(registry.lobby_count(), 0);
        assert_eq!(
            registry.update_state(guest.id, json!({})),
            Err(RelayError::NotInLobby)
        );
    }

    #[test]
    fn joining_elsewhere_leaves_the_previous_lobby() {
        let registry = LobbyRegistry::new();
        let (mut first_host, first) = host_lobby(&registry);
        let (_second_host, second) = host_lobby(&registry);
        let guest = Client::connect(&registry);
        registry.join_lobby(guest.id, Some(&first), None).unwrap();
        let _ = first_host.next();

        registry.join_lobby(guest.id, Some(&second), None).unwrap();

        assert!(matches!(
            first_host.next_msg(),
            ServerMsg::PlayerLeft { .. }
        ));
        assert_eq!(registry.lobby_members(&first), 1);
        assert_eq!(registry.lobby_members(&second), 2);
    }

    #[test]
    fn rejoining_the_current_lobby_keeps_it_open() {
        let registry = LobbyRegistry::new();
        let (mut host, code) = host_lobby(&registry);
        registry
            .update_state(host.id, json!({"round": 4}))
            .unwrap();
        let mut guest = Client::connect(&registry);
        registry.join_lobby(guest.id, Some(&code), None).unwrap();
        let _ = guest.next();
        let _ = host.next();

        registry.join_lobby(host.id, Some(&code), None).unwrap();

        assert_eq!(
            host.next_msg(),
            ServerMsg::JoinedLobby {
                code: code.clone(),
                state: json!({"round": 4})
            }
        );
        assert!(guest.next().is_none());
        assert_eq!(registry.lobby_count(), 1);
        assert_eq!(registry.lobby_members(&code), 2);
    }
}
