//! Wire messages of the lobby relay on `/ws`.
//!
//! Every frame is one JSON object tagged by `type`. The relay never looks
//! inside `state`: it is whatever the host's client chose to publish.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::relay::RelayError;

/// Messages a browser sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    CreateLobby {
        #[serde(default)]
        name: Option<String>,
    },
    JoinLobby {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    UpdateState {
        #[serde(default)]
        state: Value,
    },
}

const CLIENT_TYPES: [&str; 3] = ["createLobby", "joinLobby", "updateState"];

impl ClientMsg {
    /// Decodes one text frame.
    ///
    /// Anything that is not JSON, or carries a known `type` with fields of
    /// the wrong shape, is [`RelayError::InvalidJson`]. A missing or
    /// unrecognised `type` is [`RelayError::UnknownType`].
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_str(text).map_err(|_| RelayError::InvalidJson)?;
        let known = value
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| CLIENT_TYPES.contains(&t));
        if !known {
            return Err(RelayError::UnknownType);
        }
        serde_json::from_value(value).map_err(|_| RelayError::InvalidJson)
    }
}

/// Messages the relay sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    LobbyCreated { code: String },
    JoinedLobby { code: String, state: Value },
    PlayerJoined { name: String },
    StateUpdate { state: Value },
    PlayerLeft { name: String },
    LobbyClosed,
    Error { message: String },
}

impl From<RelayError> for ServerMsg {
    fn from(err: RelayError) -> Self {
        ServerMsg::Error {
            message: err.to_string(),
        }
    }
}
