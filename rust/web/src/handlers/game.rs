use crate::errors::{BadRequest, IntoErrorResponse};
use crate::session::{GameConfig, SessionError, SessionId, SessionManager};
use monkeybet_engine::events::GameEvent;
use monkeybet_engine::player::{GameMode, PlayerAction, PlayerId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub mode: Option<GameMode>,
    pub seed: Option<u64>,
    pub bot: Option<String>,
}

impl CreateSessionRequest {
    fn into_config(self) -> GameConfig {
        let mut config = GameConfig::default();
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        config.seed = self.seed;
        if let Some(bot) = self.bot {
            config.bot = bot;
        }
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerActionRequest {
    pub player: PlayerId,
    pub action: PlayerAction,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub events: Vec<GameEvent>,
}

/// `POST /api/sessions`
///
/// Body: `{"mode": "single"|"two"|"three", "seed": 42, "bot": "baseline"}`,
/// every field optional; an empty body starts a single-player game. Replies
/// 201 with the session state.
pub async fn create_session(sessions: Arc<SessionManager>, body: Bytes) -> Response {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        match parse_body(&body) {
            Ok(request) => request,
            Err(resp) => return resp,
        }
    };

    let created = sessions
        .create_session(request.into_config())
        .and_then(|id| sessions.state(&id));
    match created {
        Ok(state) => success_response(StatusCode::CREATED, state),
        Err(err) => session_error(err),
    }
}

/// `GET /api/sessions/{id}/state`
pub async fn get_session_state(session_id: SessionId, sessions: Arc<SessionManager>) -> Response {
    match sessions.state(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// `POST /api/sessions/{id}/actions`
///
/// Body: `{"player": 0, "action": {"type": "bet", "target": "blue"}}`.
/// Replies 202 with the events the action produced; bot replies follow
/// asynchronously on the event stream.
pub async fn submit_action(
    session_id: SessionId,
    sessions: Arc<SessionManager>,
    body: Bytes,
) -> Response {
    let request: PlayerActionRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(resp) => return resp,
    };
    match sessions.process_action(&session_id, request.player, request.action) {
        Ok(events) => success_response(StatusCode::ACCEPTED, ActionResponse { events }),
        Err(err) => session_error(err),
    }
}

/// `POST /api/sessions/{id}/reset`
pub async fn reset_session(session_id: SessionId, sessions: Arc<SessionManager>) -> Response {
    match sessions.reset(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(session_id: SessionId, sessions: Arc<SessionManager>) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response(),
        Err(err) => session_error(err),
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| BadRequest(e.to_string()).into_http_response())
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn session_error(err: SessionError) -> Response {
    err.into_http_response()
}
