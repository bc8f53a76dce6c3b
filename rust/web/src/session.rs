use crate::events::{EventBus, SessionEvent};
use monkeybet_ai::{create_ai, BotStrategy};
use monkeybet_engine::engine::{BotTurn, Engine, BOT_THINK_DELAY};
use monkeybet_engine::errors::GameError;
use monkeybet_engine::events::GameEvent;
use monkeybet_engine::player::{GameMode, PlayerAction, PlayerId, PlayerType};
use monkeybet_engine::snapshot::GameSnapshot;
use monkeybet_engine::turn::Phase;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub seed: Option<u64>,
    pub bot: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Single,
            seed: None,
            bot: "random".into(),
        }
    }
}

/// State returned to HTTP clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub seed: u64,
    pub bot: String,
    pub state: GameSnapshot,
}

/// One hosted game: the engine behind its lock plus a strategy per bot seat.
pub struct GameSession {
    id: SessionId,
    mode: GameMode,
    bot: String,
    engine: Mutex<Engine>,
    bots: Vec<Option<Box<dyn BotStrategy>>>,
}

impl GameSession {
    fn new(id: SessionId, config: &GameConfig, seed: u64) -> Result<Self, SessionError> {
        let mut bots = Vec::new();
        for (seat, kind) in config.mode.player_types().iter().enumerate() {
            let bot = match kind {
                PlayerType::Bot => Some(
                    create_ai(&config.bot, seed.wrapping_add(seat as u64 + 1))
                        .map_err(|e| SessionError::InvalidConfig(e.to_string()))?,
                ),
                PlayerType::Human => None,
            };
            bots.push(bot);
        }
        Ok(Self {
            id,
            mode: config.mode,
            bot: config.bot.clone(),
            engine: Mutex::new(Engine::new(Some(seed))),
            bots,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    fn engine(&self) -> Result<MutexGuard<'_, Engine>, SessionError> {
        self.engine.lock().map_err(|_| SessionError::StoragePoisoned)
    }

    pub fn state(&self) -> Result<SessionState, SessionError> {
        let engine = self.engine()?;
        Ok(SessionState {
            session_id: self.id.clone(),
            mode: self.mode,
            seed: engine.seed(),
            bot: self.bot.clone(),
            state: engine.snapshot(),
        })
    }
}

/// Registry of hosted games. Bot seats move on their own after
/// `think_delay`; every action, human or bot, is applied under the
/// session's engine lock and never across an await point.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<GameSession>>>,
    event_bus: Arc<EventBus>,
    think_delay: Duration,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.active_sessions().len())
            .field("think_delay", &self.think_delay)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self::with_think_delay(event_bus, BOT_THINK_DELAY)
    }

    pub fn with_think_delay(event_bus: Arc<EventBus>, think_delay: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            think_delay,
        }
    }

    pub fn think_delay(&self) -> Duration {
        self.think_delay
    }

    /// Starts a game and, if a bot opens, schedules its move. Must be called
    /// inside a tokio runtime.
    pub fn create_session(self: &Arc<Self>, config: GameConfig) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();
        let seed = config.seed.unwrap_or_else(rand::random);

        tracing::info!(
            session_id = %id,
            mode = config.mode.as_str(),
            seed,
            bot = %config.bot,
            "creating game session"
        );

        let session = Arc::new(GameSession::new(id.clone(), &config, seed)?);
        let events = session.engine()?.start_game(config.mode);
        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), Arc::clone(&session));
        }

        self.event_bus.publish(&id, &events);
        self.schedule_bot_turn(&session);
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<GameSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn state(&self, id: &SessionId) -> Result<SessionState, SessionError> {
        self.get_session(id)?.state()
    }

    /// Applies a human seat's action. Bot seats are refused.
    pub fn process_action(
        self: &Arc<Self>,
        id: &SessionId,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let session = self.get_session(id)?;
        let events = {
            let mut engine = session.engine()?;
            let events = engine.submit_action(player, action)?;
            // published before the guard drops so subscribers see commit order
            self.event_bus.publish(id, &events);
            events
        };

        tracing::debug!(
            session_id = %id,
            player,
            action = ?action,
            events = events.len(),
            "player action applied"
        );

        self.schedule_bot_turn(&session);
        Ok(events)
    }

    /// Returns the session to the menu and deals a fresh game in the same
    /// mode. Bot moves scheduled before the reset are discarded.
    pub fn reset(self: &Arc<Self>, id: &SessionId) -> Result<SessionState, SessionError> {
        let session = self.get_session(id)?;
        {
            let mut engine = session.engine()?;
            engine.reset_to_menu();
            let events = engine.start_game(session.mode);
            self.event_bus.publish(id, &events);
        }
        tracing::info!(session_id = %id, "session reset");

        self.schedule_bot_turn(&session);
        session.state()
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let removed = {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.remove(id)
        };
        if removed.is_none() {
            return Err(SessionError::NotFound(id.clone()));
        }

        tracing::info!(session_id = %id, "session deleted");
        self.event_bus.broadcast(
            id,
            SessionEvent::Ended {
                reason: "terminated_by_request".into(),
            },
        );
        self.event_bus.drop_session(id);
        Ok(())
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions
            .read()
            .map(|guard| guard.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn is_registered(&self, id: &SessionId) -> bool {
        self.sessions
            .read()
            .map(|guard| guard.contains_key(id))
            .unwrap_or(false)
    }

    fn schedule_bot_turn(self: &Arc<Self>, session: &Arc<GameSession>) {
        let token = match session.engine() {
            Ok(engine) => engine.pending_bot_turn(),
            Err(err) => {
                tracing::error!(session_id = %session.id, error = %err, "cannot schedule bot turn");
                return;
            }
        };
        let Some(token) = token else {
            return;
        };

        tracing::debug!(
            session_id = %session.id,
            player = token.player,
            turn_seq = token.turn_seq,
            "bot turn scheduled"
        );

        let manager = Arc::clone(self);
        let session = Arc::clone(session);
        let delay = self.think_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            manager.run_bot_turn(&session, token);
        });
    }

    fn run_bot_turn(self: &Arc<Self>, session: &Arc<GameSession>, token: BotTurn) {
        if !self.is_registered(&session.id) {
            tracing::debug!(session_id = %session.id, "session gone, bot turn dropped");
            return;
        }

        let result = {
            let mut engine = match session.engine() {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!(session_id = %session.id, error = %err, "bot turn aborted");
                    return;
                }
            };
            if engine.pending_bot_turn() != Some(token) {
                Err(GameError::StaleBotTurn)
            } else {
                let Some(bot) = session.bots.get(token.player).and_then(Option::as_ref) else {
                    tracing::error!(
                        session_id = %session.id,
                        player = token.player,
                        "no strategy for bot seat"
                    );
                    return;
                };
                let action = bot.get_action(&engine, token.player);
                let result = match engine.run_bot_turn(token, action) {
                    Err(err) if err != GameError::StaleBotTurn => {
                        tracing::warn!(
                            session_id = %session.id,
                            player = token.player,
                            strategy = bot.name(),
                            error = %err,
                            "bot action refused, playing fallback"
                        );
                        let fallback = fallback_action(&engine, token.player);
                        engine.run_bot_turn(token, fallback)
                    }
                    other => other,
                };
                if let Ok(events) = &result {
                    self.event_bus.publish(&session.id, events);
                }
                result
            }
        };

        match result {
            Ok(_) => self.schedule_bot_turn(session),
            Err(GameError::StaleBotTurn) => {
                tracing::debug!(session_id = %session.id, ?token, "stale bot turn dropped");
            }
            Err(err) => {
                tracing::error!(session_id = %session.id, error = %err, "bot seat stalled");
            }
        }
    }
}

/// The first legal move for `player`: a bet on the first open target, the
/// first card in hand, or a pass with an empty hand.
fn fallback_action(engine: &Engine, player: PlayerId) -> PlayerAction {
    let hand_len = engine.hand(player).map_or(0, <[_]>::len);
    let open_target = engine.targets().iter().find(|t| t.accepts_bet());
    match (engine.phase(), open_target) {
        (Phase::InitialBet | Phase::Bet, Some(target)) => PlayerAction::Bet {
            target: target.color,
        },
        _ if hand_len > 0 => PlayerAction::Play { card_index: 0 },
        _ => PlayerAction::Pass,
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
    #[error("Invalid action: {0}")]
    Game(#[from] GameError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SessionError::Game(err) if is_conflict(err) => StatusCode::CONFLICT,
            SessionError::Game(_) => StatusCode::BAD_REQUEST,
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::InvalidConfig(_) => "invalid_config",
            SessionError::Game(err) if is_conflict(err) => "action_conflict",
            SessionError::Game(_) => "invalid_action",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({ "session_id": id })),
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            _ => ErrorSeverity::Client,
        }
    }
}

/// Refusals caused by whose turn it is rather than by the action itself.
fn is_conflict(err: &GameError) -> bool {
    matches!(
        err,
        GameError::NotPlayersTurn { .. }
            | GameError::BotSeat(_)
            | GameError::GameOver
            | GameError::NotStarted
            | GameError::StaleBotTurn
    )
}
