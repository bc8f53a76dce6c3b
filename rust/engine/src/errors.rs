use thiserror::Error;

use crate::cards::Color;
use crate::player::PlayerId;
use crate::turn::Phase;

/// Reasons an action is refused. A refused action never changes game state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No game in progress")]
    NotStarted,
    #[error("Game is over")]
    GameOver,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("Action not allowed during the {phase} phase")]
    WrongPhase { phase: Phase },
    #[error("{0} monkey is eliminated")]
    TargetEliminated(Color),
    #[error("{0} monkey already holds the maximum number of bets")]
    TargetFull(Color),
    #[error("No card at index {index} (hand holds {len})")]
    InvalidCardIndex { index: usize, len: usize },
    #[error("Cannot pass while holding cards")]
    HandNotEmpty,
    #[error("Player {0} is bot-controlled")]
    BotSeat(PlayerId),
    #[error("Scheduled bot turn is stale")]
    StaleBotTurn,
}
