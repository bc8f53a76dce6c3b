//! # monkeybet-ai: Bot Players
//!
//! Decision-making for bot seats. Every strategy implements [`BotStrategy`]
//! and answers with a legal [`PlayerAction`] for the seat holding the turn.
//!
//! ## Core Components
//!
//! - [`BotStrategy`] - Trait defining the interface for bot decisions
//! - [`random`] - Uniformly random bets and plays
//! - [`baseline`] - Simple stake-protecting heuristic
//! - [`create_ai`] - Factory function for creating bots by name
//!
//! ## Quick Start
//!
//! ```rust
//! use monkeybet_ai::create_ai;
//! use monkeybet_engine::engine::Engine;
//! use monkeybet_engine::player::PlayerType::Bot;
//!
//! let bot = create_ai("random", 42).expect("known strategy");
//!
//! let mut engine = Engine::new(Some(42));
//! engine.start_session([Bot, Bot, Bot]);
//!
//! let token = engine.pending_bot_turn().expect("a bot holds the turn");
//! let action = bot.get_action(&engine, token.player);
//! engine.run_bot_turn(token, action).expect("bots only choose legal actions");
//! ```

use monkeybet_engine::engine::Engine;
use monkeybet_engine::player::{PlayerAction, PlayerId};
use thiserror::Error;

pub mod baseline;
pub mod random;

/// Names accepted by [`create_ai`].
pub const STRATEGIES: [&str; 2] = ["random", "baseline"];

/// Trait defining the interface for bot players.
///
/// # Example Implementation
///
/// ```rust
/// use monkeybet_ai::BotStrategy;
/// use monkeybet_engine::cards::Color;
/// use monkeybet_engine::engine::Engine;
/// use monkeybet_engine::player::PlayerAction;
///
/// struct AlwaysOrange;
///
/// impl BotStrategy for AlwaysOrange {
///     fn get_action(&self, _engine: &Engine, _player_id: usize) -> PlayerAction {
///         PlayerAction::Bet { target: Color::Orange }
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysOrange"
///     }
/// }
/// ```
pub trait BotStrategy: Send + Sync {
    /// Chooses the next action for `player_id`, which must hold the turn.
    fn get_action(&self, engine: &Engine, player_id: PlayerId) -> PlayerAction;

    fn name(&self) -> &str;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown bot strategy: {0} (expected one of: random, baseline)")]
pub struct UnknownStrategy(pub String);

/// Creates a bot by strategy name. `seed` drives strategies that randomize.
///
/// # Example
///
/// ```rust
/// use monkeybet_ai::create_ai;
///
/// let bot = create_ai("baseline", 0).expect("known strategy");
/// assert_eq!(bot.name(), "BaselineBot");
/// assert!(create_ai("oracle", 0).is_err());
/// ```
pub fn create_ai(name: &str, seed: u64) -> Result<Box<dyn BotStrategy>, UnknownStrategy> {
    match name.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(Box::new(random::RandomBot::new(seed))),
        "baseline" => Ok(Box::new(baseline::BaselineBot::new())),
        other => Err(UnknownStrategy(other.to_string())),
    }
}
