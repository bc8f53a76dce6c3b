//! # monkeybet-engine: Monkey Betting Game Core
//!
//! Rules and state machine for a three-seat betting and card elimination
//! game. Players bet on six colored monkeys, then play numbered banana cards
//! against them; each round the monkey holding the unique lowest number is
//! eliminated and the bets on it are reversed. The game ends when one monkey
//! per player remains or the card supply runs dry.
//!
//! ## Core Modules
//!
//! - [`cards`] - Colors, cards and the 48-card pool
//! - [`deck`] - Seeded shuffling, dealing and the active-color replacement rule
//! - [`target`] - Monkeys and their bets
//! - [`player`] - Seats, game modes and player actions
//! - [`rules`] - Bet and card legality and their effects
//! - [`turn`] - Phases and turn order
//! - [`round`] - Elimination, ties and end conditions
//! - [`engine`] - Session controller and bot-turn tokens
//! - [`events`] - Change events and the listener surface
//! - [`snapshot`] - Serializable view of a session
//! - [`errors`] - Error types for refused actions
//!
//! ## Quick Start
//!
//! ```rust
//! use monkeybet_engine::cards::Color;
//! use monkeybet_engine::engine::Engine;
//! use monkeybet_engine::player::GameMode;
//!
//! let mut engine = Engine::new(Some(42));
//! engine.start_game(GameMode::Three);
//! let events = engine.submit_bet(Color::Red).expect("legal bet");
//! assert!(!events.is_empty());
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The same seed yields the same mystery values, shuffle and starting player:
//!
//! ```rust
//! use monkeybet_engine::engine::Engine;
//! use monkeybet_engine::player::GameMode;
//!
//! let mut a = Engine::new(Some(9));
//! let mut b = Engine::new(Some(9));
//! a.start_game(GameMode::Single);
//! b.start_game(GameMode::Single);
//! assert_eq!(a.snapshot(), b.snapshot());
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod player;
pub mod round;
pub mod rules;
pub mod snapshot;
pub mod target;
pub mod turn;
