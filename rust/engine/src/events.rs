//! Change descriptions emitted by the engine and the render-callback surface
//! that consumes them.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Color};
use crate::deck::Replacement;
use crate::engine::GameResult;
use crate::player::PlayerId;
use crate::turn::Phase;

/// One committed state change, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted {
        first_player: PlayerId,
    },
    BetPlaced {
        player: PlayerId,
        target: Color,
        score: i32,
    },
    HandsDealt {
        hand_sizes: Vec<usize>,
    },
    CardPlayed {
        player: PlayerId,
        card: Card,
        /// `None` when the card's color was already eliminated
        target: Option<Color>,
        replacement: Replacement,
    },
    Passed {
        player: PlayerId,
    },
    PhaseChanged {
        player: PlayerId,
        phase: Phase,
    },
    RoundTied {
        colors: Vec<Color>,
        number: u8,
    },
    Eliminated {
        target: Color,
        reversed_bets: Vec<PlayerId>,
    },
    RoundStarted {
        round: u32,
    },
    GameOver {
        result: GameResult,
    },
}

impl GameEvent {
    /// The banner text shown for this event, if any.
    pub fn announcement(&self) -> Option<String> {
        match self {
            GameEvent::RoundTied { .. } => Some("Tie detected, no elimination.".to_string()),
            GameEvent::GameOver { result } => Some(result.announcement()),
            _ => None,
        }
    }
}

/// Presentation hooks, all no-ops by default.
pub trait GameListener {
    fn on_phase_change(&mut self, _player: PlayerId, _phase: Phase) {}
    fn on_bet_placed(&mut self, _player: PlayerId, _target: Color) {}
    fn on_hands_dealt(&mut self, _hand_sizes: &[usize]) {}
    fn on_card_played(&mut self, _player: PlayerId, _card: &Card, _target: Option<Color>) {}
    /// `target` is `None` on a tie.
    fn on_elimination(&mut self, _target: Option<Color>, _tied: bool) {}
    fn on_round_start(&mut self, _round: u32) {}
    fn on_game_over(&mut self, _result: &GameResult) {}
}

/// Replays `events` into `listener` in order.
pub fn dispatch<L: GameListener + ?Sized>(events: &[GameEvent], listener: &mut L) {
    for event in events {
        match event {
            GameEvent::SessionStarted { .. } | GameEvent::Passed { .. } => {}
            GameEvent::BetPlaced { player, target, .. } => listener.on_bet_placed(*player, *target),
            GameEvent::HandsDealt { hand_sizes } => listener.on_hands_dealt(hand_sizes),
            GameEvent::CardPlayed {
                player,
                card,
                target,
                ..
            } => listener.on_card_played(*player, card, *target),
            GameEvent::PhaseChanged { player, phase } => listener.on_phase_change(*player, *phase),
            GameEvent::RoundTied { .. } => listener.on_elimination(None, true),
            GameEvent::Eliminated { target, .. } => listener.on_elimination(Some(*target), false),
            GameEvent::RoundStarted { round } => listener.on_round_start(*round),
            GameEvent::GameOver { result } => listener.on_game_over(result),
        }
    }
}

pub(crate) fn eliminated_banner(target: Color, round: u32) -> String {
    format!("{} monkey is eliminated! Round {} begins!", target.name(), round)
}
