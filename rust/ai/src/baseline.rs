//! Baseline bot: a deterministic heuristic used as a reference opponent in
//! simulations.
//!
//! Betting backs the open target where the bot already has the most at stake.
//! Card play pushes staked targets up with high cards and pushes unstaked
//! targets down with low cards.

use monkeybet_engine::cards::Card;
use monkeybet_engine::engine::Engine;
use monkeybet_engine::player::{PlayerAction, PlayerId};
use monkeybet_engine::target::Target;

use crate::BotStrategy;

/// Value assumed for a mystery card whose number is still hidden.
const HIDDEN_ESTIMATE: u8 = 4;

/// Deterministic heuristic bot.
///
/// # Example
///
/// ```rust
/// use monkeybet_ai::baseline::BaselineBot;
/// use monkeybet_ai::BotStrategy;
/// use monkeybet_engine::engine::Engine;
/// use monkeybet_engine::player::PlayerAction;
/// use monkeybet_engine::player::PlayerType::Bot;
///
/// let mut engine = Engine::new(Some(42));
/// engine.start_session([Bot, Bot, Bot]);
///
/// let bot = BaselineBot::new();
/// let action = bot.get_action(&engine, engine.current_player());
/// assert!(matches!(action, PlayerAction::Bet { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselineBot;

impl BaselineBot {
    pub fn new() -> Self {
        Self
    }

    /// Open target with the largest own stake; ties go to the highest
    /// number played this round, then to table order.
    fn choose_bet(targets: &[Target], player_id: PlayerId) -> Option<&Target> {
        targets
            .iter()
            .filter(|t| t.accepts_bet())
            // max_by_key keeps the last maximum; reversing makes that the first in table order
            .rev()
            .max_by_key(|t| (t.bets_by(player_id), t.number.unwrap_or(0)))
    }

    /// Highest card on a staked target, else lowest card on an unstaked one.
    fn choose_card(engine: &Engine, hand: &[Card], player_id: PlayerId) -> usize {
        let staked = |card: &Card| {
            engine
                .target(card.color)
                .is_some_and(|t| t.is_active() && t.bets_by(player_id) > 0)
        };
        let value = |card: &Card| card.visible_number().unwrap_or(HIDDEN_ESTIMATE);

        let best_staked = hand
            .iter()
            .enumerate()
            .filter(|(_, c)| staked(*c))
            .max_by_key(|(i, c)| (value(*c), std::cmp::Reverse(*i)))
            .map(|(i, _)| i);
        if let Some(i) = best_staked {
            return i;
        }

        hand.iter()
            .enumerate()
            .min_by_key(|(i, c)| (value(*c), *i))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl BotStrategy for BaselineBot {
    fn get_action(&self, engine: &Engine, player_id: PlayerId) -> PlayerAction {
        if engine.phase().is_betting() {
            if let Some(target) = Self::choose_bet(engine.targets(), player_id) {
                return PlayerAction::Bet {
                    target: target.color,
                };
            }
        }
        match engine.hand(player_id) {
            Some(hand) if !hand.is_empty() => PlayerAction::Play {
                card_index: Self::choose_card(engine, hand, player_id),
            },
            _ => PlayerAction::Pass,
        }
    }

    fn name(&self) -> &str {
        "BaselineBot"
    }
}
