//! The bot of the browser game: random target, random card.

use std::sync::Mutex;

use monkeybet_engine::cards::Color;
use monkeybet_engine::engine::Engine;
use monkeybet_engine::player::{PlayerAction, PlayerId};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::BotStrategy;

/// Bets on a uniformly random open target and plays a uniformly random card.
/// Passes when its hand is empty.
#[derive(Debug)]
pub struct RandomBot {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl BotStrategy for RandomBot {
    fn get_action(&self, engine: &Engine, player_id: PlayerId) -> PlayerAction {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if engine.phase().is_betting() {
            let open: Vec<Color> = engine
                .targets()
                .iter()
                .filter(|t| t.accepts_bet())
                .map(|t| t.color)
                .collect();
            if let Some(&target) = open.choose(&mut *rng) {
                return PlayerAction::Bet { target };
            }
        }

        match engine.hand(player_id) {
            Some(hand) if !hand.is_empty() => PlayerAction::Play {
                card_index: rng.random_range(0..hand.len()),
            },
            _ => PlayerAction::Pass,
        }
    }

    fn name(&self) -> &str {
        "RandomBot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkeybet_engine::player::PlayerType::Bot;
    use monkeybet_engine::turn::Phase;

    #[test]
    fn opening_move_is_a_bet_on_an_open_target() {
        let mut engine = Engine::new(Some(3));
        engine.start_session([Bot, Bot, Bot]);
        let bot = RandomBot::new(1);
        let p = engine.current_player();
        match bot.get_action(&engine, p) {
            PlayerAction::Bet { target } => {
                assert!(engine.target(target).is_some_and(|t| t.accepts_bet()))
            }
            other => panic!("expected a bet, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::InitialBet);
    }

    #[test]
    fn same_seed_same_choices() {
        let mut engine = Engine::new(Some(3));
        engine.start_session([Bot, Bot, Bot]);
        let p = engine.current_player();
        let a = RandomBot::new(77);
        let b = RandomBot::new(77);
        for _ in 0..5 {
            assert_eq!(a.get_action(&engine, p), b.get_action(&engine, p));
        }
    }
}
