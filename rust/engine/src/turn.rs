//! Turn sequencing: who acts next and which kind of action is open.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player::{Player, PlayerId};
use crate::target::Target;

/// Which action type the turn holder may take.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Opening round: every seat places exactly one bet before cards are dealt
    InitialBet,
    /// The turn holder places one bet, then plays
    Bet,
    /// The turn holder plays one card
    Card,
}

impl Phase {
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::InitialBet | Phase::Bet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::InitialBet => "initialBet",
            Phase::Bet => "bet",
            Phase::Card => "card",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn-holder bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub current_player: PlayerId,
    pub phase: Phase,
    /// Initial bets placed so far; the deal happens when this reaches the roster size
    pub initial_bets_placed: usize,
    /// Bumped on every committed action
    pub turn_seq: u64,
}

impl TurnState {
    pub fn new(first_player: PlayerId) -> Self {
        Self {
            current_player: first_player,
            phase: Phase::InitialBet,
            initial_bets_placed: 0,
            turn_seq: 0,
        }
    }
}

/// True when every active target holds the maximum number of bets,
/// i.e. there is nothing left to bet on.
pub fn check_all_bet(targets: &[Target]) -> bool {
    targets
        .iter()
        .filter(|t| t.is_active())
        .all(|t| t.is_full())
}

/// Phase that opens for the next turn holder after a card play.
pub fn phase_after_play(targets: &[Target]) -> Phase {
    if check_all_bet(targets) {
        Phase::Card
    } else {
        Phase::Bet
    }
}

/// Advances cyclically from `current`, skipping seats with empty hands while
/// any hand still holds cards. Gives up after one lap.
pub fn next_player(current: PlayerId, players: &[Player]) -> PlayerId {
    let n = players.len();
    if n == 0 {
        return current;
    }
    let mut next = (current + 1) % n;
    let any_cards = players.iter().any(|p| !p.hand().is_empty());
    let mut attempts = 0;
    while any_cards && players[next].hand().is_empty() && attempts < n {
        next = (next + 1) % n;
        attempts += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Color};
    use crate::player::PlayerType;
    use crate::target::all_targets;

    fn roster(hand_sizes: [usize; 3]) -> Vec<Player> {
        hand_sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let mut p = Player::new(i, PlayerType::Human);
                p.set_hand(vec![Card::numbered(Color::Red, 1); n]);
                p
            })
            .collect()
    }

    #[test]
    fn next_player_wraps() {
        assert_eq!(next_player(2, &roster([1, 1, 1])), 0);
        assert_eq!(next_player(0, &roster([1, 1, 1])), 1);
    }

    #[test]
    fn next_player_skips_empty_hands() {
        assert_eq!(next_player(0, &roster([3, 0, 2])), 2);
        assert_eq!(next_player(1, &roster([0, 4, 0])), 1);
    }

    #[test]
    fn next_player_plain_rotation_when_all_hands_empty() {
        assert_eq!(next_player(0, &roster([0, 0, 0])), 1);
    }

    #[test]
    fn phase_after_play_depends_on_open_bets() {
        let mut targets = all_targets();
        assert_eq!(phase_after_play(&targets), Phase::Bet);
        for t in targets.iter_mut() {
            t.bets = vec![0, 1, 2, 0];
        }
        assert_eq!(phase_after_play(&targets), Phase::Card);
        targets[3].bets.pop();
        targets[3].eliminated = true;
        assert_eq!(phase_after_play(&targets), Phase::Card);
    }

    #[test]
    fn phase_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&Phase::InitialBet).expect("serialize"),
            "\"initialBet\""
        );
        assert_eq!(Phase::Card.to_string(), "card");
    }
}
