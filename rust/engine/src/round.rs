//! Round resolution: eliminating the lowest monkey, tie handling and the
//! conditions that end a game.

use serde::{Deserialize, Serialize};

use crate::cards::Color;
use crate::deck::Deck;
use crate::player::{Player, PlayerId, PLAYER_COUNT};
use crate::target::{active_colors, Target};

/// What the end of a round produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// This target holds the unique lowest number and leaves the game
    Eliminated { color: Color, number: u8 },
    /// Two or more targets share the lowest number; nobody leaves
    Tied { colors: Vec<Color>, number: u8 },
}

/// Bookkeeping of a processed elimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub color: Color,
    /// One entry per reversed bet, in placement order
    pub reversed_bets: Vec<PlayerId>,
    /// Cards of the color removed from the pool and from hands
    pub cards_destroyed: usize,
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// No active-color card left in the pool and every hand is empty
    Exhausted,
    /// One target per player remains
    TargetsPerPlayer,
}

/// True when at least one target is active and every active target has been
/// played against this round.
pub fn ready_for_elimination(targets: &[Target]) -> bool {
    let mut active = targets.iter().filter(|t| t.is_active()).peekable();
    active.peek().is_some() && active.all(|t| t.number.is_some())
}

/// Finds the lowest played number among active targets. `None` until the
/// round is ready.
pub fn evaluate_round(targets: &[Target]) -> Option<RoundOutcome> {
    if !ready_for_elimination(targets) {
        return None;
    }
    let min = targets
        .iter()
        .filter(|t| t.is_active())
        .filter_map(|t| t.number)
        .min()?;
    let lowest: Vec<Color> = targets
        .iter()
        .filter(|t| t.is_active() && t.number == Some(min))
        .map(|t| t.color)
        .collect();
    match lowest.as_slice() {
        [color] => Some(RoundOutcome::Eliminated {
            color: *color,
            number: min,
        }),
        _ => Some(RoundOutcome::Tied {
            colors: lowest,
            number: min,
        }),
    }
}

pub fn reset_numbers(targets: &mut [Target]) {
    for t in targets.iter_mut() {
        t.reset_number();
    }
}

/// Removes `color` from play: reverses its bets, clears every target number,
/// and purges the color from the pool and from all hands.
pub fn process_elimination(
    color: Color,
    targets: &mut [Target],
    scores: &mut [i32],
    deck: &mut Deck,
    players: &mut [Player],
) -> Elimination {
    let mut reversed_bets = Vec::new();
    if let Some(target) = targets.iter_mut().find(|t| t.color == color) {
        for &p in &target.bets {
            scores[p] -= 1;
        }
        reversed_bets = std::mem::take(&mut target.bets);
        target.eliminated = true;
    }
    reset_numbers(targets);

    let active = active_colors(targets);
    let cards_destroyed =
        deck.purge_color(color, players.iter_mut().map(Player::hand_mut), &active);

    Elimination {
        color,
        reversed_bets,
        cards_destroyed,
    }
}

/// The pool holds no card of an active color and nobody holds a card.
pub fn is_exhausted(deck: &Deck, targets: &[Target], players: &[Player]) -> bool {
    deck.remaining_active(&active_colors(targets)) == 0
        && players.iter().all(|p| p.hand().is_empty())
}

/// Checks the end conditions in order: exhaustion first, then one target per player.
pub fn terminal_state(deck: &Deck, targets: &[Target], players: &[Player]) -> Option<Terminal> {
    if is_exhausted(deck, targets, players) {
        Some(Terminal::Exhausted)
    } else if targets.iter().filter(|t| t.is_active()).count() <= PLAYER_COUNT {
        Some(Terminal::TargetsPerPlayer)
    } else {
        None
    }
}

/// Bets held on surviving targets, per player.
pub fn surviving_stakes(targets: &[Target], players: usize) -> Vec<i32> {
    let mut totals = vec![0; players];
    for t in targets.iter().filter(|t| t.is_active()) {
        for &p in &t.bets {
            if let Some(total) = totals.get_mut(p) {
                *total += 1;
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::player::PlayerType;
    use crate::target::all_targets;

    fn numbered(targets: &mut [Target], numbers: [u8; 6]) {
        for (t, n) in targets.iter_mut().zip(numbers) {
            t.number = Some(n);
        }
    }

    #[test]
    fn not_ready_while_any_active_target_lacks_a_number() {
        let mut targets = all_targets();
        numbered(&mut targets, [4, 5, 6, 7, 2, 3]);
        targets[5].number = None;
        assert!(!ready_for_elimination(&targets));
        assert_eq!(evaluate_round(&targets), None);

        targets[5].eliminated = true;
        assert!(ready_for_elimination(&targets));
    }

    #[test]
    fn unique_minimum_is_eliminated() {
        let mut targets = all_targets();
        numbered(&mut targets, [4, 5, 6, 7, 2, 3]);
        assert_eq!(
            evaluate_round(&targets),
            Some(RoundOutcome::Eliminated {
                color: Color::Red,
                number: 2
            })
        );
    }

    #[test]
    fn shared_minimum_is_a_tie() {
        let mut targets = all_targets();
        numbered(&mut targets, [3, 5, 3, 7, 6, 4]);
        assert_eq!(
            evaluate_round(&targets),
            Some(RoundOutcome::Tied {
                colors: vec![Color::Orange, Color::Yellow],
                number: 3
            })
        );
    }

    #[test]
    fn eliminated_targets_do_not_count_toward_minimum() {
        let mut targets = all_targets();
        numbered(&mut targets, [1, 5, 3, 7, 6, 4]);
        targets[0].eliminated = true;
        assert_eq!(
            evaluate_round(&targets),
            Some(RoundOutcome::Eliminated {
                color: Color::Yellow,
                number: 3
            })
        );
    }

    #[test]
    fn elimination_reverses_each_bet() {
        let mut targets = all_targets();
        targets[1].bets = vec![0, 0, 1];
        targets[2].bets = vec![2];
        numbered(&mut targets, [4, 1, 6, 7, 2, 3]);
        let mut scores = [2, 1, 1];
        let mut deck = Deck::from_cards(vec![]);
        let mut players: Vec<Player> = (0..3).map(|i| Player::new(i, PlayerType::Bot)).collect();

        let out = process_elimination(
            Color::Blue,
            &mut targets,
            &mut scores,
            &mut deck,
            &mut players,
        );

        assert_eq!(out.reversed_bets, vec![0, 0, 1]);
        assert_eq!(scores, [0, 0, 1]);
        assert!(targets[1].eliminated);
        assert!(targets[1].bets.is_empty());
        assert!(targets.iter().all(|t| t.number.is_none()));
    }

    #[test]
    fn exhaustion_needs_empty_hands_and_no_active_cards() {
        let mut targets = all_targets();
        targets[4].eliminated = true;
        let deck = Deck::from_cards(vec![Card::numbered(Color::Red, 3)]);
        let mut players: Vec<Player> = (0..3).map(|i| Player::new(i, PlayerType::Human)).collect();
        assert!(is_exhausted(&deck, &targets, &players));
        assert_eq!(
            terminal_state(&deck, &targets, &players),
            Some(Terminal::Exhausted)
        );

        players[1].set_hand(vec![Card::numbered(Color::Blue, 1)]);
        assert!(!is_exhausted(&deck, &targets, &players));
        assert_eq!(terminal_state(&deck, &targets, &players), None);
    }

    #[test]
    fn three_survivors_is_terminal() {
        let mut targets = all_targets();
        for t in targets.iter_mut().take(3) {
            t.eliminated = true;
        }
        let deck = Deck::new_with_seed(1);
        let players: Vec<Player> = (0..3).map(|i| Player::new(i, PlayerType::Human)).collect();
        assert_eq!(
            terminal_state(&deck, &targets, &players),
            Some(Terminal::TargetsPerPlayer)
        );
    }

    #[test]
    fn surviving_stakes_ignore_eliminated_targets() {
        let mut targets = all_targets();
        targets[0].bets = vec![0, 1];
        targets[1].bets = vec![1, 1];
        targets[1].eliminated = true;
        assert_eq!(surviving_stakes(&targets, 3), vec![1, 1, 0]);
    }
}
