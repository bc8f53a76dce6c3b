use crate::cards::{Card, Color};
use crate::deck::{Deck, Replacement};
use crate::errors::GameError;
use crate::player::{PlayerAction as A, PlayerId};
use crate::target::{active_colors, Target};
use crate::turn::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Bet(Color),
    Play { index: usize, card: Card },
    Pass,
}

/// Result of a card play after the hand slot was refilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The card as played, revealed if it was a mystery card
    pub card: Card,
    /// Target that took the card's number; `None` for a dead card
    pub target: Option<Color>,
    pub replacement: Replacement,
}

pub fn can_bet(target: &Target, phase: Phase) -> bool {
    phase.is_betting() && target.accepts_bet()
}

pub fn can_play(phase: Phase) -> bool {
    phase == Phase::Card
}

/// Validates an action against the open phase, the targets and the actor's hand.
///
/// Turn ownership and game-over are checked by the caller; this only covers
/// bet and card legality.
///
/// # Errors
///
/// - [`GameError::WrongPhase`] - betting outside a betting phase, or playing/passing outside `card`
/// - [`GameError::TargetEliminated`] / [`GameError::TargetFull`] - the bet target cannot take a bet
/// - [`GameError::InvalidCardIndex`] - no card at the requested index
/// - [`GameError::HandNotEmpty`] - passing while still holding cards
///
/// # Examples
///
/// ```
/// use monkeybet_engine::cards::Color;
/// use monkeybet_engine::player::PlayerAction;
/// use monkeybet_engine::rules::{validate_action, ValidatedAction};
/// use monkeybet_engine::target::all_targets;
/// use monkeybet_engine::turn::Phase;
///
/// let targets = all_targets();
/// let ok = validate_action(Phase::Bet, &targets, &[], PlayerAction::Bet { target: Color::Red });
/// assert_eq!(ok, Ok(ValidatedAction::Bet(Color::Red)));
///
/// let late = validate_action(Phase::Card, &targets, &[], PlayerAction::Bet { target: Color::Red });
/// assert!(late.is_err());
/// ```
pub fn validate_action(
    phase: Phase,
    targets: &[Target],
    hand: &[Card],
    action: A,
) -> Result<ValidatedAction, GameError> {
    match action {
        A::Bet { target } => {
            if !phase.is_betting() {
                return Err(GameError::WrongPhase { phase });
            }
            let t = find_target(targets, target).ok_or(GameError::TargetEliminated(target))?;
            if t.eliminated {
                Err(GameError::TargetEliminated(target))
            } else if t.is_full() {
                Err(GameError::TargetFull(target))
            } else {
                Ok(ValidatedAction::Bet(target))
            }
        }
        A::Play { card_index } => {
            if !can_play(phase) {
                return Err(GameError::WrongPhase { phase });
            }
            let card = hand
                .get(card_index)
                .copied()
                .ok_or(GameError::InvalidCardIndex {
                    index: card_index,
                    len: hand.len(),
                })?;
            Ok(ValidatedAction::Play {
                index: card_index,
                card,
            })
        }
        A::Pass => {
            if !can_play(phase) {
                Err(GameError::WrongPhase { phase })
            } else if !hand.is_empty() {
                Err(GameError::HandNotEmpty)
            } else {
                Ok(ValidatedAction::Pass)
            }
        }
    }
}

/// Records one bet by `player` on `color` and credits the provisional point.
pub fn place_bet(
    targets: &mut [Target],
    scores: &mut [i32],
    player: PlayerId,
    color: Color,
) -> Result<(), GameError> {
    let target = targets
        .iter_mut()
        .find(|t| t.color == color)
        .ok_or(GameError::TargetEliminated(color))?;
    if target.eliminated {
        return Err(GameError::TargetEliminated(color));
    }
    if target.is_full() {
        return Err(GameError::TargetFull(color));
    }
    target.bets.push(player);
    scores[player] += 1;
    Ok(())
}

/// Plays `hand[index]`: sets the matching active target's number, reveals a
/// mystery card, and refills the slot. A card with no active target is dead
/// and only gets replaced.
pub fn play_card(
    targets: &mut [Target],
    deck: &mut Deck,
    hand: &mut Vec<Card>,
    index: usize,
) -> Result<PlayOutcome, GameError> {
    let mut card = *hand.get(index).ok_or(GameError::InvalidCardIndex {
        index,
        len: hand.len(),
    })?;
    card.reveal();

    let target = targets
        .iter_mut()
        .find(|t| t.color == card.color && !t.eliminated)
        .map(|t| {
            t.number = Some(card.number);
            t.color
        });

    let active = active_colors(targets);
    let replacement = deck
        .replace(hand, index, &active)
        .ok_or(GameError::InvalidCardIndex {
            index,
            len: hand.len(),
        })?;

    Ok(PlayOutcome {
        card,
        target,
        replacement,
    })
}

fn find_target(targets: &[Target], color: Color) -> Option<&Target> {
    targets.iter().find(|t| t.color == color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::all_targets;

    #[test]
    fn can_bet_only_in_betting_phases() {
        let t = Target::new(Color::Blue);
        assert!(can_bet(&t, Phase::InitialBet));
        assert!(can_bet(&t, Phase::Bet));
        assert!(!can_bet(&t, Phase::Card));
    }

    #[test]
    fn place_bet_appends_and_scores() {
        let mut targets = all_targets();
        let mut scores = [0; 3];
        place_bet(&mut targets, &mut scores, 2, Color::Yellow).expect("bet");
        assert_eq!(targets[2].bets, vec![2]);
        assert_eq!(scores, [0, 0, 1]);
    }

    #[test]
    fn place_bet_refuses_full_target_without_mutation() {
        let mut targets = all_targets();
        targets[0].bets = vec![0, 0, 1, 1];
        let mut scores = [2, 2, 0];
        let err = place_bet(&mut targets, &mut scores, 2, Color::Orange).unwrap_err();
        assert_eq!(err, GameError::TargetFull(Color::Orange));
        assert_eq!(scores, [2, 2, 0]);
        assert_eq!(targets[0].bets.len(), 4);
    }

    #[test]
    fn play_card_reveals_mystery_and_sets_number() {
        let mut targets = all_targets();
        let mut deck = Deck::from_cards(vec![Card::numbered(Color::White, 2)]);
        let mut hand = vec![Card::mystery(Color::Red, 6)];
        let outcome = play_card(&mut targets, &mut deck, &mut hand, 0).expect("play");

        assert!(!outcome.card.hidden);
        assert_eq!(outcome.target, Some(Color::Red));
        assert_eq!(targets[4].number, Some(6));
        assert_eq!(hand, vec![Card::numbered(Color::White, 2)]);
    }

    #[test]
    fn dead_card_only_gets_replaced() {
        let mut targets = all_targets();
        targets[1].eliminated = true;
        let mut deck = Deck::from_cards(vec![]);
        let mut hand = vec![Card::numbered(Color::Blue, 3), Card::numbered(Color::Red, 1)];
        let outcome = play_card(&mut targets, &mut deck, &mut hand, 0).expect("play");

        assert_eq!(outcome.target, None);
        assert_eq!(outcome.replacement, Replacement::Removed);
        assert!(targets.iter().all(|t| t.number.is_none()));
        assert_eq!(hand, vec![Card::numbered(Color::Red, 1)]);
    }

    #[test]
    fn pass_requires_card_phase_and_empty_hand() {
        let targets = all_targets();
        assert_eq!(
            validate_action(Phase::Card, &targets, &[], A::Pass),
            Ok(ValidatedAction::Pass)
        );
        assert_eq!(
            validate_action(
                Phase::Card,
                &targets,
                &[Card::numbered(Color::Red, 1)],
                A::Pass
            ),
            Err(GameError::HandNotEmpty)
        );
        assert_eq!(
            validate_action(Phase::Bet, &targets, &[], A::Pass),
            Err(GameError::WrongPhase { phase: Phase::Bet })
        );
    }

    #[test]
    fn play_outside_card_phase_is_rejected() {
        let targets = all_targets();
        let hand = [Card::numbered(Color::Red, 1)];
        assert_eq!(
            validate_action(
                Phase::InitialBet,
                &targets,
                &hand,
                A::Play { card_index: 0 }
            ),
            Err(GameError::WrongPhase {
                phase: Phase::InitialBet
            })
        );
        assert_eq!(
            validate_action(Phase::Card, &targets, &hand, A::Play { card_index: 3 }),
            Err(GameError::InvalidCardIndex { index: 3, len: 1 })
        );
    }
}
