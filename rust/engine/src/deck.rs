use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card, Color};

/// Outcome of refilling a hand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum Replacement {
    /// The slot now holds this card, taken from the deck
    Replaced(Card),
    /// No card of an active color was left; the slot was removed and the hand shrank
    Removed,
}

/// The global card pool.
///
/// Cards leave the pool from the end when dealt, or from anywhere when a
/// replacement scan finds the first card of an active color.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        // Mystery values are fixed here; order stays as built until shuffle is called
        let cards = full_deck(&mut rng);
        Self { cards, rng }
    }

    /// Rebuilds the full pool (new mystery values) and shuffles all 48 cards.
    pub fn shuffle(&mut self) {
        self.cards = full_deck(&mut self.rng);
        self.cards.shuffle(&mut self.rng);
    }

    /// Pops up to `n` cards off the end of the pool. A short pool yields a short hand.
    pub fn draw_hand(&mut self, n: usize) -> Vec<Card> {
        let take = n.min(self.cards.len());
        let mut hand = Vec::with_capacity(take);
        for _ in 0..take {
            if let Some(card) = self.cards.pop() {
                hand.push(card);
            }
        }
        hand
    }

    /// Removes and returns the first card whose color is in `active`.
    pub fn take_first_active(&mut self, active: &[Color]) -> Option<Card> {
        let idx = self.cards.iter().position(|c| active.contains(&c.color))?;
        Some(self.cards.remove(idx))
    }

    /// Refills `hand[index]` with the first deck card of an active color, or
    /// deletes the slot when there is none. Returns `None` if `index` is out of range.
    pub fn replace(
        &mut self,
        hand: &mut Vec<Card>,
        index: usize,
        active: &[Color],
    ) -> Option<Replacement> {
        if index >= hand.len() {
            return None;
        }
        match self.take_first_active(active) {
            Some(card) => {
                hand[index] = card;
                Some(Replacement::Replaced(card))
            }
            None => {
                hand.remove(index);
                Some(Replacement::Removed)
            }
        }
    }

    /// Drops every pool card of `color`, then swaps that color out of each hand
    /// using the replacement rule. Returns how many cards left circulation for good.
    pub fn purge_color<'a, I>(&mut self, color: Color, hands: I, active: &[Color]) -> usize
    where
        I: IntoIterator<Item = &'a mut Vec<Card>>,
    {
        let before = self.cards.len();
        self.cards.retain(|c| c.color != color);
        let mut destroyed = before - self.cards.len();

        for hand in hands {
            let mut i = 0;
            while i < hand.len() {
                if hand[i].color != color {
                    i += 1;
                    continue;
                }
                destroyed += 1;
                match self.replace(hand, i, active) {
                    Some(Replacement::Replaced(_)) => i += 1,
                    // slot removed, the next card shifted into `i`
                    Some(Replacement::Removed) | None => {}
                }
            }
        }
        destroyed
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Number of pool cards that can still be dealt or used as replacements.
    pub fn remaining_active(&self, active: &[Color]) -> usize {
        self.cards
            .iter()
            .filter(|c| active.contains(&c.color))
            .count()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// A pool with a fixed card order, for scripted tables.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{all_colors, DECK_SIZE};

    #[test]
    fn draw_hand_pops_from_the_end() {
        let mut deck = Deck::from_cards(vec![
            Card::numbered(Color::Red, 1),
            Card::numbered(Color::Blue, 2),
            Card::numbered(Color::White, 3),
        ]);
        let hand = deck.draw_hand(2);
        assert_eq!(
            hand,
            vec![
                Card::numbered(Color::White, 3),
                Card::numbered(Color::Blue, 2)
            ]
        );
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn draw_hand_short_pool_gives_short_hand() {
        let mut deck = Deck::from_cards(vec![Card::numbered(Color::Red, 1)]);
        assert_eq!(deck.draw_hand(5).len(), 1);
        assert!(deck.draw_hand(5).is_empty());
    }

    #[test]
    fn replace_skips_inactive_colors() {
        let mut deck = Deck::from_cards(vec![
            Card::numbered(Color::Red, 1),
            Card::numbered(Color::Blue, 6),
        ]);
        let mut hand = vec![Card::numbered(Color::White, 2)];
        let outcome = deck.replace(&mut hand, 0, &[Color::Blue, Color::White]);
        assert_eq!(
            outcome,
            Some(Replacement::Replaced(Card::numbered(Color::Blue, 6)))
        );
        assert_eq!(hand, vec![Card::numbered(Color::Blue, 6)]);
        assert_eq!(deck.cards(), &[Card::numbered(Color::Red, 1)]);
    }

    #[test]
    fn replace_without_active_card_removes_exactly_one_slot() {
        let mut deck = Deck::from_cards(vec![Card::numbered(Color::Red, 1)]);
        let mut hand = vec![
            Card::numbered(Color::White, 2),
            Card::numbered(Color::Blue, 3),
            Card::numbered(Color::Blue, 4),
        ];
        let outcome = deck.replace(&mut hand, 1, &[Color::Blue, Color::White]);
        assert_eq!(outcome, Some(Replacement::Removed));
        assert_eq!(
            hand,
            vec![
                Card::numbered(Color::White, 2),
                Card::numbered(Color::Blue, 4)
            ]
        );
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn replace_out_of_range_is_ignored() {
        let mut deck = Deck::from_cards(vec![Card::numbered(Color::Red, 1)]);
        let mut hand = vec![];
        assert_eq!(deck.replace(&mut hand, 0, &[Color::Red]), None);
        assert_eq!(deck.remaining(), 1);
    }

    #[test]
    fn purge_color_clears_pool_and_hands() {
        let mut deck = Deck::from_cards(vec![
            Card::numbered(Color::Orange, 1),
            Card::numbered(Color::Blue, 5),
            Card::numbered(Color::Orange, 7),
        ]);
        let mut a = vec![
            Card::numbered(Color::Orange, 2),
            Card::numbered(Color::Orange, 3),
        ];
        let mut b = vec![Card::numbered(Color::Red, 4)];
        let active = [Color::Blue, Color::Red];
        let destroyed = deck.purge_color(Color::Orange, [&mut a, &mut b], &active);

        assert_eq!(destroyed, 4);
        assert_eq!(a, vec![Card::numbered(Color::Blue, 5)]);
        assert_eq!(b, vec![Card::numbered(Color::Red, 4)]);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn shuffled_deck_keeps_composition() {
        let mut deck = Deck::new_with_seed(42);
        deck.shuffle();
        assert_eq!(deck.remaining(), DECK_SIZE);
        for color in all_colors() {
            assert_eq!(deck.remaining_active(&[color]), 8);
        }
    }

    #[test]
    fn shuffle_is_deterministic_with_same_seed() {
        let mut d1 = Deck::new_with_seed(12345);
        let mut d2 = Deck::new_with_seed(12345);
        d1.shuffle();
        d2.shuffle();
        assert_eq!(d1.cards(), d2.cards());
    }
}
