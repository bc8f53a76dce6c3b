use serde::{Deserialize, Serialize};

use crate::cards::{all_colors, Color};
use crate::player::{PlayerId, MAX_BETS};

/// A monkey: something players bet on and play cards against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub color: Color,
    pub name: String,
    /// Last card value played against this target in the current round
    pub number: Option<u8>,
    /// Bettors in placement order; one entry per bet
    pub bets: Vec<PlayerId>,
    pub eliminated: bool,
}

impl Target {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            name: format!("{} monkey", color.name()),
            number: None,
            bets: Vec::with_capacity(MAX_BETS),
            eliminated: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    pub fn is_full(&self) -> bool {
        self.bets.len() >= MAX_BETS
    }

    pub fn accepts_bet(&self) -> bool {
        !self.eliminated && !self.is_full()
    }

    /// How many bets `player` holds on this target.
    pub fn bets_by(&self, player: PlayerId) -> usize {
        self.bets.iter().filter(|&&p| p == player).count()
    }

    pub fn reset_number(&mut self) {
        self.number = None;
    }
}

/// The six targets in their fixed table order.
pub fn all_targets() -> Vec<Target> {
    all_colors().into_iter().map(Target::new).collect()
}

pub fn active_colors(targets: &[Target]) -> Vec<Color> {
    targets
        .iter()
        .filter(|t| t.is_active())
        .map(|t| t.color)
        .collect()
}
