use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest printed value on a card. Values run from 1 through `MAX_CARD_NUMBER`.
pub const MAX_CARD_NUMBER: u8 = 7;

/// Cards per color in a freshly built deck: the seven numbered cards plus one mystery card.
pub const CARDS_PER_COLOR: usize = MAX_CARD_NUMBER as usize + 1;

/// Size of a freshly built deck (6 colors x 8 cards).
pub const DECK_SIZE: usize = CARDS_PER_COLOR * 6;

/// One of the six monkey colors.
/// Every target and every card carries exactly one color.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Orange (#FF9800)
    Orange,
    /// Blue (#1976D2)
    Blue,
    /// Yellow (#FFCC32)
    Yellow,
    /// Purple (#AB47BC)
    Purple,
    /// Red (#F44336)
    Red,
    /// White (#E0E0E0)
    White,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Orange => "Orange",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Purple => "Purple",
            Color::Red => "Red",
            Color::White => "White",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Color::Orange => "#FF9800",
            Color::Blue => "#1976D2",
            Color::Yellow => "#FFCC32",
            Color::Purple => "#AB47BC",
            Color::Red => "#F44336",
            Color::White => "#E0E0E0",
        }
    }

    /// Case-insensitive lookup by color name.
    pub fn parse(name: &str) -> Option<Color> {
        let name = name.trim();
        all_colors()
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents a single banana card.
///
/// A mystery card gets its number when the deck is built but stays `hidden`
/// until it is played against a target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Color of the target this card can be played against
    pub color: Color,
    /// Value 1..=7
    pub number: u8,
    /// True while the number of a mystery card is still concealed
    pub hidden: bool,
    /// Whether this is the color's mystery card
    #[serde(rename = "isMystery")]
    pub mystery: bool,
}

impl Card {
    pub fn numbered(color: Color, number: u8) -> Self {
        Self {
            color,
            number,
            hidden: false,
            mystery: false,
        }
    }

    pub fn mystery(color: Color, number: u8) -> Self {
        Self {
            color,
            number,
            hidden: true,
            mystery: true,
        }
    }

    /// The number as other players may see it.
    pub fn visible_number(&self) -> Option<u8> {
        if self.hidden {
            None
        } else {
            Some(self.number)
        }
    }

    pub fn reveal(&mut self) {
        self.hidden = false;
    }
}

pub fn all_colors() -> [Color; 6] {
    [
        Color::Orange,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Red,
        Color::White,
    ]
}

/// Builds the unshuffled 48-card pool: for each color the values 1..=7 followed
/// by one mystery card whose value is drawn from `rng`.
pub fn full_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut v = Vec::with_capacity(DECK_SIZE);
    for &color in &all_colors() {
        for number in 1..=MAX_CARD_NUMBER {
            v.push(Card::numbered(color, number));
        }
        v.push(Card::mystery(color, rng.random_range(1..=MAX_CARD_NUMBER)));
    }
    v
}
