use crate::cards::{Card, Color};
use serde::{Deserialize, Serialize};

/// Seat index, `0..PLAYER_COUNT`.
pub type PlayerId = usize;

/// Fixed roster size, whatever the human/bot mix.
pub const PLAYER_COUNT: usize = 3;

/// Cards dealt to every player once the initial bets are in.
pub const CARDS_PER_PLAYER: usize = 5;

/// Bets a single target can hold.
pub const MAX_BETS: usize = 4;

/// Display labels for the three seats.
pub const PLAYER_LABELS: [&str; PLAYER_COUNT] = ["Coconut", "Watermelon", "Pineapple"];

/// Who controls a seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    Human,
    Bot,
}

/// Roster presets offered by the main menu.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// One human, two bots
    Single,
    /// Two humans, one bot
    Two,
    /// Three humans
    Three,
}

impl GameMode {
    pub fn player_types(self) -> [PlayerType; PLAYER_COUNT] {
        use PlayerType::{Bot, Human};
        match self {
            GameMode::Single => [Human, Bot, Bot],
            GameMode::Two => [Human, Human, Bot],
            GameMode::Three => [Human, Human, Human],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Two => "two",
            GameMode::Three => "three",
        }
    }
}

/// Represents an action a player can submit on their turn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Place one bet on the target of this color
    Bet { target: Color },
    /// Play the card at this hand index
    Play { card_index: usize },
    /// End a card turn without playing; only legal with an empty hand
    Pass,
}

/// A seat at the table and the cards it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    kind: PlayerType,
    hand: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, kind: PlayerType) -> Self {
        Self {
            id,
            kind,
            hand: Vec::with_capacity(CARDS_PER_PLAYER),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn kind(&self) -> PlayerType {
        self.kind
    }

    pub fn is_bot(&self) -> bool {
        self.kind == PlayerType::Bot
    }

    pub fn label(&self) -> &'static str {
        PLAYER_LABELS[self.id % PLAYER_COUNT]
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Vec<Card> {
        &mut self.hand
    }

    pub fn set_hand(&mut self, hand: Vec<Card>) {
        self.hand = hand;
    }
}
