use serde::{Deserialize, Serialize};

use crate::cards::{Card, Color};
use crate::engine::{Engine, GameResult};
use crate::player::{PlayerId, PlayerType};
use crate::target::Target;
use crate::turn::Phase;

/// A card as any player may see it: mystery numbers stay masked until played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub color: Color,
    pub number: Option<u8>,
    #[serde(rename = "isMystery")]
    pub mystery: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            color: card.color,
            number: card.visible_number(),
            mystery: card.mystery,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub label: String,
    pub kind: PlayerType,
    pub hand: Vec<CardView>,
}

/// Serializable picture of a session, suitable for sending to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub round: u32,
    pub current_player: PlayerId,
    pub phase: Phase,
    pub scores: Vec<i32>,
    pub players: Vec<PlayerView>,
    pub targets: Vec<Target>,
    pub deck_remaining: usize,
    pub game_over: bool,
    #[serde(default)]
    pub result: Option<GameResult>,
    #[serde(default)]
    pub message: Option<String>,
    pub turn_seq: u64,
}

impl GameSnapshot {
    pub fn capture(engine: &Engine) -> Self {
        let players = engine
            .players()
            .iter()
            .map(|p| PlayerView {
                id: p.id(),
                label: p.label().to_string(),
                kind: p.kind(),
                hand: p.hand().iter().map(CardView::from).collect(),
            })
            .collect();
        Self {
            round: engine.round(),
            current_player: engine.current_player(),
            phase: engine.phase(),
            scores: engine.scores().to_vec(),
            players,
            targets: engine.targets().to_vec(),
            deck_remaining: engine.deck().remaining(),
            game_over: engine.is_game_over(),
            result: engine.winner().cloned(),
            message: engine.message().map(str::to_string),
            turn_seq: engine.turn().turn_seq,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::engine::TableSetup;
    use crate::player::PlayerType::Human;

    #[test]
    fn hidden_mystery_number_is_masked() {
        let mut setup = TableSetup::new([Human, Human, Human]);
        setup.hands[0] = vec![Card::mystery(Color::Purple, 6), Card::numbered(Color::Red, 2)];
        let engine = Engine::from_setup(setup, Some(1));
        let json = engine.snapshot().to_json().expect("serialize");

        let hand = &json["players"][0]["hand"];
        assert_eq!(hand[0]["number"], serde_json::Value::Null);
        assert_eq!(hand[0]["isMystery"], true);
        assert_eq!(hand[1]["number"], 2);
        assert_eq!(json["phase"], "card");
        assert_eq!(json["currentPlayer"], 0);
        assert_eq!(json["players"][0]["label"], "Coconut");
    }
}
