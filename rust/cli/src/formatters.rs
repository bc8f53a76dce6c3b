//! Card, target, and action formatters for terminal display.
//!
//! Pure functions, so the `play` and `sim` commands and the tests share one
//! rendering of the table.
//!
//! ## Example
//!
//! ```rust
//! use monkeybet_engine::cards::{Card, Color};
//! use monkeybet_cli::formatters::{format_card, format_hand};
//!
//! assert_eq!(format_card(&Card::numbered(Color::Blue, 3)), "Blue 3");
//! assert_eq!(format_card(&Card::mystery(Color::Red, 6)), "Red ?");
//! assert_eq!(
//!     format_hand(&[Card::numbered(Color::Blue, 3)]),
//!     "[1] Blue 3"
//! );
//! ```

use monkeybet_engine::cards::Card;
use monkeybet_engine::player::{PLAYER_LABELS, PlayerAction, PlayerId};
use monkeybet_engine::target::Target;

/// `"<Color> <n>"`, with `?` in place of a hidden mystery number.
pub fn format_card(card: &Card) -> String {
    match card.visible_number() {
        Some(n) => format!("{} {}", card.color, n),
        None => format!("{} ?", card.color),
    }
}

/// Cards numbered from 1, matching the `play <n>` command.
pub fn format_hand(hand: &[Card]) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {}", i + 1, format_card(c)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// One line per target: name, current number, and the seats holding bets.
///
/// ```rust
/// use monkeybet_engine::cards::Color;
/// use monkeybet_engine::target::Target;
/// use monkeybet_cli::formatters::format_target;
///
/// let mut t = Target::new(Color::Yellow);
/// t.bets = vec![0, 2, 0];
/// t.number = Some(5);
/// assert_eq!(format_target(&t), "Yellow monkey   5  bets 3/4: Coconut, Pineapple, Coconut");
/// ```
pub fn format_target(target: &Target) -> String {
    if target.eliminated {
        return format!("{:<15} eliminated", target.name);
    }
    let number = target
        .number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let bets: Vec<&str> = target.bets.iter().map(|&p| player_label(p)).collect();
    let mut line = format!(
        "{:<15} {:>1}  bets {}/{}",
        target.name,
        number,
        target.bets.len(),
        monkeybet_engine::player::MAX_BETS
    );
    if !bets.is_empty() {
        line.push_str(": ");
        line.push_str(&bets.join(", "));
    }
    line
}

pub fn format_action(action: &PlayerAction) -> String {
    match action {
        PlayerAction::Bet { target } => format!("bet {}", target),
        PlayerAction::Play { card_index } => format!("play {}", card_index + 1),
        PlayerAction::Pass => "pass".to_string(),
    }
}

/// `"Coconut 2 | Watermelon 0 | Pineapple -1"`
pub fn format_scores(scores: &[i32]) -> String {
    scores
        .iter()
        .enumerate()
        .map(|(p, s)| format!("{} {}", player_label(p), s))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn player_label(player: PlayerId) -> &'static str {
    PLAYER_LABELS.get(player).copied().unwrap_or("?")
}
