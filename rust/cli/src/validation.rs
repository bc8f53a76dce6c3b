//! Input parsing for the interactive `play` command.
//!
//! Parsing only checks the shape of a command. Whether the move is legal in
//! the current phase is left to the engine, which reports a typed error.

use monkeybet_engine::cards::Color;
use monkeybet_engine::player::PlayerAction;

/// Outcome of parsing one line of player input.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// Well-formed player action
    Action(PlayerAction),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parse user input string into a PlayerAction or special commands.
///
/// Accepts the following input formats (case-insensitive):
/// - "bet <color>" or "b <color>" → Bet on that color's target
/// - "play <n>" or "p <n>" → Play the n-th card of the hand, counting from 1
/// - "pass" → Pass (only accepted by the engine with an empty hand)
/// - "q" or "quit" → Quit command
///
/// # Example
///
/// ```rust
/// # use monkeybet_cli::validation::{parse_player_action, ParseResult};
/// use monkeybet_engine::cards::Color;
/// use monkeybet_engine::player::PlayerAction;
///
/// assert_eq!(
///     parse_player_action("bet orange"),
///     ParseResult::Action(PlayerAction::Bet { target: Color::Orange })
/// );
/// assert_eq!(
///     parse_player_action("p 1"),
///     ParseResult::Action(PlayerAction::Play { card_index: 0 })
/// );
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
///
/// match parse_player_action("fold") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("Expected Invalid"),
/// }
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&command) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match command {
        "q" | "quit" => ParseResult::Quit,
        "pass" => ParseResult::Action(PlayerAction::Pass),
        "bet" | "b" => {
            let Some(name) = parts.get(1) else {
                return ParseResult::Invalid(
                    "Bet requires a color (e.g., 'bet red')".to_string(),
                );
            };
            match Color::parse(name) {
                Some(target) => ParseResult::Action(PlayerAction::Bet { target }),
                None => ParseResult::Invalid(format!(
                    "Unknown color '{}'. Colors: orange, blue, yellow, purple, red, white",
                    name
                )),
            }
        }
        "play" | "p" => {
            let Some(n) = parts.get(1) else {
                return ParseResult::Invalid(
                    "Play requires a card number (e.g., 'play 1')".to_string(),
                );
            };
            match n.parse::<usize>() {
                Ok(n) if n >= 1 => ParseResult::Action(PlayerAction::Play { card_index: n - 1 }),
                Ok(_) => ParseResult::Invalid("Card numbers start at 1".to_string()),
                Err(_) => ParseResult::Invalid(format!("Invalid card number '{}'", n)),
            }
        }
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: bet <color>, play <n>, pass, q",
            other
        )),
    }
}
