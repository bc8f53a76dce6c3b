//! # Play Command
//!
//! Hot-seat play in the terminal. Human seats type commands on stdin; bot
//! seats move on their own between human prompts.
//!
//! ## Features
//!
//! - Table view before each human move (targets, scores, own hand)
//! - Input parsing with clear error messages; illegal moves are refused
//!   without changing the game
//! - Graceful quit with `q`, `quit`, or end of input

use crate::cli::Mode;
use crate::config;
use crate::error::CliError;
use crate::formatters::{
    format_action, format_card, format_hand, format_scores, format_target, player_label,
};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_player_action};
use monkeybet_ai::{BotStrategy, create_ai};
use monkeybet_engine::cards::{Card, Color};
use monkeybet_engine::engine::{Engine, GameResult};
use monkeybet_engine::events::{GameEvent, GameListener, dispatch};
use monkeybet_engine::player::{PLAYER_COUNT, PlayerId};
use monkeybet_engine::turn::Phase;
use std::io::{BufRead, Write};

/// Handle the play command: an interactive game on `stdin`.
///
/// Unset options fall back to the resolved configuration (`cfg` shows it).
///
/// # Arguments
///
/// * `mode` - Human/bot mix; seat 0 is always human
/// * `seed` - RNG seed for the deck and the bots (default: random)
/// * `bot` - Strategy name for every bot seat
/// * `out` - Output stream for the table and events
/// * `err` - Error stream for rejected input
/// * `stdin` - Input stream for human commands
pub fn handle_play_command(
    mode: Option<Mode>,
    seed: Option<u64>,
    bot: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = match config::load() {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };
    let mode = mode.unwrap_or_else(|| cfg.mode());
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    if bot.is_some() && mode == Mode::Three {
        ui::display_warning(err, "--bot has no effect when every seat is human")?;
    }
    let bot = bot.unwrap_or(cfg.bot);

    execute_play_command(mode, seed, &bot, stdin, out, err)
}

fn execute_play_command(
    mode: Mode,
    seed: u64,
    bot: &str,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let seats = mode.game_mode().player_types();
    let mut bots: Vec<Option<Box<dyn BotStrategy>>> = Vec::with_capacity(PLAYER_COUNT);
    for (seat, kind) in seats.iter().enumerate() {
        if kind == &monkeybet_engine::player::PlayerType::Bot {
            bots.push(Some(create_ai(bot, seed.wrapping_add(seat as u64 + 1))?));
        } else {
            bots.push(None);
        }
    }

    writeln!(out, "play: mode={} seed={} bot={}", mode.as_str(), seed, bot)?;

    let mut engine = Engine::new(Some(seed));
    let events = engine.start_game(mode.game_mode());
    write_events(&events, out)?;

    while !engine.is_game_over() {
        if let Some(token) = engine.pending_bot_turn() {
            let Some(strategy) = bots.get(token.player).and_then(|b| b.as_ref()) else {
                return Err(CliError::Engine(format!(
                    "no strategy for bot seat {}",
                    token.player
                )));
            };
            let action = strategy.get_action(&engine, token.player);
            let events = engine.run_bot_turn(token, action)?;
            writeln!(
                out,
                "{} (bot): {}",
                player_label(token.player),
                format_action(&action)
            )?;
            write_events(&events, out)?;
            continue;
        }

        let player = engine.current_player();
        write_table(&engine, player, out)?;
        write!(out, "{}", prompt(player, engine.phase()))?;
        out.flush()?;

        let Some(input) = read_stdin_line(stdin) else {
            writeln!(out)?;
            writeln!(out, "Input closed; leaving the game.")?;
            return Ok(());
        };
        match parse_player_action(&input) {
            ParseResult::Action(action) => match engine.submit_action(player, action) {
                Ok(events) => {
                    writeln!(out, "{}: {}", player_label(player), format_action(&action))?;
                    write_events(&events, out)?;
                }
                Err(e) => ui::write_error(err, &format!("Invalid action: {}", e))?,
            },
            ParseResult::Quit => {
                writeln!(out, "Quit.")?;
                return Ok(());
            }
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }

    writeln!(out, "Final scores: {}", format_scores(engine.scores()))?;
    Ok(())
}

fn prompt(player: PlayerId, phase: Phase) -> String {
    let choices = match phase {
        Phase::InitialBet | Phase::Bet => "bet <color>",
        Phase::Card => "play <n>/pass",
    };
    format!("{} ({}): {}/q > ", player_label(player), phase, choices)
}

fn write_table(engine: &Engine, player: PlayerId, out: &mut dyn Write) -> Result<(), CliError> {
    ui::write_rule(out)?;
    writeln!(
        out,
        "Round {} | Deck {} | {}",
        engine.round(),
        engine.deck_remaining(),
        format_scores(engine.scores())
    )?;
    for target in engine.targets() {
        writeln!(out, "  {}", format_target(target))?;
    }
    if let Some(hand) = engine.hand(player) {
        writeln!(out, "Hand: {}", format_hand(hand))?;
    }
    Ok(())
}

/// Renders engine events as terminal lines.
#[derive(Default)]
struct EventPrinter {
    lines: Vec<String>,
}

impl GameListener for EventPrinter {
    fn on_bet_placed(&mut self, player: PlayerId, target: Color) {
        self.lines
            .push(format!("{} bets on {} monkey", player_label(player), target));
    }

    fn on_hands_dealt(&mut self, hand_sizes: &[usize]) {
        let size = hand_sizes.first().copied().unwrap_or(0);
        self.lines
            .push(format!("All bets are in. Dealt {} cards to each player.", size));
    }

    fn on_card_played(&mut self, player: PlayerId, card: &Card, target: Option<Color>) {
        let line = match target {
            Some(color) => format!(
                "{} plays {} on {} monkey",
                player_label(player),
                format_card(card),
                color
            ),
            None => format!(
                "{} discards {} (monkey already eliminated)",
                player_label(player),
                format_card(card)
            ),
        };
        self.lines.push(line);
    }

    fn on_elimination(&mut self, target: Option<Color>, tied: bool) {
        match target {
            Some(color) if !tied => self.lines.push(format!(
                "{} monkey is eliminated! Bets on it are reversed.",
                color
            )),
            _ => self.lines.push("Tie detected, no elimination.".to_string()),
        }
    }

    fn on_round_start(&mut self, round: u32) {
        self.lines.push(format!("Round {} begins!", round));
    }

    fn on_game_over(&mut self, result: &GameResult) {
        self.lines.push(result.announcement());
    }
}

fn write_events(events: &[GameEvent], out: &mut dyn Write) -> Result<(), CliError> {
    let mut printer = EventPrinter::default();
    dispatch(events, &mut printer);
    for line in printer.lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
