//! # Sim Command
//!
//! Plays whole games with a bot in every seat and prints a summary of
//! outcomes. Game `i` uses seed `seed + i`, so a run is reproducible.
//!
//! # Environment Variables
//!
//! - `MONKEYBET_SIM_BREAK_AFTER`: Stop after N games (for testing)

use crate::config;
use crate::error::CliError;
use crate::formatters::player_label;
use crate::ui;
use monkeybet_ai::{BotStrategy, create_ai};
use monkeybet_engine::engine::{Engine, GameResult};
use monkeybet_engine::player::{PLAYER_COUNT, PlayerType};
use std::io::Write;

/// Outcome counts across a simulation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimSummary {
    pub games: u32,
    pub wins: [u32; PLAYER_COUNT],
    pub ties: u32,
    pub stalemates: u32,
    pub total_rounds: u64,
}

impl SimSummary {
    fn record(&mut self, result: &GameResult, rounds: u32) {
        self.games += 1;
        self.total_rounds += u64::from(rounds);
        match result {
            GameResult::Winner { player, .. } => self.wins[*player] += 1,
            GameResult::Tie { .. } => self.ties += 1,
            GameResult::Stalemate { .. } => self.stalemates += 1,
        }
    }

    pub fn average_rounds(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.games)
        }
    }
}

/// Handle the sim command.
///
/// # Errors
///
/// - `CliError::InvalidInput` for `--games 0` or an unknown strategy
/// - `CliError::Interrupted` when `MONKEYBET_SIM_BREAK_AFTER` stops the run
pub fn handle_sim_command(
    games: u32,
    seed: Option<u64>,
    bot: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let cfg = match config::load() {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let bot = bot.unwrap_or(cfg.bot);
    let break_after = std::env::var("MONKEYBET_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u32>().ok());

    writeln!(out, "sim: games={} seed={} bot={}", games, seed, bot)?;

    let mut summary = SimSummary::default();
    for i in 0..games {
        if let Some(b) = break_after
            && summary.games == b
        {
            writeln!(out, "Interrupted: completed {}/{}", summary.games, games)?;
            return Err(CliError::Interrupted(format!(
                "completed {}/{}",
                summary.games, games
            )));
        }
        let game_seed = seed.wrapping_add(u64::from(i));
        let (result, rounds) = play_one(game_seed, &bot)?;
        summary.record(&result, rounds);
    }

    write_summary(&summary, out)
}

/// Plays one all-bot game to the end.
fn play_one(seed: u64, bot: &str) -> Result<(GameResult, u32), CliError> {
    let bots = (0..PLAYER_COUNT)
        .map(|seat| create_ai(bot, seed.wrapping_add(seat as u64 + 1)))
        .collect::<Result<Vec<Box<dyn BotStrategy>>, _>>()?;

    let mut engine = Engine::new(Some(seed));
    engine.start_session([PlayerType::Bot; PLAYER_COUNT]);
    while let Some(token) = engine.pending_bot_turn() {
        let action = bots[token.player].get_action(&engine, token.player);
        engine.run_bot_turn(token, action)?;
    }
    match engine.winner() {
        Some(result) => Ok((result.clone(), engine.round())),
        None => Err(CliError::Engine(format!(
            "game with seed {} stopped before it finished",
            seed
        ))),
    }
}

fn write_summary(summary: &SimSummary, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "Games: {}", summary.games)?;
    for (player, wins) in summary.wins.iter().enumerate() {
        writeln!(out, "{} wins: {}", player_label(player), wins)?;
    }
    writeln!(out, "Ties: {}", summary.ties)?;
    writeln!(out, "Stalemates: {}", summary.stalemates)?;
    writeln!(out, "Average rounds: {:.2}", summary.average_rounds())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_add_up_to_games_played() {
        let mut summary = SimSummary::default();
        for seed in 0..20 {
            let (result, rounds) = play_one(seed, "random").expect("game");
            assert!(rounds >= 1);
            summary.record(&result, rounds);
        }
        let decided: u32 = summary.wins.iter().sum();
        assert_eq!(decided + summary.ties + summary.stalemates, 20);
        assert!(summary.average_rounds() >= 1.0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let a = play_one(42, "baseline").expect("game");
        let b = play_one(42, "baseline").expect("game");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_summary_averages_zero() {
        assert_eq!(SimSummary::default().average_rounds(), 0.0);
    }
}
