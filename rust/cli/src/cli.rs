//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use monkeybet_engine::player::GameMode;

#[derive(Parser, Debug)]
#[command(
    name = "monkeybet",
    version,
    about = "Monkey betting card game: play in the terminal or run bot simulations"
)]
pub struct MonkeybetCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an interactive game on stdin
    Play {
        /// Human/bot mix for the three seats
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        #[arg(long)]
        seed: Option<u64>,
        /// Bot strategy for bot seats (random, baseline)
        #[arg(long)]
        bot: Option<String>,
    },
    /// Run all-bot games and print a summary
    Sim {
        #[arg(long, default_value_t = 100)]
        games: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        bot: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

/// Roster presets for the `play` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One human, two bots
    Single,
    /// Two humans, one bot
    Two,
    /// Three humans
    Three,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        self.game_mode().as_str()
    }

    pub fn game_mode(&self) -> GameMode {
        match self {
            Mode::Single => GameMode::Single,
            Mode::Two => GameMode::Two,
            Mode::Three => GameMode::Three,
        }
    }

    pub fn parse(s: &str) -> Option<Mode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "1" => Some(Mode::Single),
            "two" | "2" => Some(Mode::Two),
            "three" | "3" => Some(Mode::Three),
            _ => None,
        }
    }
}
