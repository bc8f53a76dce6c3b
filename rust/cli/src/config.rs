use serde::{Deserialize, Serialize};
use std::fs;

use crate::cli::Mode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub mode: String,
    pub bot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub mode: ValueSource,
    pub bot: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            mode: ValueSource::Default,
            bot: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            mode: "single".into(),
            bot: "random".into(),
        }
    }
}

impl Config {
    /// Roster preset named by `mode`; validated on load.
    pub fn mode(&self) -> Mode {
        Mode::parse(&self.mode).unwrap_or(Mode::Single)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("MONKEYBET_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.mode {
            cfg.mode = v;
            sources.mode = ValueSource::File;
        }
        if let Some(v) = f.bot {
            cfg.bot = v;
            sources.bot = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("MONKEYBET_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(mode) = std::env::var("MONKEYBET_MODE")
        && !mode.is_empty()
    {
        cfg.mode = mode;
        sources.mode = ValueSource::Env;
    }
    if let Ok(bot) = std::env::var("MONKEYBET_BOT")
        && !bot.is_empty()
    {
        cfg.bot = bot;
        sources.bot = ValueSource::Env;
    }

    validate(&mut cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    bot: Option<String>,
}

/// Checks `mode` and `bot` and normalizes them to their canonical names.
fn validate(cfg: &mut Config) -> Result<(), ConfigError> {
    let Some(mode) = Mode::parse(&cfg.mode) else {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: mode must be single, two or three (got '{}')",
            cfg.mode
        )));
    };
    cfg.mode = mode.as_str().to_string();

    let bot = cfg.bot.trim().to_ascii_lowercase();
    if !monkeybet_ai::STRATEGIES.contains(&bot.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: bot must be one of {} (got '{}')",
            monkeybet_ai::STRATEGIES.join(", "),
            cfg.bot
        )));
    }
    cfg.bot = bot;
    Ok(())
}
