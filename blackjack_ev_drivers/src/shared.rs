use blackjack_ev::{Rule, SearchConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_ev.yml";
const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack_ev.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot find home directory")]
    NoHomeDirectory,
    #[error("config file {0:?} does not exist")]
    NotFound(PathBuf),
    #[error("{0:?} should be a path rather than a directory")]
    IsDirectory(PathBuf),
    #[error("cannot read config file {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config")]
    Parse(#[from] serde_yaml::Error),
    #[error("number_of_decks must be at least 1")]
    NoDecks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rule: ConfigRule,
    #[serde(default)]
    pub search: ConfigSearch,
    #[serde(default)]
    pub blackjack_ev_simulator: ConfigBlackjackSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    #[serde(default)]
    pub dealer_hit_on_soft17: bool,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = Rule::default();
        ConfigRule {
            number_of_decks: rule.number_of_decks,
            dealer_hit_on_soft17: rule.dealer_hit_on_soft17,
        }
    }
}

impl TryInto<Rule> for ConfigRule {
    type Error = ConfigError;

    fn try_into(self) -> Result<Rule, Self::Error> {
        if self.number_of_decks == 0 {
            return Err(ConfigError::NoDecks);
        }
        Ok(Rule {
            number_of_decks: self.number_of_decks,
            dealer_hit_on_soft17: self.dealer_hit_on_soft17,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSearch {
    pub memoize: bool,
    pub min_cards_in_shoe: u16,
    pub max_player_draws: Option<u8>,
}

impl Default for ConfigSearch {
    fn default() -> Self {
        let search = SearchConfig::default();
        ConfigSearch {
            memoize: search.memoize,
            min_cards_in_shoe: search.min_cards_in_shoe,
            max_player_draws: search.max_player_draws,
        }
    }
}

impl From<ConfigSearch> for SearchConfig {
    fn from(config: ConfigSearch) -> Self {
        SearchConfig {
            memoize: config.memoize,
            min_cards_in_shoe: config.min_cards_in_shoe,
            max_player_draws: config.max_player_draws,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigBlackjackSimulator {
    pub number_of_shoes: u32,
    /// A new shoe is started once no more than this many cards are left.
    pub cut_card_remaining: usize,
    pub seed: Option<u64>,
}

impl Default for ConfigBlackjackSimulator {
    fn default() -> Self {
        ConfigBlackjackSimulator {
            number_of_shoes: 1,
            cut_card_remaining: 8,
            seed: None,
        }
    }
}

pub fn parse_config_from_str(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(ConfigError::IsDirectory(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_from_str(&content)
}

/// Loads the config named on the command line. The default path may be
/// missing, in which case the built-in defaults are used.
pub fn load_config(config_arg: &str) -> Result<Config, ConfigError> {
    if config_arg != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(Path::new(config_arg));
    }
    let home_dir = home::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    let path = home_dir.join(DEFAULT_CONFIG_FILE_NAME);
    if !path.exists() {
        log::info!("{} not found, using default config", path.display());
        return Ok(Config::default());
    }
    parse_config_from_file(&path)
}

/// Sends `log` records to the terminal. Info by default, Debug when verbose.
pub fn init_logger(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
}
