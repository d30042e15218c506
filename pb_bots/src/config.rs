//! Bot runner configuration.
//!
//! CLI flags win over environment variables, which win over defaults.

use private_blackjack::{Chips, TableConfig};

/// Complete bot runner configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Rounds to play before exiting
    pub rounds: usize,
    /// Bots seated at the table, one per seat from seat 1
    pub bots: usize,
    /// Chips each bot starts with
    pub starting_balance: Chips,
    /// Flat bet per round
    pub base_bet: Chips,
    /// Table rules
    pub table: TableConfig,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `rounds_override` - Rounds from the CLI
    /// * `bots_override` - Bot count from the CLI
    /// * `seed_override` - Shoe seed from the CLI
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        rounds_override: Option<usize>,
        bots_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut table = TableConfig::from_env();
        if seed_override.is_some() {
            table.shoe_seed = seed_override;
        }

        Ok(BotConfig {
            rounds: match rounds_override {
                Some(rounds) => rounds,
                None => parse_env("BOT_ROUNDS", 100)?,
            },
            bots: match bots_override {
                Some(bots) => bots,
                None => parse_env("BOT_COUNT", 3)?,
            },
            starting_balance: parse_env("BOT_STARTING_BALANCE", 1_000)?,
            base_bet: parse_env("BOT_BASE_BET", 10)?,
            table,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate().map_err(|reason| ConfigError::Invalid {
            var: "BJ_*".to_string(),
            reason,
        })?;

        if self.bots == 0 || self.bots > self.table.max_seats {
            return Err(ConfigError::Invalid {
                var: "BOT_COUNT".to_string(),
                reason: format!("Must be between 1 and {} seats", self.table.max_seats),
            });
        }

        if self.base_bet <= 0 {
            return Err(ConfigError::Invalid {
                var: "BOT_BASE_BET".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.starting_balance < self.base_bet {
            return Err(ConfigError::Invalid {
                var: "BOT_STARTING_BALANCE".to_string(),
                reason: format!("Must cover at least one bet of {}", self.base_bet),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Can't parse {value:?}"),
        }),
        Err(_) => Ok(default),
    }
}
