use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::Duration;
use url::Url;

use crate::error::{AppError, AppResult};

const DEFAULT_SIGNING_SECRET: &str = "change-me-secret";
const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 3600;
const MAX_EXPIRY_MINUTES: u64 = 10 * 365 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
    pub auth: AuthConfig,
    pub rewards: RewardsConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_seconds: u64,
    pub argon2: Argon2Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub output_length: Option<usize>,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> AppResult<Duration> {
        bounded_duration(
            "session_ttl_seconds",
            self.session_ttl_seconds,
            MAX_SESSION_TTL_SECONDS,
            Duration::seconds,
        )
    }
}

#[derive(Debug, Clone)]
pub struct RewardsConfig {
    pub signing_secret: SecretString,
    pub claim_url_base: String,
    pub default_expiry_minutes: u64,
    pub claim_timeout_ms: u64,
}

impl Serialize for RewardsConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("RewardsConfig", 4)?;
        state.serialize_field("signing_secret", "[REDACTED]")?;
        state.serialize_field("claim_url_base", &self.claim_url_base)?;
        state.serialize_field("default_expiry_minutes", &self.default_expiry_minutes)?;
        state.serialize_field("claim_timeout_ms", &self.claim_timeout_ms)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for RewardsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RewardsConfigHelper {
            signing_secret: String,
            claim_url_base: String,
            default_expiry_minutes: u64,
            claim_timeout_ms: u64,
        }

        let helper = RewardsConfigHelper::deserialize(deserializer)?;
        Ok(RewardsConfig {
            signing_secret: SecretString::from(helper.signing_secret),
            claim_url_base: helper.claim_url_base,
            default_expiry_minutes: helper.default_expiry_minutes,
            claim_timeout_ms: helper.claim_timeout_ms,
        })
    }
}

impl RewardsConfig {
    #[must_use]
    pub fn signing_secret(&self) -> &str {
        self.signing_secret.expose_secret()
    }

    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.signing_secret.expose_secret() == DEFAULT_SIGNING_SECRET
    }

    pub fn default_expiry(&self) -> AppResult<Duration> {
        bounded_duration(
            "default_expiry_minutes",
            self.default_expiry_minutes,
            MAX_EXPIRY_MINUTES,
            Duration::minutes,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub rewards: Vec<SeedReward>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub balance: u64,
}

/// Without a `code` the reward is minted as a signed envelope at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReward {
    #[serde(default)]
    pub code: Option<String>,
    pub amount: u64,
    #[serde(default)]
    pub expires_in_minutes: Option<u64>,
    #[serde(default)]
    pub description: String,
}

impl SeedReward {
    pub fn expires_in(&self) -> AppResult<Option<Duration>> {
        self.expires_in_minutes
            .map(|minutes| {
                bounded_duration(
                    "expires_in_minutes",
                    minutes,
                    MAX_EXPIRY_MINUTES,
                    Duration::minutes,
                )
            })
            .transpose()
    }
}

/// Converts a configured count of `unit`s, refusing zero and anything past `max`.
fn bounded_duration(
    field: &str,
    value: u64,
    max: u64,
    unit: fn(i64) -> Duration,
) -> AppResult<Duration> {
    if value == 0 || value > max {
        return Err(AppError::ConfigError {
            message: format!("{field} must be between 1 and {max}, got {value}"),
        });
    }

    i64::try_from(value)
        .map(unit)
        .map_err(|_| AppError::ConfigError {
            message: format!("{field} is out of range: {value}"),
        })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            output_length: Some(32),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: 7 * 24 * 3600,
            argon2: Argon2Config::default(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            signing_secret: SecretString::from(DEFAULT_SIGNING_SECRET),
            claim_url_base: "https://classmint.local/claim".to_string(),
            default_expiry_minutes: 60,
            claim_timeout_ms: 2000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5050,
                cors_origin: None,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
            auth: AuthConfig::default(),
            rewards: RewardsConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "server host cannot be empty".to_string(),
            });
        }

        self.auth.session_ttl()?;

        if self.rewards.signing_secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "signing_secret cannot be empty".to_string(),
            });
        }

        if self.rewards.uses_default_secret() && self.environment.env == "production" {
            return Err(AppError::ConfigError {
                message: "signing_secret must be changed in production".to_string(),
            });
        }

        if Url::parse(&self.rewards.claim_url_base).is_err() {
            return Err(AppError::ConfigError {
                message: format!(
                    "claim_url_base is not a valid URL: {}",
                    self.rewards.claim_url_base
                ),
            });
        }

        self.rewards.default_expiry()?;

        if self.rewards.claim_timeout_ms == 0 {
            return Err(AppError::ConfigError {
                message: "claim_timeout_ms must be greater than 0".to_string(),
            });
        }

        self.seed.validate()
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SeedConfig {
    pub fn validate(&self) -> AppResult<()> {
        let mut ids = HashSet::new();
        let mut usernames = HashSet::new();
        for user in &self.users {
            if !ids.insert(user.id) {
                return Err(AppError::ConfigError {
                    message: format!("Duplicate seed user id: {}", user.id),
                });
            }
            if user.username.trim().is_empty() || user.password.is_empty() {
                return Err(AppError::ConfigError {
                    message: format!("Seed user {} needs a username and password", user.id),
                });
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(AppError::ConfigError {
                    message: format!("Duplicate seed username: '{}'", user.username),
                });
            }
        }

        let mut codes = HashSet::new();
        for reward in &self.rewards {
            let label = reward.code.as_deref().unwrap_or("<signed>");
            if reward.amount == 0 {
                return Err(AppError::ConfigError {
                    message: format!("Seed reward '{label}' must have a positive amount"),
                });
            }
            if reward.expires_in().is_err() {
                return Err(AppError::ConfigError {
                    message: format!(
                        "Seed reward '{label}' must expire within 1 to {MAX_EXPIRY_MINUTES} minutes"
                    ),
                });
            }
            if let Some(code) = &reward.code
                && !codes.insert(code.trim())
            {
                return Err(AppError::ConfigError {
                    message: format!("Duplicate seed reward code: '{code}'"),
                });
            }
        }

        Ok(())
    }
}
