use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_SEED_ADMIN_EMAIL: &str = "admin@fieldtrack.app";
pub const DEFAULT_SEED_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_SEED_ADMIN_NAME: &str = "System Admin";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub timezone: Option<String>,
    pub token_ttl_hours: Option<i64>,
    pub bcrypt_cost: Option<u32>,
    pub seed_admin_email: Option<String>,
    pub seed_admin_password: Option<String>,
    pub seed_admin_name: Option<String>,
    pub workers: Option<usize>,
    pub max_body_bytes: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let mut config: Config = cfg.try_deserialize()?;

        if config.timezone.is_none() {
            config.timezone = Some("UTC".to_string());
        }

        config.validate()?;

        Ok(config)
    }

    /// Timezone used to decide where "today" starts for dashboards.
    pub fn get_timezone(&self) -> Result<Tz, chrono_tz::ParseError> {
        let tz_str = self.timezone.as_deref().unwrap_or("UTC");
        tz_str.parse::<Tz>()
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        if self.jwt_secret.len() < 16 {
            return Err(config::ConfigError::Message(
                "JWT_SECRET must be at least 16 characters long".to_string(),
            ));
        }

        if let Some(tz_str) = &self.timezone {
            if tz_str.parse::<Tz>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid timezone: {}",
                    tz_str
                )));
            }
        }

        if let Some(hours) = self.token_ttl_hours {
            if !(1..=24 * 30).contains(&hours) {
                return Err(config::ConfigError::Message(
                    "token_ttl_hours must be between 1 and 720".to_string(),
                ));
            }
        }

        if let Some(cost) = self.bcrypt_cost {
            if !(4..=31).contains(&cost) {
                return Err(config::ConfigError::Message(
                    "bcrypt_cost must be between 4 and 31".to_string(),
                ));
            }
        }

        // 1KB..10MB, the API only ever receives small JSON bodies
        if let Some(limit) = self.max_body_bytes {
            let min = 1024;
            let max = 10 * 1024 * 1024;
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(256 * 1024)
    }

    pub fn effective_token_ttl_hours(&self) -> i64 {
        self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
    }

    pub fn effective_bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn seed_admin(&self) -> SeedAdmin {
        SeedAdmin {
            email: self
                .seed_admin_email
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN_EMAIL.to_string()),
            password: self
                .seed_admin_password
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN_PASSWORD.to_string()),
            name: self
                .seed_admin_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN_NAME.to_string()),
        }
    }
}

/// Credentials of the bootstrap admin account.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}
