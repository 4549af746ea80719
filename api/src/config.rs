use chrono::Duration;
use figment::{providers::Env, Figment};
use serde::Deserialize;

const KEYS: &[&str] = &[
    "jwt_secret",
    "token_ttl_secs",
    "database_url",
    "listen_addr",
    "log_level",
    "max_db_connections",
];

#[derive(Clone, Deserialize)]
pub struct Config {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

fn default_token_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_database_url() -> String {
    "sqlite://wishlist.db?mode=rwc".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "wishlist_server=debug,tower_http=info".to_string()
}

fn default_max_db_connections() -> u32 {
    5
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("database_url", &self.database_url)
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("max_db_connections", &self.max_db_connections)
            .finish()
    }
}

impl Config {
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Env::raw().only(KEYS));
        // Env values are parsed as numbers or bools; the secret is kept as written
        match std::env::var("JWT_SECRET") {
            Ok(secret) => figment.merge(("jwt_secret", secret)),
            Err(_) => figment,
        }
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        let config: Config = figment.extract()?;

        if config.jwt_secret.trim().is_empty() {
            return Err(figment::Error::from(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }
        if config.token_ttl_secs == 0 || config.try_token_ttl().is_none() {
            return Err(figment::Error::from(format!(
                "TOKEN_TTL_SECS out of range: {}",
                config.token_ttl_secs
            )));
        }

        Ok(config)
    }

    fn try_token_ttl(&self) -> Option<Duration> {
        i64::try_from(self.token_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
    }

    pub fn token_ttl(&self) -> Duration {
        self.try_token_ttl()
            .unwrap_or_else(|| Duration::seconds(default_token_ttl_secs() as i64))
    }
}
