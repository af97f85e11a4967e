//! Configuration management for RAX Auth Server
//!
//! All values are loaded once at startup from config.toml, with environment
//! overrides under the RAX_AUTH prefix.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Redirect target after a successful login
    pub login_redirect: String,

    /// Session time-to-live in seconds
    pub session_ttl_secs: u64,

    /// Whether validating a live session slides its expiry forward by one TTL
    pub sliding_expiry: bool,

    /// Interval between expired-session sweeps
    pub session_sweep_interval_secs: u64,

    /// Bound on store lock acquisition; elapse surfaces as StoreUnavailable
    pub store_timeout_ms: u64,

    /// Shard count for the sharded stores (key-level write granularity)
    pub store_shards: usize,

    /// Input bounds, enforced before any KDF work
    pub max_identifier_length: usize,
    pub max_secret_length: usize,

    /// Argon2id parameters for newly hashed secrets
    pub kdf_memory_kib: u32,
    pub kdf_time_cost: u32,
    pub kdf_parallelism: u32,

    /// Minimum time cost accepted from externally supplied PHC hashes
    pub kdf_min_time_cost: u32,

    /// Seeded credential records
    #[serde(default)]
    pub credentials: Vec<CredentialSeed>,
}

/// One seeded credential entry from config.toml
///
/// Exactly one of `secret_hash` (PHC-format Argon2 string) or `secret`
/// (plaintext, hashed at startup, development only) must be set.
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialSeed {
    pub identifier: String,
    pub secret_hash: Option<String>,
    pub secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Environment::with_prefix("RAX_AUTH"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub(crate) fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.session_ttl_secs == 0 {
            return Err(config::ConfigError::Message(
                "session_ttl_secs must be greater than 0".into(),
            ));
        }

        if self.store_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "store_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.store_shards == 0 {
            return Err(config::ConfigError::Message(
                "store_shards must be greater than 0".into(),
            ));
        }

        if self.max_identifier_length == 0 || self.max_secret_length == 0 {
            return Err(config::ConfigError::Message(
                "input length bounds must be greater than 0".into(),
            ));
        }

        if self.kdf_time_cost == 0 || self.kdf_parallelism == 0 {
            return Err(config::ConfigError::Message(
                "kdf_time_cost and kdf_parallelism must be greater than 0".into(),
            ));
        }

        // Argon2 requires at least 8 KiB per lane
        if self.kdf_memory_kib < 8 * self.kdf_parallelism {
            return Err(config::ConfigError::Message(
                "kdf_memory_kib too small for kdf_parallelism".into(),
            ));
        }

        if self.kdf_time_cost < self.kdf_min_time_cost {
            return Err(config::ConfigError::Message(
                "kdf_time_cost must not be below kdf_min_time_cost".into(),
            ));
        }

        for seed in &self.credentials {
            if seed.identifier.is_empty() {
                return Err(config::ConfigError::Message(
                    "seeded credential has an empty identifier".into(),
                ));
            }
            if seed.secret_hash.is_some() == seed.secret.is_some() {
                return Err(config::ConfigError::Message(format!(
                    "credential '{}' must set exactly one of secret_hash or secret",
                    seed.identifier
                )));
            }
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get store timeout as Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Get session TTL as a chrono Duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs as i64)
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs)
    }
}

impl Default for ServerConfig {
    /// Development defaults; the Argon2 parameters are deliberately light so
    /// tests stay fast. Production values come from config.toml.
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            login_redirect: "/dashboard".to_string(),
            session_ttl_secs: 3600,
            sliding_expiry: true,
            session_sweep_interval_secs: 60,
            store_timeout_ms: 500,
            store_shards: 16,
            max_identifier_length: 254,
            max_secret_length: 512,
            kdf_memory_kib: 1024,
            kdf_time_cost: 1,
            kdf_parallelism: 1,
            kdf_min_time_cost: 1,
            credentials: Vec::new(),
        }
    }
}
