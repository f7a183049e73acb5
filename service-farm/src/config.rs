// =====================================================================================
// File: service-farm/src/config.rs
// Description: Service configuration, loaded from environment with validation
// =====================================================================================

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid SERVER_PORT")]
    InvalidPort,
    #[error("invalid NETWORK value: {0} (expected mainnet or testnet)")]
    InvalidNetwork(String),
    #[error("invalid MAX_BATCH_ACTIONS")]
    InvalidBatchSize,
}

/// Which chain environment this deployment talks to. Gates the whitelist
/// check on sync-like operations (spec section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl std::str::FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub network: Network,
    pub log_level: String,
    /// Defence-in-depth cap on actions per batch, independent of the
    /// temporal gate's timing constraints.
    pub max_batch_actions: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            network: Network::Testnet,
            log_level: "info".to_string(),
            max_batch_actions: 200,
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidPort)?;
        }
        if let Ok(workers) = env::var("SERVER_WORKERS") {
            self.server.workers = Some(workers.parse().map_err(|_| ConfigError::InvalidPort)?);
        }
        if let Ok(network) = env::var("NETWORK") {
            self.network = network.parse()?;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(max_batch) = env::var("MAX_BATCH_ACTIONS") {
            self.max_batch_actions = max_batch.parse().map_err(|_| ConfigError::InvalidBatchSize)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.max_batch_actions == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = ServiceConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn network_parses_case_insensitively() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("sidechain".parse::<Network>().is_err());
    }
}
