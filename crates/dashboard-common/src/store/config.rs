use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{DashboardError, Result};

/// Default Redis port when the service port variable is unset.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Connection settings for the primary/replica Redis pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub primary_host: String,
    pub primary_port: u16,
    pub replica_host: String,
    pub replica_port: u16,
}

impl StoreConfig {
    /// Read the Kubernetes service variables of the Redis master and slave.
    ///
    /// Both hosts are required; there is no fallback backend.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let primary_host = non_empty_var("REDIS_MASTER_SERVICE_HOST");
        let replica_host = non_empty_var("REDIS_SLAVE_SERVICE_HOST");
        let (Some(primary_host), Some(replica_host)) = (primary_host, replica_host) else {
            return Err(DashboardError::Config(
                "no storage backend available".to_string(),
            ));
        };

        Ok(Self {
            primary_host,
            primary_port: port_var("REDIS_MASTER_SERVICE_PORT")?,
            replica_host,
            replica_port: port_var("REDIS_SLAVE_SERVICE_PORT")?,
        })
    }

    /// Single-node setup where reads and writes hit the same server
    pub fn single(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            primary_host: host.clone(),
            primary_port: port,
            replica_host: host,
            replica_port: port,
        }
    }

    pub fn primary_url(&self) -> String {
        format!("redis://{}:{}", self.primary_host, self.primary_port)
    }

    pub fn replica_url(&self) -> String {
        format!("redis://{}:{}", self.replica_host, self.replica_port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn port_var(name: &str) -> Result<u16> {
    match non_empty_var(name) {
        None => Ok(DEFAULT_REDIS_PORT),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DashboardError::Config(format!("{} is not a valid port: {}", name, raw))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "REDIS_MASTER_SERVICE_HOST",
        "REDIS_MASTER_SERVICE_PORT",
        "REDIS_SLAVE_SERVICE_HOST",
        "REDIS_SLAVE_SERVICE_PORT",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_master_and_slave() {
        clear_vars();
        env::set_var("REDIS_MASTER_SERVICE_HOST", "redis-master");
        env::set_var("REDIS_MASTER_SERVICE_PORT", "6380");
        env::set_var("REDIS_SLAVE_SERVICE_HOST", "redis-slave");

        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.primary_url(), "redis://redis-master:6380");
        assert_eq!(config.replica_url(), "redis://redis-slave:6379");
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_without_hosts_is_a_config_error() {
        clear_vars();
        env::set_var("REDIS_MASTER_SERVICE_HOST", "redis-master");

        let err = StoreConfig::from_env().unwrap_err();
        assert!(matches!(err, DashboardError::Config(ref msg) if msg == "no storage backend available"));
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        clear_vars();
        env::set_var("REDIS_MASTER_SERVICE_HOST", "redis-master");
        env::set_var("REDIS_SLAVE_SERVICE_HOST", "redis-slave");
        env::set_var("REDIS_SLAVE_SERVICE_PORT", "sixty");

        assert!(StoreConfig::from_env().is_err());
        clear_vars();
    }

    #[test]
    fn test_single_uses_one_server() {
        let config = StoreConfig::single("localhost", 6379);
        assert_eq!(config.primary_url(), config.replica_url());
    }
}
