//! HTTP listener settings
//!
//! Read from an optional `shelf.toml` next to the working directory, then
//! overridden by `SHELF_`-prefixed environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .add_source(File::with_name("shelf").required(false))
            .add_source(Environment::with_prefix("SHELF"))
            .build()?
            .try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("Invalid listen address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        unsafe {
            std::env::remove_var("SHELF_HOST");
            std::env::remove_var("SHELF_PORT");
        }

        let settings = ServerSettings::new().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.socket_addr().unwrap().port(), 5000);
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("SHELF_HOST", "127.0.0.1");
            std::env::set_var("SHELF_PORT", "8080");
        }

        let settings = ServerSettings::new().unwrap();
        assert_eq!(settings.socket_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());

        unsafe {
            std::env::remove_var("SHELF_HOST");
            std::env::remove_var("SHELF_PORT");
        }
    }

    #[test]
    fn test_invalid_host() {
        let settings = ServerSettings {
            host: "not a host".to_string(),
            port: 80,
        };
        assert!(settings.socket_addr().is_err());
    }
}
