//! Configuration types for Decoy.

mod listen;

use crate::expectation::Expectation;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use listen::{AdminConfig, ListenConfig};

/// Server configuration, usually read from a YAML file and then overridden
/// from the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub admin: AdminConfig,

    /// Host patterns allowed to use the mock; empty allows every host
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_whitelist: Vec<String>,

    /// Base URL of the log endpoint, shown in request traces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_url: Option<String>,

    /// Expectations registered at startup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expectations: Vec<Expectation>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.listen.port != 0 && self.listen.port == self.admin.port {
            anyhow::bail!(
                "Mock and admin listeners cannot share port {}",
                self.listen.port
            );
        }

        for pattern in &self.host_whitelist {
            if pattern.is_empty() {
                anyhow::bail!("Empty pattern in 'host_whitelist'");
            }
        }

        if let Some(url) = &self.logs_url {
            if url.is_empty() {
                anyhow::bail!("'logs_url' must not be empty when set");
            }
        }

        for (index, expectation) in self.expectations.iter().enumerate() {
            if let Some(forward) = &expectation.forward {
                if forward.scheme.is_empty() || forward.host.is_empty() {
                    anyhow::bail!(
                        "Expectation {} forwards without a scheme or host",
                        index
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
listen:
  host: 127.0.0.1
  port: 9000
admin:
  port: 9001
host_whitelist:
  - travix.com
logs_url: http://mock.example/logs
expectations:
  - request:
      path: pathv
    response:
      httpcode: 200
      body: Mock answer!
  - forward:
      scheme: https
      host: real_hostname.com
    priority: 5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, 9000);
        assert_eq!(config.listen.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.admin.port, 9001);
        assert_eq!(config.host_whitelist, vec!["travix.com".to_string()]);
        assert_eq!(config.logs_url.as_deref(), Some("http://mock.example/logs"));
        assert_eq!(config.expectations.len(), 2);
        assert_eq!(config.expectations[1].priority, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listen.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.admin.port, 2525);
        assert!(config.host_whitelist.is_empty());
        assert!(config.logs_url.is_none());
        assert!(config.expectations.is_empty());
    }

    #[test]
    fn test_validate_rejects_shared_port() {
        let mut config = Config::default();
        config.admin.port = config.listen.port;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_whitelist_pattern() {
        let config = Config {
            host_whitelist: vec![String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_forward_without_host() {
        let yaml = r#"
expectations:
  - forward:
      scheme: https
      host: ""
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen:\n  port: 18080\nadmin:\n  port: 12525").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.listen.port, 18080);
        assert_eq!(config.admin.port, 12525);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(Config::from_file("/nonexistent/decoy.yaml").is_err());
    }
}
