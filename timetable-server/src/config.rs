//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 10000;

/// Default directory scanned for timetable sources.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default path of the persisted index.
pub const DEFAULT_CACHE_PATH: &str = "timetable_cache.json";

/// Error returned for unusable environment values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a valid port")]
    InvalidPort { var: &'static str, value: String },

    #[error("invalid {var}: {value:?} is not an IP address")]
    InvalidHost { var: &'static str, value: String },
}

/// Configuration for the timetable server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`HOST`).
    pub host: IpAddr,

    /// Port to bind (`PORT`).
    pub port: u16,

    /// Directory holding the source spreadsheets (`TIMETABLE_DATA_DIR`).
    pub data_dir: PathBuf,

    /// Where the built index is persisted (`TIMETABLE_CACHE`).
    /// `None` disables persistence.
    pub cache_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("HOST") {
            config.host = value.trim().parse().map_err(|_| ConfigError::InvalidHost {
                var: "HOST",
                value,
            })?;
        }

        if let Some(value) = lookup("PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "PORT",
                value,
            })?;
        }

        if let Some(value) = lookup("TIMETABLE_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("TIMETABLE_CACHE") {
            // Empty disables persistence
            config.cache_path = (!value.trim().is_empty()).then(|| PathBuf::from(value));
        }

        Ok(config)
    }

    /// The socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_path: Some(PathBuf::from(DEFAULT_CACHE_PATH)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 10000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.cache_path,
            Some(PathBuf::from("timetable_cache.json"))
        );
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:10000");
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn custom_config() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", " 8080 "),
            ("TIMETABLE_DATA_DIR", "/srv/horarios"),
            ("TIMETABLE_CACHE", "/var/cache/horarios.json"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("/srv/horarios"));
        assert_eq!(
            config.cache_path,
            Some(PathBuf::from("/var/cache/horarios.json"))
        );
    }

    #[test]
    fn empty_cache_disables_persistence() {
        let config = ServerConfig::from_lookup(lookup(&[("TIMETABLE_CACHE", "")])).unwrap();
        assert_eq!(config.cache_path, None);
    }

    #[test]
    fn invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid PORT: \"http\" is not a valid port");

        let err = ServerConfig::from_lookup(lookup(&[("HOST", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }
}
