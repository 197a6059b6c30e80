use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::errors::WikiError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TEMPLATE_DIR: &str = "tmpl";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Defaults overridden by `WIKI_DATA_DIR`, `WIKI_TEMPLATE_DIR`,
    /// `WIKI_HOST` and `WIKI_PORT`
    pub fn from_env() -> Result<Self, WikiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WikiError> {
        let mut config = Self::new();
        if let Some(dir) = lookup("WIKI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("WIKI_TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("WIKI_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WIKI_PORT") {
            config.port = port
                .parse()
                .map_err(|_| WikiError::Config(format!("invalid WIKI_PORT '{}'", port)))?;
        }
        // Fail at startup rather than at bind time
        config.socket_addr()?;
        Ok(config)
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, WikiError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| WikiError::Config(format!("invalid WIKI_HOST '{}'", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.template_dir, PathBuf::from("tmpl"));
        assert_eq!(config.socket_addr().unwrap(), SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("WIKI_DATA_DIR", "/srv/pages"),
            ("WIKI_TEMPLATE_DIR", "/srv/tmpl"),
            ("WIKI_HOST", "127.0.0.1"),
            ("WIKI_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.template_dir, PathBuf::from("/srv/tmpl"));
        assert_eq!(config.socket_addr().unwrap(), SocketAddr::from(([127, 0, 0, 1], 9000)));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup(&[("WIKI_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, WikiError::Config(_)));
    }

    #[test]
    fn invalid_host_is_an_error() {
        let err = Config::from_lookup(lookup(&[("WIKI_HOST", "not an ip")])).unwrap_err();
        assert!(matches!(err, WikiError::Config(_)));
    }
}
