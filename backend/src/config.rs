//! Environment-driven settings for the server and its command-line clients.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::store::STORE_FILE_NAME;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

const PORT_ENV: &str = "PORT";
const DATA_DIR_ENV: &str = "DATA_DIR";
const PUBLIC_DIR_ENV: &str = "PUBLIC_DIR";
/// Base URL the admin and play clients talk to.
pub const SERVER_URL_ENV: &str = "CONNECTIONS_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Holds the store file; also served under `/data`.
    pub data_dir: PathBuf,
    /// Static client assets served for every other path.
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|err| {
                warn!(value = %raw, error = %err, "invalid PORT; using default");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            port,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            public_dir: get(PUBLIC_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

pub fn server_url() -> String {
    env::var(SERVER_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.store_path(), PathBuf::from("data").join("games.json"));
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/srv/puzzles"),
            ("PUBLIC_DIR", "/srv/www"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_path(), PathBuf::from("/srv/puzzles/games.json"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn bad_or_empty_port_falls_back() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).port,
            DEFAULT_PORT
        );
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("PORT", "")])).port,
            DEFAULT_PORT
        );
    }
}
