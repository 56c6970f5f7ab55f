//! Tunables for path buffers and checksum scans.

use crate::checksum::DEFAULT_CHUNK_SIZE;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Default path capacity in bytes, terminator included.
pub const DEFAULT_MAX_PATH: usize = 1024;

/// Largest accepted [`Config::chunk_size`].
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Environment variable overriding [`Config::max_path`].
pub const ENV_MAX_PATH: &str = "ARCPATH_MAX_PATH";

/// Environment variable overriding [`Config::chunk_size`].
pub const ENV_CHUNK_SIZE: &str = "ARCPATH_CHUNK_SIZE";

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Capacity of path buffers, terminator included.
    pub max_path: usize,
    /// Bytes pulled per read while checksumming.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_path: DEFAULT_MAX_PATH,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Parse a `key=value` config file on top of the defaults.
    ///
    /// Blank lines and lines starting with `#` are skipped, unknown keys are
    /// ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::invalid_config(format!("Expected key=value, got {:?}", line)));
            };

            config.set(key.trim(), value.trim())?;
        }

        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Apply `ARCPATH_*` overrides from the environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup(ENV_MAX_PATH) {
            self.set("max_path", &value)?;
        }
        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            self.set("chunk_size", &value)?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max_path" => self.max_path = parse_size(key, value)?,
            "chunk_size" => self.chunk_size = check_chunk_size(parse_size(key, value)?)?,
            _ => {}
        }
        Ok(())
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(Error::invalid_config(format!("{} must be non-zero", key))),
        Ok(n) => Ok(n),
        Err(_) => Err(Error::invalid_config(format!(
            "Invalid value for {}: {:?}",
            key, value
        ))),
    }
}

/// Reject chunk sizes above [`MAX_CHUNK_SIZE`].
pub fn check_chunk_size(chunk_size: usize) -> Result<usize> {
    if chunk_size > MAX_CHUNK_SIZE {
        return Err(Error::invalid_config(format!(
            "chunk_size must be at most {}, got {}",
            MAX_CHUNK_SIZE, chunk_size
        )));
    }
    Ok(chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_path, 1024);
        assert_eq!(config.chunk_size, 32 * 1024);
    }

    #[test]
    fn test_parse_config() {
        let config = Config::parse("max_path=260\nchunk_size = 4096\n").unwrap();
        assert_eq!(config.max_path, 260);
        assert_eq!(config.chunk_size, 4096);
    }

    #[test]
    fn test_parse_config_with_comments() {
        let content = "# limits\n\nmax_path=512\n# chunk_size=1\ncolor=always\n";
        let config = Config::parse(content).unwrap();
        assert_eq!(config.max_path, 512);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(Config::parse("max_path=0").is_err());
        assert!(Config::parse("max_path=lots").is_err());
        assert!(Config::parse("chunk_size").is_err());
    }

    #[test]
    fn test_parse_config_chunk_size_limit() {
        let config = Config::parse(&format!("chunk_size={}", MAX_CHUNK_SIZE)).unwrap();
        assert_eq!(config.chunk_size, MAX_CHUNK_SIZE);

        let result = Config::parse(&format!("chunk_size={}", MAX_CHUNK_SIZE + 1));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));

        let result = Config::parse("chunk_size=18446744073709551615");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arcpath.conf");
        std::fs::write(&path, "chunk_size=65536\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chunk_size, 65536);

        assert!(Config::load(&temp_dir.path().join("missing.conf")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_MAX_PATH, "128")].into_iter().collect();
        let mut config = Config::parse("max_path=512\nchunk_size=100").unwrap();
        config
            .apply_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.max_path, 128);
        assert_eq!(config.chunk_size, 100);
    }

    #[test]
    fn test_env_override_invalid() {
        let mut config = Config::default();
        let result = config.apply_vars(|name| (name == ENV_CHUNK_SIZE).then(|| "0".to_string()));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
