use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/sponge_config.json5");

/// Default sponge reach in blocks.
pub const DEFAULT_RADIUS: i32 = 3;
/// Default fall damage immunity after breaking a sponge, in milliseconds.
pub const DEFAULT_INVULNERABILITY_MILLIS: u64 = 100;

/// Errors raised while loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("config i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON5 for this config.
    #[error("config could not be parsed: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Tunables of the sponge rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpongeConfig {
    /// Reach of the sponge in blocks.
    pub radius: i32,
    /// Fall damage immunity window in milliseconds.
    pub invulnerability_millis: u64,
}

impl Default for SpongeConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            invulnerability_millis: DEFAULT_INVULNERABILITY_MILLIS,
        }
    }
}

impl SpongeConfig {
    /// Reads the config at `path`, or writes the bundled default there and
    /// returns the defaults if it does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::parse(&fs::read_to_string(path)?)?;
            log::debug!("Loaded config from {}", path.display());
            return Ok(config);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());

        Ok(Self::default())
    }

    /// Parses and validates a JSON5 config document.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: SpongeConfig = serde_json5::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.radius) {
            return Err(ConfigError::Invalid("radius must be in range 1..=16"));
        }
        if !(1..=10_000).contains(&self.invulnerability_millis) {
            return Err(ConfigError::Invalid(
                "invulnerability_millis must be in range 1..=10000",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_default_matches_defaults() {
        let config = SpongeConfig::parse(DEFAULT_CONFIG).expect("bundled config must parse");
        assert_eq!(config, SpongeConfig::default());
        assert_eq!(config.radius, 3);
        assert_eq!(config.invulnerability_millis, 100);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = SpongeConfig::parse("{ radius: 5 }").expect("partial config must parse");
        assert_eq!(config.radius, 5);
        assert_eq!(config.invulnerability_millis, 100);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            SpongeConfig::parse("{ radius: 0 }"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SpongeConfig::parse("{ invulnerability_millis: 0 }"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SpongeConfig::parse("{ radius: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config").join("sponge_config.json5");

        let created = SpongeConfig::load_or_create(&path).expect("create");
        assert_eq!(created, SpongeConfig::default());
        assert!(path.exists());

        fs::write(&path, "{ radius: 4, invulnerability_millis: 250 }").expect("write");
        let loaded = SpongeConfig::load_or_create(&path).expect("load");
        assert_eq!(loaded.radius, 4);
        assert_eq!(loaded.invulnerability_millis, 250);
    }
}
