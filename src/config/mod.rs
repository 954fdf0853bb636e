pub mod schema;

use std::ffi::OsString;
use std::path::PathBuf;

pub use schema::{
    BusConfig, Config, ConfigError, GeneratorConfig, ResolvedModel, ReviewConfig, DEFAULT_MODEL,
    DEFAULT_PROMPT,
};

/// Where `config.toml` comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by `--config` or `$BUNDLE_REVIEWER_CONFIG`; must exist.
    Explicit(PathBuf),
    /// The platform config directory; defaults apply when it is absent.
    Platform(PathBuf),
    /// No config directory on this platform.
    None,
}

impl ConfigLocation {
    /// `--config` first, then `$BUNDLE_REVIEWER_CONFIG`, then the platform
    /// config directory.
    pub fn resolve(cli: Option<PathBuf>) -> Self {
        Self::resolve_with(cli, std::env::var_os(schema::CONFIG_PATH_ENV), platform_config_path())
    }

    fn resolve_with(cli: Option<PathBuf>, env: Option<OsString>, platform: Option<PathBuf>) -> Self {
        if let Some(path) = cli.or_else(|| env.map(PathBuf::from)) {
            return Self::Explicit(path);
        }
        platform.map_or(Self::None, Self::Platform)
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        match self {
            Self::Explicit(path) => Config::load_required(path),
            Self::Platform(path) => Config::load(Some(path)),
            Self::None => Config::load(None),
        }
    }
}

fn platform_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "bundle-reviewer")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_wins_over_env() {
        let location = ConfigLocation::resolve_with(
            Some("/etc/cli.toml".into()),
            Some("/etc/env.toml".into()),
            Some("/home/me/.config/config.toml".into()),
        );
        assert_eq!(location, ConfigLocation::Explicit("/etc/cli.toml".into()));
    }

    #[test]
    fn env_path_is_explicit() {
        let location = ConfigLocation::resolve_with(
            None,
            Some("/etc/env.toml".into()),
            Some("/home/me/.config/config.toml".into()),
        );
        assert_eq!(location, ConfigLocation::Explicit("/etc/env.toml".into()));
    }

    #[test]
    fn platform_path_is_the_fallback() {
        let location =
            ConfigLocation::resolve_with(None, None, Some("/home/me/.config/config.toml".into()));
        assert_eq!(
            location,
            ConfigLocation::Platform("/home/me/.config/config.toml".into())
        );
        assert_eq!(ConfigLocation::resolve_with(None, None, None), ConfigLocation::None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let location = ConfigLocation::Explicit(tmp.path().join("typo.toml"));
        assert!(matches!(location.load(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn missing_platform_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let location = ConfigLocation::Platform(tmp.path().join("config.toml"));
        let config = location.load().unwrap();
        assert_eq!(config.generator, GeneratorConfig::default());
    }
}
