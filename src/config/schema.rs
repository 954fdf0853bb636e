use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Model used when `review.model` and `MODEL_NAME` are both unset or blank.
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:1.5b";

/// Instruction passed to the generator as `--prompt=`.
pub const DEFAULT_PROMPT: &str = "Generate the code review for the file and tell the bugs. \
Don't write full code. Can give snippets. Dont do formatiing.";

/// Environment variable that selects the model identifier.
pub const MODEL_ENV: &str = "MODEL_NAME";
pub const BROKERS_ENV: &str = "BUNDLE_REVIEWER_BROKERS";
pub const TOPIC_ENV: &str = "BUNDLE_REVIEWER_TOPIC";
pub const GROUP_ID_ENV: &str = "BUNDLE_REVIEWER_GROUP_ID";
pub const GENERATOR_ENV: &str = "BUNDLE_REVIEWER_GENERATOR";
pub const CONFIG_PATH_ENV: &str = "BUNDLE_REVIEWER_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

// ── Root config ──────────────────────────────────────────────────

/// Process-wide configuration, resolved once at startup and passed by
/// reference to the feed listener and the review stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bus: BusConfig,
    pub review: ReviewConfig,
    pub generator: GeneratorConfig,
}

/// `[bus]`: Kafka consumer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// `bootstrap.servers`.
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    /// `auto.offset.reset` used when the group has no committed offset.
    pub auto_offset_reset: String,
    /// How long startup waits for broker metadata before giving up.
    pub connect_timeout_secs: u64,
    /// Extra librdkafka properties, applied after the fields above.
    pub properties: BTreeMap<String, String>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".into(),
            topic: "code-bundles".into(),
            group_id: "file-processor".into(),
            auto_offset_reset: "earliest".into(),
            connect_timeout_secs: 10,
            properties: BTreeMap::new(),
        }
    }
}

/// `[review]`: model selection and instruction text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Configured model identifier. Blank means "use `default_model`".
    pub model: Option<String>,
    pub default_model: String,
    pub prompt: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model: None,
            default_model: DEFAULT_MODEL.into(),
            prompt: DEFAULT_PROMPT.into(),
        }
    }
}

/// Model identifier after default substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    pub name: String,
    pub is_default: bool,
}

impl ReviewConfig {
    pub fn resolve_model(&self) -> ResolvedModel {
        match self.model.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => ResolvedModel {
                name: name.to_string(),
                is_default: false,
            },
            _ => ResolvedModel {
                name: self.default_model.clone(),
                is_default: true,
            },
        }
    }
}

/// `[generator]`: the external review executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub command: String,
    /// Arguments placed before `--model=` and `--prompt=`.
    pub args: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "./GO-Native-LLM".into(),
            args: Vec::new(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl Config {
    /// Load from `path` when it exists, fall back to defaults otherwise,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.finish()
    }

    /// Like [`Config::load`], but a missing file is an error.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(path)?.finish()
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.apply_env_overrides(|key| std::env::var(key).ok());
        self.validate()?;
        Ok(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from the environment. `lookup` is `std::env::var`
    /// in production and a map in tests.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // MODEL_NAME wins over the file even when blank: an explicitly
        // empty variable still means "use the default model".
        if let Some(model) = lookup(MODEL_ENV) {
            self.review.model = Some(model);
        }
        if let Some(brokers) = non_empty(BROKERS_ENV) {
            self.bus.brokers = brokers;
        }
        if let Some(topic) = non_empty(TOPIC_ENV) {
            self.bus.topic = topic;
        }
        if let Some(group_id) = non_empty(GROUP_ID_ENV) {
            self.bus.group_id = group_id;
        }
        if let Some(command) = non_empty(GENERATOR_ENV) {
            self.generator.command = command;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("bus.brokers", &self.bus.brokers),
            ("bus.topic", &self.bus.topic),
            ("bus.group_id", &self.bus.group_id),
            ("bus.auto_offset_reset", &self.bus.auto_offset_reset),
            ("review.default_model", &self.review.default_model),
            ("review.prompt", &self.review.prompt),
            ("generator.command", &self.generator.command),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        if self.bus.connect_timeout_secs == 0 {
            return Err(ConfigError::Zero("bus.connect_timeout_secs"));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
