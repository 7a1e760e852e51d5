//! Studio configuration file support.
//!
//! Configuration precedence (later wins):
//! 1. Defaults
//! 2. Global config file (`~/.wecreate/config.toml`)
//! 3. Local config file (`./.wecreaterc`)
//! 4. Explicit config file, if one is given
//! 5. Environment variables (`WECREATE_API_URL`, `WECREATE_PROVIDER`)
//! 6. CLI arguments (applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use wecreate_abstraction::ModelProvider;
use wecreate_client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::workflow::{WorkflowSettings, MAX_IMAGE_EXCERPT_CHARS};

/// Environment variable overriding the service URL.
pub const ENV_API_URL: &str = "WECREATE_API_URL";

/// Environment variable overriding the model provider.
pub const ENV_PROVIDER: &str = "WECREATE_PROVIDER";

/// Studio configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Generation service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Writing preferences
    #[serde(default)]
    pub writing: WritingConfig,

    /// Polish and illustration preferences
    #[serde(default)]
    pub finishing: FinishingConfig,
}

/// Generation service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Model provider (gemini, openai)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Writing preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingConfig {
    /// Tone for section writing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Audience for outlines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,

    /// Ideation mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Polish and illustration preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishingConfig {
    /// Style for polish passes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish_style: Option<String>,

    /// Style for illustrations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_style: Option<String>,

    /// Leading characters of the draft sent for illustration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_excerpt_chars: Option<usize>,

    /// Minimum draft length for the automatic illustration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_min_chars: Option<usize>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    Read(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

fn merge_opt<T: Clone>(target: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        target.clone_from(other);
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Read(format!("Failed to create directory: {}", e)))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Read(format!("Failed to write file: {}", e)))
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".wecreate").join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".wecreaterc")
    }

    /// Discover and load configuration files, then apply the environment.
    ///
    /// Missing files are skipped; files that exist but fail to parse are errors.
    pub fn discover_and_load() -> ConfigResult<Self> {
        Self::load_with(None)
    }

    /// Like [`discover_and_load`](Self::discover_and_load), with an explicit
    /// file layered over the discovered ones. The explicit file must exist.
    pub fn load_with(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match Self::load_from_file(&path) {
                Ok(file_config) => config.merge(&file_config),
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        if let Some(path) = explicit {
            config.merge(&Self::load_from_file(path)?);
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        merge_opt(&mut self.service.base_url, &other.service.base_url);
        merge_opt(&mut self.service.timeout_secs, &other.service.timeout_secs);
        merge_opt(&mut self.service.provider, &other.service.provider);
        merge_opt(&mut self.writing.tone, &other.writing.tone);
        merge_opt(&mut self.writing.target_audience, &other.writing.target_audience);
        merge_opt(&mut self.writing.mode, &other.writing.mode);
        merge_opt(&mut self.finishing.polish_style, &other.finishing.polish_style);
        merge_opt(&mut self.finishing.image_style, &other.finishing.image_style);
        merge_opt(&mut self.finishing.image_excerpt_chars, &other.finishing.image_excerpt_chars);
        merge_opt(&mut self.finishing.image_min_chars, &other.finishing.image_min_chars);
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.service.base_url = Some(url);
        }
        if let Some(provider) = lookup(ENV_PROVIDER).filter(|v| !v.trim().is_empty()) {
            self.service.provider = Some(provider);
        }
    }

    /// Resolve the provider, validating its name.
    pub fn provider(&self) -> ConfigResult<ModelProvider> {
        self.service.provider.as_deref().map_or(Ok(ModelProvider::default()), |p| {
            p.parse::<ModelProvider>().map_err(ConfigError::InvalidValue)
        })
    }

    /// Build client options from this configuration.
    pub fn client_options(&self) -> ConfigResult<ClientOptions> {
        let defaults = ClientOptions::default();
        let timeout = match self.service.timeout_secs {
            Some(0) => return Err(ConfigError::InvalidValue("timeout_secs must be > 0".to_string())),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(ClientOptions {
            base_url: self.service.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            provider: self.provider()?,
            mode: self.writing.mode.clone().unwrap_or(defaults.mode),
            tone: self.writing.tone.clone().unwrap_or(defaults.tone),
            target_audience: self.writing.target_audience.clone().unwrap_or(defaults.target_audience),
        })
    }

    /// Returns a copy with every unset value filled with its default.
    pub fn resolved(&self) -> ConfigResult<Self> {
        let options = self.client_options()?;
        let settings = self.workflow_settings()?;

        Ok(Self {
            service: ServiceConfig {
                base_url: Some(options.base_url),
                timeout_secs: Some(options.timeout.as_secs()),
                provider: Some(options.provider.to_string()),
            },
            writing: WritingConfig {
                tone: Some(options.tone),
                target_audience: Some(options.target_audience),
                mode: Some(options.mode),
            },
            finishing: FinishingConfig {
                polish_style: Some(settings.polish_style),
                image_style: Some(settings.image_style),
                image_excerpt_chars: Some(settings.image_excerpt_chars),
                image_min_chars: Some(settings.image_min_chars),
            },
        })
    }

    /// Build workflow settings from this configuration.
    pub fn workflow_settings(&self) -> ConfigResult<WorkflowSettings> {
        let defaults = WorkflowSettings::default();
        let image_excerpt_chars = self.finishing.image_excerpt_chars.unwrap_or(defaults.image_excerpt_chars);
        if !(1..=MAX_IMAGE_EXCERPT_CHARS).contains(&image_excerpt_chars) {
            return Err(ConfigError::InvalidValue(format!(
                "image_excerpt_chars must be between 1 and {MAX_IMAGE_EXCERPT_CHARS}, got {image_excerpt_chars}"
            )));
        }

        Ok(WorkflowSettings {
            polish_style: self.finishing.polish_style.clone().unwrap_or(defaults.polish_style),
            image_style: self.finishing.image_style.clone().unwrap_or(defaults.image_style),
            image_excerpt_chars,
            image_min_chars: self.finishing.image_min_chars.unwrap_or(defaults.image_min_chars),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_resolve() {
        let config = StudioConfig::default();
        let options = config.client_options().unwrap();
        assert_eq!(options, ClientOptions::default());
        assert_eq!(config.workflow_settings().unwrap(), WorkflowSettings::default());
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = StudioConfig::default();
        config.service.base_url = Some("http://svc.test".to_string());
        config.finishing.image_excerpt_chars = Some(300);
        config.save_to_file(&path).unwrap();

        let loaded = StudioConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_sections() {
        let config: StudioConfig = toml::from_str(
            r#"
            [service]
            base_url = "http://10.0.0.2:8000"
            provider = "openai"
            timeout_secs = 30

            [writing]
            tone = "Playful"

            [finishing]
            polish_style = "Storyteller"
            "#,
        )
        .unwrap();

        let options = config.client_options().unwrap();
        assert_eq!(options.base_url, "http://10.0.0.2:8000");
        assert_eq!(options.provider, ModelProvider::OpenAI);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.tone, "Playful");
        assert_eq!(options.target_audience, "General");
        assert_eq!(config.workflow_settings().unwrap().polish_style, "Storyteller");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = StudioConfig::load_from_file(Path::new("/nonexistent/wecreate.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[service\nbase_url = ").unwrap();
        assert!(matches!(StudioConfig::load_from_file(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_merge_prefers_other_when_set() {
        let mut base = StudioConfig::default();
        base.service.base_url = Some("http://global".to_string());
        base.writing.tone = Some("Formal".to_string());

        let mut local = StudioConfig::default();
        local.service.base_url = Some("http://local".to_string());

        base.merge(&local);
        assert_eq!(base.service.base_url.as_deref(), Some("http://local"));
        assert_eq!(base.writing.tone.as_deref(), Some("Formal"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StudioConfig::default();
        config.service.base_url = Some("http://file".to_string());
        config.apply_env(|key| match key {
            ENV_API_URL => Some("http://env".to_string()),
            ENV_PROVIDER => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.service.base_url.as_deref(), Some("http://env"));
        assert_eq!(config.service.provider, None);
    }

    #[test]
    fn test_resolved_fills_defaults() {
        let mut config = StudioConfig::default();
        config.writing.tone = Some("Playful".to_string());

        let resolved = config.resolved().unwrap();
        assert_eq!(resolved.service.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(resolved.service.timeout_secs, Some(120));
        assert_eq!(resolved.service.provider.as_deref(), Some("gemini"));
        assert_eq!(resolved.writing.tone.as_deref(), Some("Playful"));
        assert_eq!(resolved.finishing.image_style.as_deref(), Some("Flat Vector"));
        assert_eq!(resolved.finishing.image_min_chars, Some(50));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let result = StudioConfig::load_with(Some(Path::new("/nonexistent/explicit.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = StudioConfig::default();
        config.service.provider = Some("claude".to_string());
        assert!(matches!(config.client_options(), Err(ConfigError::InvalidValue(_))));

        let mut config = StudioConfig::default();
        config.service.timeout_secs = Some(0);
        assert!(matches!(config.client_options(), Err(ConfigError::InvalidValue(_))));

        let mut config = StudioConfig::default();
        config.finishing.image_excerpt_chars = Some(0);
        assert!(matches!(config.workflow_settings(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_image_excerpt_upper_bound() {
        let config: StudioConfig = toml::from_str("[finishing]\nimage_excerpt_chars = 2000\n").unwrap();
        let err = config.workflow_settings().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
        assert!(err.to_string().contains("2000"));

        let config: StudioConfig = toml::from_str("[finishing]\nimage_excerpt_chars = 500\n").unwrap();
        assert_eq!(config.workflow_settings().unwrap().image_excerpt_chars, 500);
    }
}
