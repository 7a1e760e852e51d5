//! Client options shared by every request.

use std::time::Duration;
use wecreate_abstraction::ModelProvider;

/// Default address of a locally running generation service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout. Section writing and polishing are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Options that the client attaches to requests on behalf of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the generation service, without a trailing `/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Model provider sent with ideation, outline, section and polish requests.
    pub provider: ModelProvider,
    /// Ideation mode ("creative" or "imitation").
    pub mode: String,
    /// Tone requested for section writing.
    pub tone: String,
    /// Audience the outline is planned for.
    pub target_audience: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            provider: ModelProvider::default(),
            mode: "creative".to_string(),
            tone: "Professional yet Engaging".to_string(),
            target_audience: "General".to_string(),
        }
    }
}

impl ClientOptions {
    /// Creates options pointing at the given service.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the model provider.
    #[must_use]
    pub fn with_provider(mut self, provider: ModelProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the writing tone.
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    /// Sets the outline target audience.
    #[must_use]
    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    /// Sets the ideation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }
}
