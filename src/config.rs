//! Runtime configuration
//!
//! Built once by the command line layer and handed to [`Companion`]
//! explicitly; nothing here is read from globals after startup.
//!
//! [`Companion`]: crate::Companion

use std::path::PathBuf;
use std::time::Duration;

use crate::core::{AiProvider, DEFAULT_MODEL, Gemini, SelectorConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Encrypted conversation file
    pub data_file: PathBuf,
    /// Raw key bytes, kept apart from the data file
    pub key_file: PathBuf,
    /// Whose history a turn reads and appends to
    pub user_id: String,
    /// Generated replies
    pub ai: AiConfig,
    /// Emotion thresholds, history window and template choice
    pub selector: SelectorConfig,
}

/// Settings for the hosted model
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Turn generated replies off entirely
    pub enabled: bool,
    /// Explicit key; falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY`
    pub api_key: Option<String>,
    pub model: String,
    /// Upper bound on one generate call
    pub timeout: Duration,
    /// Override for the API root, mostly for tests
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("chat_data.enc"),
            key_file: PathBuf::from("secret.key"),
            user_id: "default_user".to_string(),
            ai: AiConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
            base_url: None,
        }
    }
}

impl AiConfig {
    /// Builds the provider capability. A missing key or a client that can't
    /// be built leaves the companion offline rather than failing startup.
    pub fn provider(&self) -> AiProvider {
        if !self.enabled {
            return AiProvider::Unconfigured;
        }

        match Gemini::new(self.api_key.clone(), &self.model, self.timeout) {
            Ok(gemini) => {
                let gemini = match &self.base_url {
                    Some(url) => gemini.with_base_url(url),
                    None => gemini,
                };
                AiProvider::configured(gemini)
            }
            Err(e) => {
                tracing::info!(error = %e, "generated replies disabled");
                AiProvider::Unconfigured
            }
        }
    }
}
