// reply selection - crisis check, emotion, generated reply, canned fallback
// each stage short-circuits the ones after it

use serde::Serialize;

use super::ai::{AiProvider, PERSONA, PromptContext};
use super::crisis::{Crisis, SAFETY_MESSAGE};
use super::emotion::{Emotion, EmotionRules};
use super::store::Exchange;
use super::templates::{TemplatePick, Templates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Crisis,
    Generated,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub emotion: Emotion,
    pub is_crisis: bool,
    pub source: ReplySource,
}

#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub rules: EmotionRules,
    /// How many past exchanges the provider gets to see.
    pub history_window: usize,
    pub pick: TemplatePick,
    pub persona: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            rules: EmotionRules::default(),
            history_window: 8,
            pick: TemplatePick::Random,
            persona: PERSONA.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseSelector {
    config: SelectorConfig,
    templates: Templates,
}

impl ResponseSelector {
    pub fn new(config: SelectorConfig, templates: Templates) -> Self {
        Self { config, templates }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn classify(&self, text: &str) -> Emotion {
        self.config.rules.classify(text)
    }

    /// Picks the reply for `text`. Never fails: provider trouble ends up as a
    /// canned reply, and crisis language always gets the fixed safety message.
    pub async fn select(&self, text: &str, history: &[Exchange], provider: &AiProvider) -> Reply {
        let emotion = self.classify(text);

        let crisis = Crisis::check(text);
        if let Some(phrase) = crisis.phrase {
            tracing::warn!(phrase, "crisis language detected");
            return Reply {
                text: SAFETY_MESSAGE.to_string(),
                emotion,
                is_crisis: true,
                source: ReplySource::Crisis,
            };
        }

        if let Some(text) = self.generate(text, history, emotion, provider).await {
            return Reply {
                text,
                emotion,
                is_crisis: false,
                source: ReplySource::Generated,
            };
        }

        Reply {
            text: self.templates.pick(emotion, self.config.pick),
            emotion,
            is_crisis: false,
            source: ReplySource::Template,
        }
    }

    async fn generate(
        &self,
        text: &str,
        history: &[Exchange],
        emotion: Emotion,
        provider: &AiProvider,
    ) -> Option<String> {
        let AiProvider::Configured(generator) = provider else {
            return None;
        };

        let start = history.len().saturating_sub(self.config.history_window);
        let ctx = PromptContext {
            persona: &self.config.persona,
            emotion,
            history: &history[start..],
            message: text,
        };

        match generator.generate(&ctx).await {
            Ok(reply) if !reply.trim().is_empty() => Some(reply.trim().to_string()),
            Ok(_) => {
                tracing::warn!(provider = generator.name(), "provider returned empty text, using template");
                None
            }
            Err(e) => {
                tracing::warn!(provider = generator.name(), error = %e, "provider failed, using template");
                None
            }
        }
    }
}
