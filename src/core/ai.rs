// generative replies - the provider capability and the gemini client behind it

use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::emotion::Emotion;
use super::store::Exchange;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const PERSONA: &str = "You are 'Serena', a friendly, non-romantic, empathetic AI companion. \
Be warm, validating, and supportive. Keep responses concise (2-4 short paragraphs). \
Do not provide medical diagnoses. If the user expresses self-harm or suicide, respond with \
empathy and advise contacting local emergency services and trusted people.";

/// Everything a provider gets to see for one turn.
pub struct PromptContext<'a> {
    pub persona: &'a str,
    pub emotion: Emotion,
    /// Recent exchanges, oldest first. Already trimmed by the caller.
    pub history: &'a [Exchange],
    pub message: &'a str,
}

impl PromptContext<'_> {
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "{}\nDetected user emotion: {}\n\nConversation:\n",
            self.persona, self.emotion
        );

        for exchange in self.history {
            if !exchange.user_msg.is_empty() {
                prompt.push_str(&format!("User: {}\n", exchange.user_msg));
            }
            if !exchange.bot_msg.is_empty() {
                prompt.push_str(&format!("Assistant: {}\n", exchange.bot_msg));
            }
        }

        prompt.push_str(&format!("User: {}\nAssistant:", self.message));
        prompt
    }
}

/// Something that can turn a prompt into reply text.
#[async_trait]
pub trait Generate: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, ctx: &PromptContext<'_>) -> Result<String, Error>;
}

#[derive(Clone)]
pub enum AiProvider {
    Configured(Arc<dyn Generate>),
    Unconfigured,
}

impl AiProvider {
    pub fn configured(generator: impl Generate + 'static) -> Self {
        Self::Configured(Arc::new(generator))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Configured(g) => g.name(),
            Self::Unconfigured => "offline",
        }
    }
}

pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

// what we send to gemini
#[derive(Serialize)]
struct Request {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

// what gemini sends back
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl Gemini {
    pub fn new(api_key: Option<String>, model: &str, timeout: Duration) -> Result<Self, Error> {
        // explicit key wins, then the usual env var names
        let api_key = match api_key {
            Some(key) => key,
            None => std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .map_err(|_| Error::MissingApiKey)?,
        };

        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn complete(&self, prompt: String) -> Result<String, Error> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = Request {
            contents: vec![RequestContent {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "calling gemini");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("gemini returned {status}: {body}")));
        }

        let response: Response = response.json().await?;

        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::Provider(format!("prompt blocked: {reason}")));
        }

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Provider("gemini returned no text".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl Generate for Gemini {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, ctx: &PromptContext<'_>) -> Result<String, Error> {
        self.complete(ctx.render()).await
    }
}
