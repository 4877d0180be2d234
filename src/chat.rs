// one chat turn - read history, pick a reply, remember the exchange

use crate::config::Config;
use crate::core::{AiProvider, ConversationStore, Exchange, Reply, ResponseSelector, Templates};
use crate::Error;

pub struct Companion {
    store: ConversationStore,
    selector: ResponseSelector,
    provider: AiProvider,
    user_id: String,
}

impl Companion {
    pub fn new(
        store: ConversationStore,
        selector: ResponseSelector,
        provider: AiProvider,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            selector,
            provider,
            user_id: user_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let store = ConversationStore::open(&config.data_file, &config.key_file)?;
        let selector = ResponseSelector::new(config.selector.clone(), Templates::default());

        Ok(Self::new(
            store,
            selector,
            config.ai.provider(),
            config.user_id.clone(),
        ))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn provider(&self) -> &AiProvider {
        &self.provider
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Answers `message` and appends the exchange to this user's history.
    ///
    /// Only an empty message is an error. A failed write is logged and the
    /// reply is still returned, so the user is never left without an answer.
    pub async fn turn(&self, message: &str) -> Result<Reply, Error> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let history = self.store.history(&self.user_id);
        let reply = self.selector.select(message, &history, &self.provider).await;

        let exchange = Exchange::new(message, &reply.text, Some(reply.emotion));
        if let Err(e) = self.store.add_message(&self.user_id, exchange) {
            tracing::error!(user = %self.user_id, error = %e, "could not save exchange");
        }

        Ok(reply)
    }

    pub fn history(&self) -> Vec<Exchange> {
        self.store.history(&self.user_id)
    }

    /// Forgets this user's history. False if there was nothing stored for them.
    pub fn forget(&self) -> Result<bool, Error> {
        self.store.clear_user(&self.user_id)
    }

    pub fn forget_everyone(&self) -> Result<(), Error> {
        self.store.clear_all()
    }
}
