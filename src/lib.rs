// serena library - a companion with encrypted memory

mod chat;
pub mod cli;
pub mod config;
mod core;
mod error;
mod output;
pub mod tui;

pub use chat::Companion;
pub use core::{
    AiProvider, Cipher, ConversationStore, Crisis, DEFAULT_MODEL, Emotion, EmotionRules, Exchange, KEY_LEN,
    Gemini, Generate, PERSONA, PromptContext, Reply, ReplySource, ResponseSelector, SAFETY_MESSAGE,
    SelectorConfig, Sentiment, StoreData, TemplatePick, Templates, UserRecord, keyword_emotion,
};
pub use error::Error;
pub use output::Output;
