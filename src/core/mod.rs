// core logic - reply selection and encrypted memory

mod ai;
mod cipher;
mod crisis;
mod emotion;
mod selector;
mod sentiment;
mod store;
mod templates;

pub use ai::{AiProvider, DEFAULT_MODEL, Gemini, Generate, PERSONA, PromptContext};
pub use cipher::{Cipher, KEY_LEN};
pub use crisis::{Crisis, SAFETY_MESSAGE};
pub use emotion::{Emotion, EmotionRules, keyword_emotion};
pub use selector::{Reply, ReplySource, ResponseSelector, SelectorConfig};
pub use sentiment::Sentiment;
pub use store::{ConversationStore, Exchange, StoreData, UserRecord};
pub use templates::{TemplatePick, Templates};
