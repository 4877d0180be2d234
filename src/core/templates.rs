// canned replies used whenever nothing was generated

use rand::seq::SliceRandom;
use std::collections::HashMap;

use super::emotion::Emotion;

const LAST_RESORT: &str = "I'm here and listening.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplatePick {
    /// Uniformly random from the list.
    #[default]
    Random,
    /// Always the first entry, for reproducible output.
    First,
}

#[derive(Debug, Clone)]
pub struct Templates {
    neutral: Vec<String>,
    by_emotion: HashMap<Emotion, Vec<String>>,
}

impl Templates {
    /// `neutral` doubles as the list for any emotion without its own.
    pub fn new(neutral: Vec<String>) -> Self {
        Self {
            neutral,
            by_emotion: HashMap::new(),
        }
    }

    pub fn with(mut self, emotion: Emotion, replies: Vec<String>) -> Self {
        if emotion == Emotion::Neutral {
            self.neutral = replies;
        } else {
            self.by_emotion.insert(emotion, replies);
        }
        self
    }

    pub fn for_emotion(&self, emotion: Emotion) -> &[String] {
        match self.by_emotion.get(&emotion) {
            Some(list) if !list.is_empty() => list,
            _ => &self.neutral,
        }
    }

    pub fn pick(&self, emotion: Emotion, how: TemplatePick) -> String {
        let list = self.for_emotion(emotion);
        let chosen = match how {
            TemplatePick::Random => list.choose(&mut rand::thread_rng()),
            TemplatePick::First => list.first(),
        };
        chosen.map_or_else(|| LAST_RESORT.to_string(), Clone::clone)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new(owned(&[
            "I'm here and listening. What would you like to talk about?",
            "I'm right here. Tell me what's on your mind.",
        ]))
        .with(
            Emotion::Sad,
            owned(&[
                "I'm really sorry you're feeling down. I'm here with you. Tell me more when you're ready.",
                "That sounds heavy. Thank you for sharing it with me. I'm here to listen.",
            ]),
        )
        .with(
            Emotion::Anxious,
            owned(&[
                "Take a slow breath with me. You're safe right now. What's on your mind?",
                "Anxiety is so tough, and you're not alone in it. Tell me what's worrying you if you can.",
            ]),
        )
        .with(
            Emotion::Angry,
            owned(&[
                "It makes sense to feel upset. You're allowed to feel what you feel.",
                "I'm listening. If you want, tell me why this is making you angry.",
            ]),
        )
        .with(
            Emotion::Positive,
            owned(&[
                "That's wonderful news. I'm so happy for you!",
                "That sounds great! Tell me more.",
            ]),
        )
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
