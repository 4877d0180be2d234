// emotion tagging - keyword sets first, sentiment score as the tiebreaker

use serde::{Deserialize, Serialize};
use std::fmt;

use super::sentiment::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Sad,
    Angry,
    Anxious,
    Positive,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Anxious,
        Emotion::Positive,
        Emotion::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Anxious => "anxious",
            Emotion::Positive => "positive",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// checked in this order, first hit wins
// plain substrings, so "saddest", "hurtful" and "crying" all count
const KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Sad,
        &[
            "sad", "cry", "cried", "hurt", "pain", "depressed", "down", "lonely", "hopeless",
        ],
    ),
    (
        Emotion::Angry,
        &[
            "angry",
            "mad",
            "upset",
            "pissed",
            "annoyed",
            "annoying",
            "furious",
            "irritated",
        ],
    ),
    (
        Emotion::Anxious,
        &[
            "anxious",
            "anxiety",
            "scared",
            "panic",
            "panicked",
            "panicking",
            "nervous",
            "worried",
        ],
    ),
];

// everyday words that contain a keyword without meaning it
const NOT_KEYWORDS: &[&str] = &[
    "made", "madam", "download", "downtown", "crystal", "spain", "painting", "painter",
];

/// Score thresholds used once no keyword matched.
#[derive(Debug, Clone, Copy)]
pub struct EmotionRules {
    pub positive_threshold: f64,
    /// Scores at or below this are tagged sad. `None` leaves them neutral.
    pub negative_threshold: Option<f64>,
}

impl Default for EmotionRules {
    fn default() -> Self {
        Self {
            positive_threshold: 0.4,
            negative_threshold: None,
        }
    }
}

impl EmotionRules {
    pub fn classify(&self, text: &str) -> Emotion {
        match keyword_emotion(text) {
            Some(emotion) => emotion,
            None => self.from_score(Sentiment::compound(text)),
        }
    }

    pub fn from_score(&self, compound: f64) -> Emotion {
        if compound >= self.positive_threshold {
            return Emotion::Positive;
        }
        match self.negative_threshold {
            Some(limit) if compound <= limit => Emotion::Sad,
            _ => Emotion::Neutral,
        }
    }
}

pub fn keyword_emotion(text: &str) -> Option<Emotion> {
    let mut lowered = text.to_lowercase();
    for word in NOT_KEYWORDS {
        if lowered.contains(word) {
            lowered = lowered.replace(word, " ");
        }
    }

    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(emotion, _)| *emotion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflected_keywords_match() {
        assert_eq!(keyword_emotion("I keep crying"), Some(Emotion::Sad));
        assert_eq!(keyword_emotion("the sadness won't lift"), Some(Emotion::Sad));
        assert_eq!(keyword_emotion("so WORRIED about tomorrow"), Some(Emotion::Anxious));
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        assert_eq!(keyword_emotion("this is the saddest day"), Some(Emotion::Sad));
        assert_eq!(keyword_emotion("feeling sadder than ever"), Some(Emotion::Sad));
        assert_eq!(keyword_emotion("that was so hurtful"), Some(Emotion::Sad));
        assert_eq!(keyword_emotion("the noise is maddening"), Some(Emotion::Angry));
    }

    #[test]
    fn listed_lookalikes_are_ignored() {
        // "made" is not "mad", "download" is not "down"
        assert_eq!(keyword_emotion("I made a download"), None);
        assert_eq!(keyword_emotion("painting in Spain"), None);
        // a real keyword next to a lookalike still counts
        assert_eq!(keyword_emotion("I made it but I'm still mad"), Some(Emotion::Angry));
    }

    #[test]
    fn score_thresholds() {
        let rules = EmotionRules::default();
        assert_eq!(rules.from_score(0.5), Emotion::Positive);
        assert_eq!(rules.from_score(0.4), Emotion::Positive);
        assert_eq!(rules.from_score(0.0), Emotion::Neutral);
        assert_eq!(rules.from_score(-0.9), Emotion::Neutral);

        let strict = EmotionRules {
            negative_threshold: Some(-0.3),
            ..EmotionRules::default()
        };
        assert_eq!(strict.from_score(-0.5), Emotion::Sad);
        assert_eq!(strict.from_score(-0.1), Emotion::Neutral);
    }
}
