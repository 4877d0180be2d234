// tests for emotion classification

use serena::{Emotion, EmotionRules, Sentiment, keyword_emotion};

fn classify(text: &str) -> Emotion {
    EmotionRules::default().classify(text)
}

#[test]
fn test_keyword_categories() {
    assert_eq!(classify("I feel so lonely tonight"), Emotion::Sad);
    assert_eq!(classify("My boss is so annoying"), Emotion::Angry);
    assert_eq!(classify("I'm nervous about tomorrow"), Emotion::Anxious);
}

#[test]
fn test_keyword_beats_sentiment() {
    // "great" alone would score positive
    assert_eq!(classify("I'm sad but everything else is great"), Emotion::Sad);
}

#[test]
fn test_sad_checked_before_angry_and_anxious() {
    assert_eq!(classify("I'm sad and angry and worried"), Emotion::Sad);
    assert_eq!(classify("angry and scared"), Emotion::Angry);
}

#[test]
fn test_inflected_keywords() {
    assert_eq!(keyword_emotion("my back hurts"), Some(Emotion::Sad));
    assert_eq!(keyword_emotion("Everyone is so IRRITATED"), Some(Emotion::Angry));
}

#[test]
fn test_keyword_inside_longer_word() {
    assert_eq!(classify("this is the saddest day"), Emotion::Sad);
    assert_eq!(classify("feeling sadder than ever"), Emotion::Sad);
    assert_eq!(classify("that was so hurtful"), Emotion::Sad);
}

#[test]
fn test_lookalike_words_fall_through_to_sentiment() {
    assert_eq!(keyword_emotion("I made a download"), None);
    assert_eq!(classify("I made dinner"), Emotion::Neutral);
}

#[test]
fn test_keywords_ignore_punctuation() {
    assert_eq!(keyword_emotion("anxious... again?"), Some(Emotion::Anxious));
    assert_eq!(keyword_emotion("mad!"), Some(Emotion::Angry));
}

#[test]
fn test_positive_from_sentiment() {
    assert_eq!(classify("I feel great today!"), Emotion::Positive);
    assert_eq!(classify("I love this, thanks"), Emotion::Positive);
}

#[test]
fn test_everyday_positive_words() {
    assert_eq!(classify("What a gorgeous day"), Emotion::Positive);
    assert_eq!(classify("I feel fabulous"), Emotion::Positive);
    assert_eq!(classify("we celebrate tonight"), Emotion::Positive);
}

#[test]
fn test_negative_sentiment_is_neutral_by_default() {
    assert!(Sentiment::compound("what a terrible day") < 0.0);
    assert_eq!(classify("what a terrible day"), Emotion::Neutral);
}

#[test]
fn test_negative_threshold_when_enabled() {
    let rules = EmotionRules {
        negative_threshold: Some(-0.05),
        ..EmotionRules::default()
    };
    assert_eq!(rules.classify("what a terrible day"), Emotion::Sad);
}

#[test]
fn test_plain_text_is_neutral() {
    assert_eq!(classify("I went to the store"), Emotion::Neutral);
    assert_eq!(classify(""), Emotion::Neutral);
}

#[test]
fn test_score_thresholds() {
    let rules = EmotionRules::default();
    assert_eq!(rules.from_score(0.5), Emotion::Positive);
    assert_eq!(rules.from_score(0.4), Emotion::Positive);
    assert_eq!(rules.from_score(0.0), Emotion::Neutral);
    assert_eq!(rules.from_score(0.39), Emotion::Neutral);
    assert_eq!(rules.from_score(-0.9), Emotion::Neutral);
}

#[test]
fn test_compound_is_bounded() {
    let texts = [
        "GREAT GREAT GREAT amazing wonderful love!!!!",
        "terrible horrible awful hate hate hate",
        "",
    ];
    for text in texts {
        let score = Sentiment::compound(text);
        assert!((-1.0..=1.0).contains(&score), "{text}: {score}");
    }
}

#[test]
fn test_emotion_serializes_lowercase() {
    let json = serde_json::to_string(&Emotion::Anxious).unwrap();
    assert_eq!(json, "\"anxious\"");
}
