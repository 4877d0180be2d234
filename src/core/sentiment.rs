// sentiment scoring via the vader lexicon and rules
// compound score is in [-1, 1], 0.0 when nothing in the text carries valence

use vader_sentiment::SentimentIntensityAnalyzer;

pub struct Sentiment;

impl Sentiment {
    /// VADER compound score for `text`.
    pub fn compound(text: &str) -> f64 {
        // the analyzer only borrows the crate's static lexicons, so this is cheap
        let analyzer = SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}
