// crisis language detection
// plain substring matching, so "hopelessly" trips "hopeless" too

/// Shown instead of anything generated whenever crisis language is found.
pub const SAFETY_MESSAGE: &str = "I'm really sorry you're in so much pain. You deserve immediate support and safety. \
Please consider contacting your local emergency services or a suicide prevention hotline, \
or reach out to someone close to you right now. You are not alone.";

const PHRASES: &[&str] = &[
    "kill myself",
    "killing myself",
    "suicide",
    "end my life",
    "want to die",
    "cant live",
    "can't live",
    "no reason to live",
    "hurt myself",
    "i'll end it",
    "i will end it",
    "can't go on",
    "cant go on",
    "give up",
    "hopeless",
    "worthless",
];

pub struct Crisis {
    pub detected: bool,
    pub phrase: Option<&'static str>,
}

impl Crisis {
    pub fn check(text: &str) -> Self {
        let lowered = normalize(text);

        for phrase in PHRASES {
            if lowered.contains(phrase) {
                return Self {
                    detected: true,
                    phrase: Some(phrase),
                };
            }
        }

        Self {
            detected: false,
            phrase: None,
        }
    }

    pub fn phrases() -> &'static [&'static str] {
        PHRASES
    }
}

// lowercase and fold typographic apostrophes so "can’t" matches "can't"
fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}
