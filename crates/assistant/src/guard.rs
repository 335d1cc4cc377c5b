//! Keyword guardrails on user questions and backend answers.

pub const REFUSAL_MESSAGE: &str = "I can only answer questions about this specific exoplanet analysis result. Please ask about the detection confidence, feature importance, or the transit method used.";

pub const MAX_RESPONSE_WORDS: usize = 150;

pub const DEFAULT_OFF_TOPIC_KEYWORDS: [&str; 12] = [
    "politics",
    "election",
    "president",
    "religion",
    "stock market",
    "bitcoin",
    "crypto",
    "recipe",
    "sports",
    "weather forecast",
    "homework",
    "write code",
];

pub const DEFAULT_BLOCKED_OUTPUT_KEYWORDS: [&str; 4] = [
    "system prompt",
    "api key",
    "ignore previous instructions",
    "as an ai language model",
];

#[derive(Debug, Clone)]
pub struct TopicGuard {
    off_topic: Vec<String>,
    blocked_output: Vec<String>,
    max_words: usize,
}

impl TopicGuard {
    pub fn new<S: AsRef<str>>(off_topic: &[S], blocked_output: &[S]) -> Self {
        Self {
            off_topic: off_topic.iter().map(|k| normalize(k.as_ref())).collect(),
            blocked_output: blocked_output.iter().map(|k| normalize(k.as_ref())).collect(),
            max_words: MAX_RESPONSE_WORDS,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words.max(1);
        self
    }

    /// Keyword whose whole-word occurrence marks `message` as off topic.
    pub fn off_topic_match(&self, message: &str) -> Option<&str> {
        first_match(&self.off_topic, message)
    }

    pub fn allows_input(&self, message: &str) -> bool {
        self.off_topic_match(message).is_none()
    }

    /// Replace a blocked answer with the refusal, otherwise cap its length.
    pub fn filter_output(&self, answer: &str) -> String {
        if first_match(&self.blocked_output, answer).is_some() {
            return REFUSAL_MESSAGE.to_string();
        }
        truncate_words(answer, self.max_words)
    }
}

impl Default for TopicGuard {
    fn default() -> Self {
        Self::new(&DEFAULT_OFF_TOPIC_KEYWORDS, &DEFAULT_BLOCKED_OUTPUT_KEYWORDS)
    }
}

fn first_match<'a>(keywords: &'a [String], text: &str) -> Option<&'a str> {
    let haystack = format!(" {} ", normalize(text));
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .find(|k| haystack.contains(&format!(" {k} ")))
        .map(String::as_str)
}

/// Lowercase words separated by single spaces; punctuation splits words.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.trim().to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}
