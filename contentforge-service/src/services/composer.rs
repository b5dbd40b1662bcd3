//! Heuristic content composer.
//!
//! Deterministic template assembly keyed on tone, sentiment and length. No
//! model is involved; every variant of a request renders the same text.

use crate::models::GenerationRequest;

const PRODUCT_NAME: &str = "ContentForge";
const PLACEHOLDER_BASE: &str = "Your product or idea";
const URGENT: &str = "Urgent";
const CALL_TO_ACTION: &str = " Take the next step today";
const EXCLAIM_CREATIVITY_THRESHOLD: f64 = 0.6;
const FILLERS: [&str; 5] = [
    "Learn more.",
    "Discover why.",
    "Built for teams.",
    "Effortless.",
    "Reliable.",
];

/// Target word-count band for a length preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthTarget {
    pub min_words: usize,
    pub max_words: usize,
}

impl LengthTarget {
    const SHORT: Self = Self::new(18, 26);
    const MEDIUM: Self = Self::new(40, 60);
    const LONG: Self = Self::new(80, 120);

    const fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words,
        }
    }

    /// Character budget of the final text.
    pub fn max_chars(&self) -> usize {
        self.max_words * 2
    }
}

pub fn tone_voice(tone: &str) -> &'static str {
    match tone {
        "Professional" => "Polished and concise.",
        "Playful" => "Light and witty.",
        "Formal" => "Respectful and structured.",
        "Casual" => "Friendly and direct.",
        _ => "Confident and clear.",
    }
}

pub fn sentiment_hint(sentiment: &str) -> &'static str {
    match sentiment {
        "Positive" => "Emphasize benefits and momentum.",
        "Neutral" => "Stay informative and balanced.",
        "Urgent" => "Use action-forward phrasing.",
        _ => "Stay helpful.",
    }
}

pub fn length_target(length: &str) -> LengthTarget {
    match length {
        "Short" => LengthTarget::SHORT,
        "Long" => LengthTarget::LONG,
        _ => LengthTarget::MEDIUM,
    }
}

/// Render `request.variants` outputs.
pub fn compose(request: &GenerationRequest) -> Vec<String> {
    let target = length_target(&request.length);
    let variants = usize::try_from(request.variants).unwrap_or(0);

    (0..variants)
        .map(|_| truncate_chars(&assemble(request), target.max_chars()))
        .collect()
}

/// One variant before the character budget is applied.
pub fn assemble(request: &GenerationRequest) -> String {
    let target = length_target(&request.length);

    let trimmed = request.prompt.trim();
    let base = if trimmed.is_empty() {
        PLACEHOLDER_BASE
    } else {
        trimmed
    };

    let guide = format!(
        "{} • {} • {}. {} {}",
        request.tone,
        request.sentiment,
        request.length,
        tone_voice(&request.tone),
        sentiment_hint(&request.sentiment)
    );
    let core = format!("{base} — crafted with {PRODUCT_NAME} to help you move faster.");

    let urgent = request.sentiment == URGENT;
    let punctuation = if urgent || request.creativity > EXCLAIM_CREATIVITY_THRESHOLD {
        "!"
    } else {
        "."
    };
    let suffix = if urgent { CALL_TO_ACTION } else { "" };

    let text = format!("{core} {guide}{punctuation}{suffix}");
    pad_to_min_words(text, target.min_words)
}

/// Append filler phrases while short of `min_words`, at most one pass over
/// the filler list.
fn pad_to_min_words(text: String, min_words: usize) -> String {
    let words = text.split_whitespace().count();
    if words >= min_words {
        return text;
    }

    let take = (min_words - words).min(FILLERS.len());
    format!("{} {}", text, FILLERS[..take].join(" "))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
