//! Due-date inference — explicit header hints first, then a prioritized
//! cascade of body-text patterns. First valid date wins outright.

use mail_parser::Message;
use regex::Regex;
use tracing::debug;

use crate::pipeline::dates::DateNormalizer;
use crate::pipeline::headers;
use crate::pipeline::types::PointInTime;

/// Headers that explicitly request a response date, tried in order.
const DUE_HEADERS: [&str; 2] = ["Reply-By", "X-Response-Due"];

/// Due-date cue words, kept as data so the pattern set is auditable in one
/// place. Joined into the keyworded patterns below.
const DUE_KEYWORDS: [&str; 6] = [
    "vencimiento",
    "vence",
    "antes del",
    "deadline",
    r"due(?:\s+date)?",
    r"fecha\s+límite",
];

/// Scans a message for its response deadline.
pub struct DueDateScanner {
    patterns: Vec<Regex>,
    dates: DateNormalizer,
}

impl DueDateScanner {
    pub fn new() -> Self {
        let cues = DUE_KEYWORDS.join("|");
        // Fixed priority: keyworded ISO date, keyworded d/m/y date, bare
        // ISO date, bare d/m/y date.
        let patterns = vec![
            Regex::new(&format!(r"(?i)(?:{cues})[:\s-]+(\d{{4}}-\d{{2}}-\d{{2}})")).unwrap(),
            Regex::new(&format!(
                r"(?i)(?:{cues})[:\s-]+(\d{{1,2}}/\d{{1,2}}/\d{{2,4}})"
            ))
            .unwrap(),
            Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap(),
            Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{2,4})\b").unwrap(),
        ];
        Self {
            patterns,
            dates: DateNormalizer::day_first(),
        }
    }

    /// Header hints, then body patterns in priority order. A pattern that
    /// matches text the normalizer rejects counts as no match and the next
    /// pattern gets its turn.
    pub fn infer(&self, message: &Message, body: &str) -> Option<PointInTime> {
        for name in DUE_HEADERS {
            if let Some(value) = headers::header_text(message, name) {
                if let Some(due) = self.dates.normalize(&value) {
                    return Some(due);
                }
                debug!(header = name, value = %value, "due header present but unparseable");
            }
        }
        for pattern in &self.patterns {
            if let Some(capture) = pattern.captures(body).and_then(|c| c.get(1)) {
                if let Some(due) = self.dates.normalize(capture.as_str()) {
                    return Some(due);
                }
            }
        }
        None
    }
}
