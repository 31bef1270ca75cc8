//! Priority classification — explicit headers first, keyword scan second.

use mail_parser::Message;

use crate::pipeline::headers;
use crate::pipeline::keywords::KeywordSet;
use crate::pipeline::types::Priority;

/// Priority/importance headers; the first one present is the one consulted.
const PRIORITY_HEADERS: [&str; 3] = ["X-Priority", "Priority", "Importance"];

/// Header tokens that decide the classification outright.
const HIGH_HEADER_TOKENS: [&str; 3] = ["1", "high", "urgent"];
const LOW_HEADER_TOKENS: [&str; 2] = ["5", "low"];

pub struct PriorityClassifier {
    high_keywords: KeywordSet,
    low_keywords: KeywordSet,
}

impl PriorityClassifier {
    pub fn new() -> Self {
        Self {
            high_keywords: KeywordSet::high_priority(),
            low_keywords: KeywordSet::low_priority(),
        }
    }

    /// A decisive header short-circuits the keyword scan entirely; an
    /// indecisive (or absent) one falls through to the subject+body
    /// keywords, high set before low set, `Normal` otherwise.
    pub fn classify(&self, message: &Message, subject: &str, body: &str) -> Priority {
        if let Some(value) = PRIORITY_HEADERS
            .iter()
            .find_map(|name| headers::header_text(message, name))
            .filter(|v| !v.is_empty())
        {
            let value = value.to_lowercase();
            if HIGH_HEADER_TOKENS.iter().any(|t| value.contains(t)) {
                return Priority::High;
            }
            if LOW_HEADER_TOKENS.iter().any(|t| value.contains(t)) {
                return Priority::Low;
            }
        }

        let text = format!("{subject}\n{body}");
        if self.high_keywords.matches(&text) {
            return Priority::High;
        }
        if self.low_keywords.matches(&text) {
            return Priority::Low;
        }
        Priority::Normal
    }
}
