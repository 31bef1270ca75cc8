//! Pending-task detection.

use crate::pipeline::keywords::KeywordSet;

/// Flags messages that ask for something: a task keyword in either the
/// subject or the body. Pure substring containment, no word boundaries.
pub struct TaskDetector {
    keywords: KeywordSet,
}

impl TaskDetector {
    pub fn new() -> Self {
        Self {
            keywords: KeywordSet::pending_task(),
        }
    }

    pub fn detect(&self, subject: &str, body: &str) -> bool {
        self.keywords.matches(subject) || self.keywords.matches(body)
    }
}
