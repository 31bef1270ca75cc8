//! Keyword sets for the classification heuristics.
//!
//! The sets are data, not behavior: each carries its own match strategy,
//! so swapping substring containment for whole-word matching is a data
//! change, never a call-site change. Substring stays the default — the
//! historical matcher is intentionally loose and classification outcomes
//! depend on it.

use regex::Regex;

/// High-urgency subject/body keywords.
const HIGH_PRIORITY: [&str; 5] = [
    "urgente",
    "asap",
    "importante",
    "prioridad",
    "accion requerida",
];

/// Low-urgency subject/body keywords.
const LOW_PRIORITY: [&str; 3] = ["sin prisa", "cuando puedas", "baja prioridad"];

/// Keywords marking a message as carrying a pending action.
const PENDING_TASK: [&str; 9] = [
    "tarea",
    "pendiente",
    "por favor",
    "se requiere",
    "favor de",
    "accion",
    "acción",
    "follow up",
    "recordatorio",
];

/// How a [`KeywordSet`] matches against text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring containment. Matches inside larger words
    /// ("accion" hits "transaccion") — a known false-positive source.
    Substring,
    /// Case-insensitive whole-word matching.
    WordBoundary,
}

/// A keyword list plus the strategy used to match it.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    mode: MatchMode,
    boundary: Option<Regex>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        let boundary = match mode {
            MatchMode::Substring => None,
            MatchMode::WordBoundary => {
                let alternation = keywords
                    .iter()
                    .map(|k| regex::escape(k))
                    .collect::<Vec<_>>()
                    .join("|");
                Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap())
            }
        };
        Self {
            keywords,
            mode,
            boundary,
        }
    }

    /// The fixed high-priority set.
    pub fn high_priority() -> Self {
        Self::new(HIGH_PRIORITY, MatchMode::Substring)
    }

    /// The fixed low-priority set.
    pub fn low_priority() -> Self {
        Self::new(LOW_PRIORITY, MatchMode::Substring)
    }

    /// The fixed pending-task set.
    pub fn pending_task() -> Self {
        Self::new(PENDING_TASK, MatchMode::Substring)
    }

    /// True when any keyword matches `text` under this set's strategy.
    pub fn matches(&self, text: &str) -> bool {
        match self.mode {
            MatchMode::Substring => {
                let lower = text.to_lowercase();
                self.keywords.iter().any(|k| lower.contains(k.as_str()))
            }
            MatchMode::WordBoundary => self.boundary.as_ref().is_some_and(|re| re.is_match(text)),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matches_case_insensitively() {
        let set = KeywordSet::high_priority();
        assert!(set.matches("Esto es URGENTE, responder hoy"));
        assert!(set.matches("respuesta asap"));
        assert!(!set.matches("todo tranquilo por aquí"));
    }

    #[test]
    fn substring_matches_inside_larger_words() {
        let set = KeywordSet::pending_task();
        // Loose on purpose: "accion" inside "transaccion".
        assert!(set.matches("confirmamos la transaccion de ayer"));
    }

    #[test]
    fn substring_matches_accented_keyword() {
        let set = KeywordSet::pending_task();
        assert!(set.matches("Se necesita ACCIÓN inmediata"));
    }

    #[test]
    fn word_boundary_rejects_embedded_keyword() {
        let set = KeywordSet::new(["accion"], MatchMode::WordBoundary);
        assert!(!set.matches("confirmamos la transaccion de ayer"));
        assert!(set.matches("requiere accion del equipo"));
    }

    #[test]
    fn word_boundary_escapes_regex_metacharacters() {
        let set = KeywordSet::new(["c++ review"], MatchMode::WordBoundary);
        assert!(set.matches("pending c++ review today"));
    }

    #[test]
    fn low_priority_set_matches_phrases() {
        let set = KeywordSet::low_priority();
        assert!(set.matches("puedes verlo cuando puedas"));
        assert!(set.matches("es de baja prioridad"));
    }

    #[test]
    fn keywords_are_stored_lowercased() {
        let set = KeywordSet::new(["URGENTE"], MatchMode::Substring);
        assert_eq!(set.keywords(), ["urgente"]);
    }
}
