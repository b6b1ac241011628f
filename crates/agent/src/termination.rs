//! Termination detection — decides whether a model response is final.
//!
//! The default [`KeywordDetector`] looks for "final answer" or "conclusion"
//! anywhere in the text. Any `Fn(&str) -> bool` closure is also a detector,
//! so callers can swap in their own predicate.

/// A predicate over one assistant response.
pub trait TerminationDetector: Send + Sync {
    /// Whether `text` signals that the model is done.
    fn is_terminal(&self, text: &str) -> bool;
}

impl<F> TerminationDetector for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_terminal(&self, text: &str) -> bool {
        self(text)
    }
}

/// Case-insensitive substring match against a fixed keyword list.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    keywords: Vec<String>,
}

impl KeywordDetector {
    /// Blank keywords are dropped; the rest are matched case-insensitively.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordDetector {
    fn default() -> Self {
        Self::new(["final answer", "conclusion"])
    }
}

impl TerminationDetector for KeywordDetector {
    fn is_terminal(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
