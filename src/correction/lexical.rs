//! Dictionary-based nearest-word correction.
//!
//! Candidates are ranked by normalized Levenshtein similarity. Ties are
//! resolved by preferring the shorter word, then lexicographic order, so the
//! outcome never depends on word list order.

use crate::config::EngineConfig;
use crate::correction::corrector::Corrector;
use crate::defaults::WORD_SEPARATOR;
use crate::dictionary::Dictionary;
use std::cmp::Ordering;
use strsim::normalized_levenshtein;

/// A dictionary word close enough to replace a token.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub word: String,
    pub similarity: f64,
}

/// Corrector backed by an in-memory word list.
#[derive(Debug, Clone)]
pub struct DictionaryCorrector {
    dictionary: Dictionary,
    cutoff: f64,
    max_suggestions: usize,
}

impl DictionaryCorrector {
    pub fn new(dictionary: Dictionary, cutoff: f64, max_suggestions: usize) -> Self {
        Self {
            dictionary,
            cutoff,
            max_suggestions,
        }
    }

    /// Build with the cutoff and suggestion limit of an engine configuration.
    pub fn with_config(dictionary: Dictionary, config: &EngineConfig) -> Self {
        Self::new(dictionary, config.correction_cutoff, config.max_suggestions)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Up to `max_suggestions` words with similarity at or above the cutoff, best first.
    pub fn suggestions(&self, word: &str) -> Vec<Suggestion> {
        if word.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<Suggestion> = self
            .dictionary
            .words()
            .iter()
            .filter_map(|candidate| {
                let similarity = normalized_levenshtein(word, candidate);
                (similarity >= self.cutoff).then(|| Suggestion {
                    word: candidate.clone(),
                    similarity,
                })
            })
            .collect();

        matches.sort_by(rank);
        matches.truncate(self.max_suggestions);
        matches
    }
}

fn rank(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.word.chars().count().cmp(&b.word.chars().count()))
        .then_with(|| a.word.cmp(&b.word))
}

impl Corrector for DictionaryCorrector {
    fn correct_word(&self, word: &str) -> Option<String> {
        self.suggestions(word).into_iter().next().map(|s| s.word)
    }

    fn name(&self) -> &str {
        "dictionary"
    }

    fn is_active(&self) -> bool {
        !self.dictionary.is_empty()
    }
}

/// Replace the last word of `sentence` with its correction.
///
/// Trailing separators are preserved. Returns the rewritten sentence, or
/// `None` when the last token is empty or has no acceptable match.
pub fn correct_last_word(sentence: &str, corrector: &dyn Corrector) -> Option<String> {
    let body = sentence.trim_end_matches(WORD_SEPARATOR);
    let trailing = &sentence[body.len()..];

    let token = match body.rsplit_once(char::is_whitespace) {
        Some((_, token)) => token,
        None => body,
    };
    if token.is_empty() {
        return None;
    }

    let replacement = corrector.correct_word(&token.to_lowercase())?;
    let head = &body[..body.len() - token.len()];
    let corrected = format!("{head}{replacement}{trailing}");

    (corrected != sentence).then_some(corrected)
}
