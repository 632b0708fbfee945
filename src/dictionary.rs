//! Word list used by lexical correction.
//!
//! Plain text, one word per line. Entries are trimmed and lowercased, blank
//! lines skipped, and duplicates dropped while keeping first-seen order.

use crate::error::{Result, SignshError};
use std::collections::HashSet;
use std::path::Path;

/// In-memory word list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Build a dictionary from arbitrary words, normalizing each entry.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .filter(|w| seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    /// Load a word list file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SignshError::DictionaryLoad {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_words(content.lines()))
    }

    /// Load a word list, degrading to an empty dictionary when the file is unusable.
    pub fn from_file_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(dict) => {
                log::info!("Loaded {} words from {}", dict.len(), path.display());
                dict
            }
            Err(e) => {
                log::warn!("{e}; word correction disabled");
                Self::default()
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_words_normalizes_entries() {
        let dict = Dictionary::from_words(["  Hello ", "WORLD", "", "hello", "sign"]);
        assert_eq!(dict.words(), ["hello", "world", "sign"]);
    }

    #[test]
    fn from_file_loads_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hello").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Thanks").unwrap();
        file.flush().unwrap();

        let dict = Dictionary::from_file(file.path()).unwrap();
        assert_eq!(dict.words(), ["hello", "thanks"]);
    }

    #[test]
    fn from_file_missing_is_error() {
        let result = Dictionary::from_file(Path::new("/nonexistent/wordlist.txt"));
        assert!(matches!(result, Err(SignshError::DictionaryLoad { .. })));
    }

    #[test]
    fn from_file_or_empty_degrades() {
        let dict = Dictionary::from_file_or_empty(Path::new("/nonexistent/wordlist.txt"));
        assert!(dict.is_empty());
    }
}
