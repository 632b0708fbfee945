//! Label table mapping classifier output indices to symbols.
//!
//! The classifier only reports an index. The table file is JSON in one of
//! three shapes: a plain list (`["A", "B", ...]`), an object carrying a
//! `classes` list, or an index map (`{"0": "A", "1": "B", ...}`) ordered by
//! its integer keys. Without a table every index is rendered as its decimal
//! value.

use crate::error::{Result, SignshError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Index reported by the classifier.
pub type LabelIndex = usize;

/// Text a committed label contributes to the sentence.
pub type Symbol = String;

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelsFile {
    List(Vec<String>),
    Classes { classes: Vec<String> },
    Map(BTreeMap<String, String>),
}

/// Ordered label table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    names: Vec<Symbol>,
}

impl Labels {
    pub fn new(names: Vec<Symbol>) -> Self {
        Self { names }
    }

    /// Parse a label table from JSON text.
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        let file = serde_json::from_str::<LabelsFile>(json).map_err(|e| e.to_string())?;
        let names = match file {
            LabelsFile::List(names) => names,
            LabelsFile::Classes { classes } => classes,
            LabelsFile::Map(map) => {
                let mut entries = map
                    .into_iter()
                    .map(|(key, name)| {
                        key.trim()
                            .parse::<LabelIndex>()
                            .map(|index| (index, name))
                            .map_err(|_| format!("label key '{key}' is not an index"))
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                entries.sort_by_key(|(index, _)| *index);
                entries.into_iter().map(|(_, name)| name).collect()
            }
        };
        Ok(Self { names })
    }

    /// Load a label table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SignshError::LabelsLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| SignshError::LabelsLoad {
            path: path.display().to_string(),
            message: e,
        })
    }

    /// Symbol for `index`, falling back to the decimal index when no table is loaded.
    ///
    /// Returns `None` only when a table is loaded and `index` is past its end.
    pub fn symbol(&self, index: LabelIndex) -> Option<Symbol> {
        if self.names.is_empty() {
            Some(index.to_string())
        } else {
            self.names.get(index).cloned()
        }
    }

    /// True when `index` can be rendered.
    pub fn accepts(&self, index: LabelIndex) -> bool {
        self.names.is_empty() || index < self.names.len()
    }

    pub fn is_loaded(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
