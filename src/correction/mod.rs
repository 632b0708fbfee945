//! Correction of completed words.

pub mod corrector;
pub mod lexical;
