//! Corrector trait for completed-word correction.

/// Trait for replacing a just-completed word with a better spelling.
///
/// Implementations are shared by every session, so they take `&self` and
/// must be `Sync`.
pub trait Corrector: Send + Sync + 'static {
    /// Return a replacement for `word` (already lowercased), or `None` to keep it.
    fn correct_word(&self, word: &str) -> Option<String>;

    /// Return the name of this corrector for logging.
    fn name(&self) -> &str;

    /// False when the corrector can never change anything.
    fn is_active(&self) -> bool {
        true
    }
}

/// Passthrough corrector that leaves every word unchanged.
///
/// Used when no word list is configured or the configured one failed to load.
pub struct PassthroughCorrector;

impl Corrector for PassthroughCorrector {
    fn correct_word(&self, _word: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &str {
        "passthrough"
    }

    fn is_active(&self) -> bool {
        false
    }
}
