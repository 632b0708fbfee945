//! Word-boundary detection from hand absence.
//!
//! Closes the current word once no hand has been seen for the configured
//! pause. Detection is reactive: it only runs when an observation arrives,
//! so a client that stops sending frames never has its last word closed.

use crate::defaults::WORD_SEPARATOR;
use std::time::{Duration, Instant};

/// Tracks hand recency and whether a word is open.
#[derive(Debug, Clone)]
pub struct WordBoundaryDetector {
    pause: Duration,
    last_hand_seen_at: Instant,
    word_open: bool,
}

impl WordBoundaryDetector {
    /// `now` seeds the hand recency, so a fresh session does not close a word immediately.
    pub fn new(pause: Duration, now: Instant) -> Self {
        Self {
            pause,
            last_hand_seen_at: now,
            word_open: false,
        }
    }

    /// Record an observation's hand presence.
    pub fn observe(&mut self, hand_present: bool, now: Instant) {
        if hand_present {
            self.last_hand_seen_at = now;
        }
    }

    /// A letter was appended to the sentence.
    pub fn letter_appended(&mut self) {
        self.word_open = true;
    }

    /// Append a separator to `sentence` if the pause has elapsed.
    ///
    /// Returns true only on the call that closed the word, which is the
    /// caller's cue to run correction exactly once.
    pub fn check(&mut self, now: Instant, sentence: &mut String) -> bool {
        if !self.word_open || self.elapsed(now) < self.pause {
            return false;
        }
        self.word_open = false;
        if sentence.is_empty() || sentence.ends_with(WORD_SEPARATOR) {
            return false;
        }
        sentence.push(WORD_SEPARATOR);
        true
    }

    /// Time since a hand was last seen.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_hand_seen_at)
    }

    pub fn last_hand_seen_at(&self) -> Instant {
        self.last_hand_seen_at
    }

    pub fn is_word_open(&self) -> bool {
        self.word_open
    }
}
