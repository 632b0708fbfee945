//! Per-client sentence assembly.
//!
//! A session owns one window, smoother, commit machine and boundary
//! detector. `process` is the only path that mutates it.

use crate::config::EngineConfig;
use crate::correction::corrector::Corrector;
use crate::correction::lexical::correct_last_word;
use crate::defaults::WORD_SEPARATOR;
use crate::engine::boundary::WordBoundaryDetector;
use crate::engine::commit::{CommitState, CommitStateMachine};
use crate::engine::observation::Observation;
use crate::engine::smoother::{MajorityVote, Vote};
use crate::engine::window::ObservationWindow;
use crate::labels::{LabelIndex, Labels, Symbol};
use std::time::Instant;

/// A label that reached the hold threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSign {
    pub index: LabelIndex,
    pub symbol: Symbol,
    /// False when the commit was collapsed as an immediate repeat.
    pub appended: bool,
}

/// What one observation did to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStep {
    pub vote: Vote,
    pub committed: Option<CommittedSign>,
    /// A separator was appended on this call.
    pub word_closed: bool,
    /// The closed word was replaced by a dictionary match.
    pub corrected: bool,
}

/// State of one client.
#[derive(Debug, Clone)]
pub struct Session {
    window: ObservationWindow,
    smoother: MajorityVote,
    commit: CommitStateMachine,
    boundary: WordBoundaryDetector,
    committed_letters: Vec<Symbol>,
    sentence: String,
    last_activity: Instant,
}

impl Session {
    pub fn new(config: &EngineConfig, now: Instant) -> Self {
        Self {
            window: ObservationWindow::new(config.window_size),
            smoother: MajorityVote::new(config.min_confidence),
            commit: CommitStateMachine::new(config.hold_frames),
            boundary: WordBoundaryDetector::new(config.word_pause(), now),
            committed_letters: Vec::new(),
            sentence: String::new(),
            last_activity: now,
        }
    }

    /// Run one observation through window, vote, commit and boundary check.
    pub fn process(
        &mut self,
        observation: Observation,
        labels: &Labels,
        corrector: &dyn Corrector,
    ) -> SessionStep {
        let now = observation.timestamp;
        self.last_activity = self.last_activity.max(now);
        self.boundary.observe(observation.hand_present, now);
        self.window.push(observation);

        let vote = self.smoother.vote(self.window.snapshot());
        let committed = self
            .commit
            .advance(vote.label)
            .and_then(|event| {
                self.window.clear();
                let symbol = labels.symbol(event.label)?;
                // A separator never opens the sentence or follows another one
                let text = if self.sentence.is_empty() || self.sentence.ends_with(WORD_SEPARATOR) {
                    symbol.trim_start_matches(WORD_SEPARATOR)
                } else {
                    symbol.as_str()
                };
                let appended = !event.repeat && !text.is_empty();
                if appended {
                    self.sentence.push_str(text);
                    self.committed_letters.push(symbol.clone());
                    if !text.ends_with(WORD_SEPARATOR) {
                        self.boundary.letter_appended();
                    }
                    log::debug!("Committed '{symbol}' (label {})", event.label);
                } else {
                    log::debug!("Collapsed repeated '{symbol}' (label {})", event.label);
                }
                Some(CommittedSign {
                    index: event.label,
                    symbol,
                    appended,
                })
            });

        let word_closed = self.boundary.check(now, &mut self.sentence);
        let corrected = word_closed && self.correct_last_word(corrector);

        SessionStep {
            vote,
            committed,
            word_closed,
            corrected,
        }
    }

    fn correct_last_word(&mut self, corrector: &dyn Corrector) -> bool {
        if !corrector.is_active() {
            return false;
        }
        match correct_last_word(&self.sentence, corrector) {
            Some(corrected) => {
                log::debug!(
                    "Corrected {:?} -> {:?} ({})",
                    self.sentence,
                    corrected,
                    corrector.name()
                );
                self.sentence = corrected;
                true
            }
            None => false,
        }
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn committed_letters(&self) -> &[Symbol] {
        &self.committed_letters
    }

    pub fn commit_state(&self) -> CommitState {
        self.commit.state()
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    /// Timestamp of the most recent observation.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }
}
