//! Commit state machine.
//!
//! Counts how many consecutive votes agree on a candidate and commits it once
//! the hold threshold is reached. A commit of the same label as the previous
//! commit is flagged as a repeat unless an idle gap (a vote with no winner)
//! came in between, so a doubled letter requires releasing the sign.

use crate::labels::LabelIndex;

/// Current accumulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    /// No candidate.
    #[default]
    Idle,
    /// A candidate agreed on by `run_length` consecutive votes.
    Accumulating {
        candidate: LabelIndex,
        run_length: usize,
    },
}

impl CommitState {
    pub fn candidate(&self) -> Option<LabelIndex> {
        match self {
            CommitState::Idle => None,
            CommitState::Accumulating { candidate, .. } => Some(*candidate),
        }
    }

    pub fn run_length(&self) -> usize {
        match self {
            CommitState::Idle => 0,
            CommitState::Accumulating { run_length, .. } => *run_length,
        }
    }
}

/// Emitted when the hold threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitEvent {
    pub label: LabelIndex,
    /// Same label as the previous commit with no idle gap in between.
    pub repeat: bool,
}

/// Hold-threshold state machine.
#[derive(Debug, Clone)]
pub struct CommitStateMachine {
    hold_frames: usize,
    state: CommitState,
    last_commit: Option<LabelIndex>,
}

impl CommitStateMachine {
    pub fn new(hold_frames: usize) -> Self {
        Self {
            hold_frames: hold_frames.max(1),
            state: CommitState::Idle,
            last_commit: None,
        }
    }

    /// Feed one vote. Returns the commit, if this vote triggered one.
    ///
    /// After a commit the machine is `Idle`; the caller is responsible for
    /// clearing the observation window so stale frames cannot re-trigger.
    pub fn advance(&mut self, vote: Option<LabelIndex>) -> Option<CommitEvent> {
        let Some(label) = vote else {
            self.state = CommitState::Idle;
            self.last_commit = None;
            return None;
        };

        let run_length = match self.state {
            CommitState::Accumulating {
                candidate,
                run_length,
            } if candidate == label => run_length + 1,
            _ => 1,
        };

        if run_length >= self.hold_frames {
            self.state = CommitState::Idle;
            let repeat = self.last_commit == Some(label);
            self.last_commit = Some(label);
            return Some(CommitEvent { label, repeat });
        }

        self.state = CommitState::Accumulating {
            candidate: label,
            run_length,
        };
        None
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    pub fn hold_frames(&self) -> usize {
        self.hold_frames
    }
}
