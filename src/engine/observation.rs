//! Observation types flowing into a session.

use crate::error::{Result, SignshError};
use crate::labels::{LabelIndex, Labels};
use std::time::Instant;

/// One classified frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Classifier label, `None` when nothing was recognized.
    pub label: Option<LabelIndex>,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// When the frame was observed.
    pub timestamp: Instant,
    /// Whether a hand was detected in the frame.
    pub hand_present: bool,
}

impl Observation {
    /// A frame in which a hand was detected and classified.
    pub fn sign(label: LabelIndex, confidence: f32, timestamp: Instant) -> Self {
        Self {
            label: Some(label),
            confidence,
            timestamp,
            hand_present: true,
        }
    }

    /// A frame with no hand in view.
    pub fn no_hand(timestamp: Instant) -> Self {
        Self {
            label: None,
            confidence: 0.0,
            timestamp,
            hand_present: false,
        }
    }
}

/// Observation as received from the API layer, before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub label_index: Option<i64>,
    pub confidence: f32,
    pub hand_present: bool,
}

impl RawObservation {
    /// Check the observation against the label table and stamp it with `now`.
    ///
    /// Rejections never touch session state.
    pub fn validate(self, labels: &Labels, now: Instant) -> Result<Observation> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(SignshError::invalid_observation(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }

        let label = match self.label_index {
            None => None,
            Some(raw) => {
                let index = LabelIndex::try_from(raw).map_err(|_| {
                    SignshError::invalid_observation(format!("negative label index {raw}"))
                })?;
                if !labels.accepts(index) {
                    return Err(SignshError::invalid_observation(format!(
                        "label index {index} out of range for {} labels",
                        labels.len()
                    )));
                }
                Some(index)
            }
        };

        Ok(Observation {
            label,
            confidence: self.confidence,
            timestamp: now,
            hand_present: self.hand_present,
        })
    }
}
