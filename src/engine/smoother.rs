//! Majority vote over the observation window.
//!
//! Low-confidence and unlabeled frames do not vote. The label with the most
//! votes wins; equal counts go to the larger confidence sum, and a full tie
//! goes to the lower label index.

use crate::engine::observation::Observation;
use crate::labels::LabelIndex;
use std::collections::BTreeMap;

/// Result of one vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vote {
    /// Winning label, `None` when no frame survived filtering.
    pub label: Option<LabelIndex>,
    /// Mean confidence of the winning group, `0.0` without a winner.
    pub confidence: f32,
}

impl Vote {
    pub const NONE: Vote = Vote {
        label: None,
        confidence: 0.0,
    };
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    count: usize,
    sum_confidence: f64,
}

impl Tally {
    fn beats(&self, other: &Tally) -> bool {
        self.count > other.count
            || (self.count == other.count && self.sum_confidence > other.sum_confidence)
    }
}

/// Majority-vote smoother.
#[derive(Debug, Clone, Copy)]
pub struct MajorityVote {
    min_confidence: f32,
}

impl MajorityVote {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    /// Collapse observations into the currently stable label.
    pub fn vote<'a, I>(&self, observations: I) -> Vote
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut tallies: BTreeMap<LabelIndex, Tally> = BTreeMap::new();
        for obs in observations {
            let Some(label) = obs.label else { continue };
            if obs.confidence < self.min_confidence {
                continue;
            }
            let tally = tallies.entry(label).or_default();
            tally.count += 1;
            tally.sum_confidence += f64::from(obs.confidence);
        }

        // Ascending label order; only a strictly better tally replaces the leader.
        let mut best: Option<(LabelIndex, Tally)> = None;
        for (label, tally) in tallies {
            match best {
                Some((_, leader)) if !tally.beats(&leader) => {}
                _ => best = Some((label, tally)),
            }
        }

        match best {
            Some((label, tally)) => Vote {
                label: Some(label),
                confidence: (tally.sum_confidence / tally.count as f64) as f32,
            },
            None => Vote::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn frames(raw: &[(Option<usize>, f32)]) -> Vec<Observation> {
        let now = Instant::now();
        raw.iter()
            .map(|&(label, confidence)| Observation {
                label,
                confidence,
                timestamp: now,
                hand_present: label.is_some(),
            })
            .collect()
    }

    #[test]
    fn empty_window_has_no_winner() {
        let smoother = MajorityVote::new(0.5);
        assert_eq!(smoother.vote(std::iter::empty()), Vote::NONE);
    }

    #[test]
    fn majority_wins_with_mean_confidence() {
        let smoother = MajorityVote::new(0.5);
        let window = frames(&[(Some(1), 0.8), (Some(2), 0.99), (Some(1), 0.6)]);
        let vote = smoother.vote(&window);
        assert_eq!(vote.label, Some(1));
        assert!((vote.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn filters_unlabeled_and_low_confidence() {
        let smoother = MajorityVote::new(0.5);
        let window = frames(&[(None, 0.9), (Some(3), 0.49), (Some(3), 0.2)]);
        assert_eq!(smoother.vote(&window), Vote::NONE);
    }

    #[test]
    fn count_tie_goes_to_higher_confidence_sum() {
        let smoother = MajorityVote::new(0.5);
        let window = frames(&[(Some(1), 0.6), (Some(2), 0.9), (Some(1), 0.6), (Some(2), 0.9)]);
        assert_eq!(smoother.vote(&window).label, Some(2));
    }

    #[test]
    fn full_tie_goes_to_lower_label() {
        let smoother = MajorityVote::new(0.5);
        let window = frames(&[(Some(4), 0.75), (Some(2), 0.75)]);
        assert_eq!(smoother.vote(&window).label, Some(2));

        let reversed = frames(&[(Some(2), 0.75), (Some(4), 0.75)]);
        assert_eq!(smoother.vote(&reversed).label, Some(2));
    }

    #[test]
    fn vote_is_idempotent() {
        let smoother = MajorityVote::new(0.5);
        let window = frames(&[(Some(1), 0.8), (Some(2), 0.7)]);
        assert_eq!(smoother.vote(&window), smoother.vote(&window));
    }
}
