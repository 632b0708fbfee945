//! Offline replay of recorded observation traces.
//!
//! A trace is JSON lines, one classified frame per line:
//!
//! ```text
//! {"t": 0.00, "label": 7, "confidence": 0.91, "hand": true}
//! {"t": 0.07, "label": null, "hand": false}
//! ```
//!
//! `t` is seconds since the start of the recording. Frames are fed to an
//! in-process engine with timestamps derived from `t`, so word pauses in the
//! recording behave as they did live. Blank lines and `#` comments are
//! skipped.

use crate::engine::SentenceEngine;
use crate::error::{Result, SignshError};
use serde::Deserialize;
use std::io::BufRead;
use std::time::{Duration, Instant};

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceFrame {
    pub t: f64,
    #[serde(default)]
    pub label: Option<i64>,
    #[serde(default)]
    pub confidence: f32,
    /// Defaults to whether a label is present.
    #[serde(default)]
    pub hand: Option<bool>,
}

impl TraceFrame {
    pub fn hand_present(&self) -> bool {
        self.hand.unwrap_or(self.label.is_some())
    }
}

/// Something worth reporting during a replay.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    /// A letter reached the hold threshold.
    Commit {
        t: f64,
        symbol: String,
        appended: bool,
    },
    /// A word was closed; `sentence` includes any correction.
    WordBreak { t: f64, sentence: String },
    /// The engine refused the frame.
    Rejected { line: usize, reason: String },
}

/// Summary of a finished replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub frames: usize,
    pub events: Vec<ReplayEvent>,
    pub sentence: String,
}

impl ReplayReport {
    pub fn commits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ReplayEvent::Commit { appended: true, .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ReplayEvent::Rejected { .. }))
            .count()
    }
}

/// Parse one trace line. `None` for blank and comment lines.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<TraceFrame>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let frame: TraceFrame = serde_json::from_str(line).map_err(|e| SignshError::TraceParse {
        line: line_no,
        message: e.to_string(),
    })?;
    if !frame.t.is_finite() || frame.t < 0.0 {
        return Err(SignshError::TraceParse {
            line: line_no,
            message: format!("timestamp must be a non-negative number, got {}", frame.t),
        });
    }
    Ok(Some(frame))
}

/// Feed a trace through `engine` under `client_id`.
///
/// Malformed lines abort the replay; frames the engine rejects are reported
/// and skipped, as the daemon would.
pub fn replay<R: BufRead>(
    engine: &SentenceEngine,
    client_id: Option<&str>,
    reader: R,
) -> Result<ReplayReport> {
    let start = Instant::now();
    let mut report = ReplayReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let Some(frame) = parse_line(line_no, &line?)? else {
            continue;
        };
        report.frames += 1;

        let at = Duration::try_from_secs_f64(frame.t)
            .ok()
            .and_then(|offset| start.checked_add(offset))
            .ok_or_else(|| SignshError::TraceParse {
                line: line_no,
                message: format!("timestamp {} is out of range", frame.t),
            })?;
        let outcome = match engine.process_observation(
            client_id,
            frame.label,
            frame.confidence,
            frame.hand_present(),
            at,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::debug!("Trace line {line_no} rejected: {e}");
                report.events.push(ReplayEvent::Rejected {
                    line: line_no,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(sign) = outcome.committed {
            report.events.push(ReplayEvent::Commit {
                t: frame.t,
                symbol: sign.symbol,
                appended: sign.appended,
            });
        }
        if outcome.word_closed {
            report.events.push(ReplayEvent::WordBreak {
                t: frame.t,
                sentence: outcome.sentence.clone(),
            });
        }
        report.sentence = outcome.sentence;
    }

    Ok(report)
}
