//! JSON message protocol between clients and the daemon.
//!
//! One JSON object per line in each direction.

use crate::engine::{EngineHealth, ObservationOutcome};
use serde::{Deserialize, Serialize};

/// Requests sent to the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Feed one classified frame into a client's session
    Observe {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label_index: Option<i64>,
        #[serde(default)]
        confidence: f32,
        hand_present: bool,
    },
    /// Get a client's current sentence
    Sentence {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
    },
    /// Drop a client's session
    Reset {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
    },
    /// Get loaded resources and session count
    Health,
    /// Shutdown the daemon
    Shutdown,
}

impl Command {
    /// Serialize command to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize command from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Responses sent by the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Command succeeded
    Ok,
    /// Observation accepted
    Observation {
        prediction: Option<String>,
        confidence: f32,
        committed_index: Option<usize>,
        committed: Option<String>,
        sentence: String,
    },
    /// Current sentence of a client
    Sentence { sentence: String },
    /// Daemon health
    Health {
        labels_loaded: bool,
        labels_count: usize,
        wordlist_loaded: bool,
        wordlist_size: usize,
        sessions: usize,
    },
    /// Error occurred; session state is untouched
    Error { message: String },
}

impl Response {
    /// Serialize response to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize response from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl From<ObservationOutcome> for Response {
    fn from(outcome: ObservationOutcome) -> Self {
        let (committed_index, committed) = match outcome.committed {
            Some(sign) => (Some(sign.index), Some(sign.symbol)),
            None => (None, None),
        };
        Response::Observation {
            prediction: outcome.prediction,
            confidence: outcome.confidence,
            committed_index,
            committed,
            sentence: outcome.sentence,
        }
    }
}

impl From<EngineHealth> for Response {
    fn from(health: EngineHealth) -> Self {
        Response::Health {
            labels_loaded: health.labels_loaded,
            labels_count: health.labels_count,
            wordlist_loaded: health.wordlist_loaded,
            wordlist_size: health.wordlist_size,
            sessions: health.sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CommittedSign;

    #[test]
    fn test_command_json_format_examples() {
        assert_eq!(Command::Health.to_json().unwrap(), r#"{"type":"health"}"#);
        assert_eq!(
            Command::Shutdown.to_json().unwrap(),
            r#"{"type":"shutdown"}"#
        );
        assert_eq!(
            Command::Reset { client_id: None }.to_json().unwrap(),
            r#"{"type":"reset"}"#
        );
    }

    #[test]
    fn test_observe_parses_minimal_no_hand_frame() {
        let cmd = Command::from_json(r#"{"type":"observe","hand_present":false}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Observe {
                client_id: None,
                label_index: None,
                confidence: 0.0,
                hand_present: false,
            }
        );
    }

    #[test]
    fn test_observe_parses_full_frame() {
        let cmd = Command::from_json(
            r#"{"type":"observe","client_id":"cam-1","label_index":7,"confidence":0.93,"hand_present":true}"#,
        )
        .unwrap();
        match cmd {
            Command::Observe {
                client_id,
                label_index,
                confidence,
                hand_present,
            } => {
                assert_eq!(client_id.as_deref(), Some("cam-1"));
                assert_eq!(label_index, Some(7));
                assert!((confidence - 0.93).abs() < 1e-6);
                assert!(hand_present);
            }
            other => panic!("Expected Observe, got {:?}", other),
        }
    }

    #[test]
    fn test_observe_keeps_negative_label_for_validation() {
        let cmd = Command::from_json(
            r#"{"type":"observe","label_index":-3,"confidence":0.5,"hand_present":true}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            Command::Observe {
                label_index: Some(-3),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_json_returns_error() {
        assert!(Command::from_json(r#"{"type": "unknown_command"}"#).is_err());
        assert!(Command::from_json(r#"{"type": "observe"}"#).is_err());
        assert!(Command::from_json("not json at all").is_err());
    }

    #[test]
    fn test_response_from_outcome() {
        let outcome = ObservationOutcome {
            prediction: Some("H".to_string()),
            confidence: 0.9,
            committed: Some(CommittedSign {
                index: 0,
                symbol: "H".to_string(),
                appended: true,
            }),
            sentence: "H".to_string(),
            word_closed: false,
        };
        let json = Response::from(outcome).to_json().unwrap();
        assert!(json.contains(r#""type":"observation""#));
        assert!(json.contains(r#""committed_index":0"#));
        assert!(json.contains(r#""committed":"H""#));
        assert!(json.contains(r#""sentence":"H""#));
    }

    #[test]
    fn test_response_error_with_special_chars() {
        let resp = Response::Error {
            message: "Invalid observation: confidence \"NaN\"".to_string(),
        };
        let json = resp.to_json().expect("should serialize");
        assert_eq!(Response::from_json(&json).unwrap(), resp);
    }
}
