//! Entry point used by the API layer.
//!
//! Validates observations, routes them to the client's session and reports
//! the outcome. The engine owns the session store; there is no process-wide
//! session state outside it.

use crate::config::{Config, EngineConfig, StoreConfig};
use crate::correction::corrector::{Corrector, PassthroughCorrector};
use crate::correction::lexical::DictionaryCorrector;
use crate::defaults::DEFAULT_CLIENT_ID;
use crate::dictionary::Dictionary;
use crate::engine::observation::RawObservation;
use crate::engine::session::CommittedSign;
use crate::engine::store::{SessionStore, lock_session};
use crate::error::Result;
use crate::labels::{Labels, Symbol};
use std::sync::Arc;
use std::time::Instant;

/// Result of an accepted observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationOutcome {
    /// Symbol of this frame's raw label, before smoothing.
    pub prediction: Option<Symbol>,
    /// This frame's raw confidence.
    pub confidence: f32,
    /// Commit triggered by this frame, if any.
    pub committed: Option<CommittedSign>,
    /// The client's sentence after this frame.
    pub sentence: String,
    /// A word boundary was inserted by this frame.
    pub word_closed: bool,
}

/// Loaded resources and live session count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineHealth {
    pub labels_loaded: bool,
    pub labels_count: usize,
    pub wordlist_loaded: bool,
    pub wordlist_size: usize,
    pub sessions: usize,
}

/// Commitment and sentence-assembly engine shared by all clients.
pub struct SentenceEngine {
    config: EngineConfig,
    labels: Labels,
    corrector: Arc<dyn Corrector>,
    wordlist_size: usize,
    store: SessionStore,
}

impl std::fmt::Debug for SentenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEngine")
            .field("config", &self.config)
            .field("labels", &self.labels.len())
            .field("corrector", &self.corrector.name())
            .field("sessions", &self.store.len())
            .finish_non_exhaustive()
    }
}

/// Map a missing or blank client identifier to the default one.
pub fn resolve_client_id(client_id: Option<&str>) -> &str {
    match client_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_CLIENT_ID,
    }
}

impl SentenceEngine {
    /// Build an engine from explicit parts.
    pub fn new(
        config: EngineConfig,
        store: StoreConfig,
        labels: Labels,
        dictionary: Dictionary,
    ) -> Result<Self> {
        config.validate()?;
        store.validate()?;

        let wordlist_size = dictionary.len();
        let corrector: Arc<dyn Corrector> = if dictionary.is_empty() {
            Arc::new(PassthroughCorrector)
        } else {
            Arc::new(DictionaryCorrector::with_config(dictionary, &config))
        };

        Ok(Self {
            store: SessionStore::new(config.clone(), store),
            config,
            labels,
            corrector,
            wordlist_size,
        })
    }

    /// Build an engine from configuration, loading labels and the word list.
    ///
    /// A configured label table must load; a missing word list only disables
    /// correction.
    pub fn from_config(config: &Config) -> Result<Self> {
        let labels = match &config.resources.labels_path {
            Some(path) => {
                let labels = Labels::from_file(path)?;
                log::info!("Loaded {} labels from {}", labels.len(), path.display());
                labels
            }
            None => {
                log::info!("No label table configured, using numeric labels");
                Labels::default()
            }
        };

        let dictionary = match &config.resources.wordlist_path {
            Some(path) => Dictionary::from_file_or_empty(path),
            None => {
                log::info!("No word list configured, word correction disabled");
                Dictionary::default()
            }
        };

        Self::new(
            config.engine.clone(),
            config.store.clone(),
            labels,
            dictionary,
        )
    }

    /// Process one observation for a client.
    ///
    /// Malformed input is rejected before any session is created or touched.
    pub fn process_observation(
        &self,
        client_id: Option<&str>,
        label_index: Option<i64>,
        confidence: f32,
        hand_present: bool,
        now: Instant,
    ) -> Result<ObservationOutcome> {
        let observation = RawObservation {
            label_index,
            confidence,
            hand_present,
        }
        .validate(&self.labels, now)?;

        let client_id = resolve_client_id(client_id);
        let shared = self.store.get_or_create(client_id, now);
        let mut session = lock_session(&shared);
        let step = session.process(observation, &self.labels, self.corrector.as_ref());

        Ok(ObservationOutcome {
            prediction: observation.label.and_then(|l| self.labels.symbol(l)),
            confidence: observation.confidence,
            committed: step.committed,
            sentence: session.sentence().to_string(),
            word_closed: step.word_closed,
        })
    }

    /// Current sentence for a client, empty if it has no session.
    pub fn get_sentence(&self, client_id: Option<&str>) -> String {
        self.store.current_sentence(resolve_client_id(client_id))
    }

    /// Drop a client's session. The next observation starts from scratch.
    pub fn reset_session(&self, client_id: Option<&str>) {
        self.store.reset(resolve_client_id(client_id));
    }

    pub fn health(&self) -> EngineHealth {
        EngineHealth {
            labels_loaded: self.labels.is_loaded(),
            labels_count: self.labels.len(),
            wordlist_loaded: self.corrector.is_active(),
            wordlist_size: self.wordlist_size,
            sessions: self.store.len(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
