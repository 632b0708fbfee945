//! Temporal commitment and sentence-assembly engine.
//!
//! observation → window → smoother → commit → word boundary → correction

pub mod boundary;
pub mod commit;
pub mod observation;
pub mod sentence_engine;
pub mod session;
pub mod smoother;
pub mod store;
pub mod window;

pub use observation::{Observation, RawObservation};
pub use sentence_engine::{EngineHealth, ObservationOutcome, SentenceEngine};
pub use session::{CommittedSign, Session};
pub use store::SessionStore;
