//! Domain model (envelopes, kinds, transport shapes, outcomes, errors, ids).

pub mod envelope;
pub mod errors;
pub mod ids;
pub mod kind;
pub mod outcome;
pub mod request;

pub use envelope::{Batch, CommonArgs, Envelope, FormSection, Payload, TypeArgs};
pub use errors::{ConfigError, RecordParseError, ReplayError, TransportError, UnsupportedKind};
pub use ids::{RoundId, RunId};
pub use kind::RequestKind;
pub use outcome::{Outcome, OutcomeKind};
pub use request::{Method, RequestBody, RequestShape, TransportRequest, TransportResponse};
