//! Event normalization: canonical records from webhook payloads

pub mod model;
pub mod normalizer;
pub mod payload;

pub use model::{CanonicalEvent, EventAction};
pub use normalizer::{normalize, parse_timestamp, NormalizeError};
