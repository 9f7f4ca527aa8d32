//! Progress event stream.
//!
//! The orchestrator reports what it is doing through an ordered stream of
//! timestamped events sent to a caller-supplied channel. The stream is
//! one-way: the core emits and never reads back.

mod handle;
mod types;

pub use handle::{ProgressEnvelope, ProgressHandle};
pub use types::ProgressEvent;
