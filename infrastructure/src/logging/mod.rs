//! Run persistence.
//!
//! Provides [`JsonlRunRecorder`], a JSONL file writer that implements the
//! [`RunRecorder`](roundtable_application::RunRecorder) port.

mod jsonl_recorder;

pub use jsonl_recorder::{JsonlRunRecorder, RUNS_FILE_NAME};
