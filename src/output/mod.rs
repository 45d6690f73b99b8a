//! Command output: JSON envelopes, CSV reports and progress bars.

mod csv;
pub mod json_envelope;
pub mod progress;

pub use self::csv::CsvReportWriter;
pub use json_envelope::{emit_json_error, emit_json_result};
