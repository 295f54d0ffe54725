//! Structured logging for the SnapGrade service.
//!
//! Console output plus a daily-rolling JSON file, with redaction helpers
//! so image payloads and credentials never reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive;
