//! Audit logging module
//!
//! Records what was anonymized without ever writing an original in plain text.

pub mod logger;

pub use logger::AuditLogger;
