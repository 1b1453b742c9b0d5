#![deny(missing_docs)]

//! Core library for the student registry server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Registry activity counters.
pub mod metrics;
/// Student records, validation, and the in-memory store.
pub mod students;
/// Summary generation through an external text-generation runtime.
pub mod summarization;
