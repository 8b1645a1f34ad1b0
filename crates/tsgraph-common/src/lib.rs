//! Common types and utilities for the tsgraph engine.
//!
//! This crate provides foundational types used across all tsgraph crates:
//! - Diagnostic records, codes and message templates
//! - Centralized limits and thresholds

// Diagnostics - Records handed to external reporters
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, format_message, get_message_template,
};

// Centralized limits and thresholds
pub mod limits;
