//! Diagnostic types and message lookup.
//!
//! Codes below 9000 reuse the numbering TypeScript users already know
//! (`TS2300`, `TS2304`, ...). Codes from 9000 upward are specific to the
//! type-graph engine and have no TypeScript counterpart.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A message template with its code and default category.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Related information for a diagnostic (e.g., where a name was first declared).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A diagnostic message with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where a name was declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub const fn warning(
        file: String,
        start: u32,
        length: u32,
        message: String,
        code: u32,
    ) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Warning,
            code,
            related_information: Vec::new(),
        }
    }

    /// Re-categorize this diagnostic.
    #[must_use]
    pub const fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, file: String, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }
}

// =============================================================================
// Codes and Templates
// =============================================================================

pub mod diagnostic_codes {
    pub const DUPLICATE_IDENTIFIER: u32 = 2300;
    pub const CANNOT_FIND_NAME: u32 = 2304;
    pub const GENERIC_TYPE_REQUIRES_TYPE_ARGUMENTS: u32 = 2314;
    pub const DUPLICATE_OVERLOAD: u32 = 2393;
    pub const ALL_DECLARATIONS_MUST_HAVE_IDENTICAL_TYPE_PARAMETERS: u32 = 2428;

    pub const UNABLE_TO_DEDUCE_TYPE_ARGUMENT: u32 = 9001;
    pub const UNHANDLED_DECLARATION_KIND: u32 = 9002;
    pub const MISSING_DECLARATION_NODE: u32 = 9003;
    pub const DECLARATION_NESTING_TOO_DEEP: u32 = 9004;
    pub const UNKNOWN_SCOPE: u32 = 9005;
}

use diagnostic_codes as codes;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: codes::DUPLICATE_IDENTIFIER,
        category: DiagnosticCategory::Error,
        message: "Duplicate identifier '{0}'.",
    },
    DiagnosticMessage {
        code: codes::CANNOT_FIND_NAME,
        category: DiagnosticCategory::Error,
        message: "Cannot find name '{0}'.",
    },
    DiagnosticMessage {
        code: codes::GENERIC_TYPE_REQUIRES_TYPE_ARGUMENTS,
        category: DiagnosticCategory::Error,
        message: "Generic type '{0}' requires {1} type argument(s), got {2}.",
    },
    DiagnosticMessage {
        code: codes::DUPLICATE_OVERLOAD,
        category: DiagnosticCategory::Error,
        message: "Duplicate overloaded function found for '{0}'.",
    },
    DiagnosticMessage {
        code: codes::ALL_DECLARATIONS_MUST_HAVE_IDENTICAL_TYPE_PARAMETERS,
        category: DiagnosticCategory::Error,
        message: "All declarations of '{0}' must have identical type parameters.",
    },
    DiagnosticMessage {
        code: codes::UNABLE_TO_DEDUCE_TYPE_ARGUMENT,
        category: DiagnosticCategory::Error,
        message: "Unable to deduce type of '{0}'.",
    },
    DiagnosticMessage {
        code: codes::UNHANDLED_DECLARATION_KIND,
        category: DiagnosticCategory::Error,
        message: "Unhandled declaration kind '{0}'.",
    },
    DiagnosticMessage {
        code: codes::MISSING_DECLARATION_NODE,
        category: DiagnosticCategory::Error,
        message: "Declaration tree references missing node {0}.",
    },
    DiagnosticMessage {
        code: codes::DECLARATION_NESTING_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Declaration nesting exceeds the maximum depth of {0}.",
    },
    DiagnosticMessage {
        code: codes::UNKNOWN_SCOPE,
        category: DiagnosticCategory::Error,
        message: "Scope {0} does not exist.",
    },
];

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
