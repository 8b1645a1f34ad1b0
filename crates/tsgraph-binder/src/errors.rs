//! Fatal lowering errors.
//!
//! Every variant aborts the declaration being lowered; the graph is rolled
//! back to the snapshot taken before it. Unresolved references are not
//! errors (see [`UnresolvedReport`](crate::UnresolvedReport)).

use crate::graph::TypeGraph;
use crate::provenance::DeclHandle;
use crate::scope::ScopeId;
use thiserror::Error;
use tsgraph_common::diagnostics::{Diagnostic, diagnostic_codes, format_message, get_message_template};
use tsgraph_decl::{NodeIndex, SyntaxKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("duplicate identifier '{name}'")]
    DuplicateIdentifier {
        name: String,
        decl: Option<DeclHandle>,
        /// Declaration of the binding already holding the name.
        previous: Option<DeclHandle>,
    },

    #[error("duplicate overload of '{name}' with signature {key}")]
    DuplicateOverload {
        name: String,
        key: String,
        decl: Option<DeclHandle>,
    },

    #[error("unable to deduce type argument '{parameter}' of '{name}' ({candidates} candidates)")]
    MissingTypeArgument {
        name: String,
        parameter: String,
        candidates: usize,
        decl: Option<DeclHandle>,
    },

    #[error("'{name}' takes {expected} type argument(s), got {actual}")]
    TypeArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
        decl: Option<DeclHandle>,
    },

    #[error("no lowering for declaration kind {kind}")]
    UnhandledDeclarationKind {
        kind: SyntaxKind,
        decl: Option<DeclHandle>,
    },

    #[error("declarations of '{name}' disagree on type parameters")]
    TypeParameterMismatch {
        name: String,
        decl: Option<DeclHandle>,
    },

    #[error("declaration tree references missing node {}", node.0)]
    MissingNode { node: NodeIndex },

    #[error("declaration nesting exceeds depth {limit}")]
    DepthExceeded { limit: u32, decl: Option<DeclHandle> },

    #[error("scope {} does not exist", scope.0)]
    UnknownScope { scope: ScopeId },
}

pub type Result<T, E = BindError> = std::result::Result<T, E>;

impl BindError {
    pub const fn code(&self) -> u32 {
        match self {
            Self::DuplicateIdentifier { .. } => diagnostic_codes::DUPLICATE_IDENTIFIER,
            Self::DuplicateOverload { .. } => diagnostic_codes::DUPLICATE_OVERLOAD,
            Self::MissingTypeArgument { .. } => diagnostic_codes::UNABLE_TO_DEDUCE_TYPE_ARGUMENT,
            Self::TypeArgumentCount { .. } => diagnostic_codes::GENERIC_TYPE_REQUIRES_TYPE_ARGUMENTS,
            Self::UnhandledDeclarationKind { .. } => diagnostic_codes::UNHANDLED_DECLARATION_KIND,
            Self::TypeParameterMismatch { .. } => {
                diagnostic_codes::ALL_DECLARATIONS_MUST_HAVE_IDENTICAL_TYPE_PARAMETERS
            }
            Self::MissingNode { .. } => diagnostic_codes::MISSING_DECLARATION_NODE,
            Self::DepthExceeded { .. } => diagnostic_codes::DECLARATION_NESTING_TOO_DEEP,
            Self::UnknownScope { .. } => diagnostic_codes::UNKNOWN_SCOPE,
        }
    }

    /// The declaration the error points at.
    pub const fn decl(&self) -> Option<DeclHandle> {
        match self {
            Self::DuplicateIdentifier { decl, .. }
            | Self::DuplicateOverload { decl, .. }
            | Self::MissingTypeArgument { decl, .. }
            | Self::TypeArgumentCount { decl, .. }
            | Self::UnhandledDeclarationKind { decl, .. }
            | Self::TypeParameterMismatch { decl, .. }
            | Self::DepthExceeded { decl, .. } => *decl,
            Self::MissingNode { .. } | Self::UnknownScope { .. } => None,
        }
    }

    /// Attach a declaration to errors raised below the lowering dispatch.
    #[must_use]
    pub fn or_at(mut self, at: Option<DeclHandle>) -> Self {
        match &mut self {
            Self::DuplicateIdentifier { decl, .. }
            | Self::DuplicateOverload { decl, .. }
            | Self::MissingTypeArgument { decl, .. }
            | Self::TypeArgumentCount { decl, .. }
            | Self::UnhandledDeclarationKind { decl, .. }
            | Self::TypeParameterMismatch { decl, .. }
            | Self::DepthExceeded { decl, .. } => {
                if decl.is_none() {
                    *decl = at;
                }
            }
            Self::MissingNode { .. } | Self::UnknownScope { .. } => {}
        }
        self
    }

    fn message(&self) -> String {
        let template = get_message_template(self.code()).unwrap_or("{0}");
        match self {
            Self::DuplicateIdentifier { name, .. }
            | Self::DuplicateOverload { name, .. }
            | Self::TypeParameterMismatch { name, .. } => format_message(template, &[name.as_str()]),
            Self::MissingTypeArgument { parameter, .. } => format_message(template, &[parameter.as_str()]),
            Self::TypeArgumentCount {
                name,
                expected,
                actual,
                ..
            } => format_message(
                template,
                &[name.as_str(), expected.to_string().as_str(), actual.to_string().as_str()],
            ),
            Self::UnhandledDeclarationKind { kind, .. } => {
                format_message(template, &[kind.to_string().as_str()])
            }
            Self::MissingNode { node } => format_message(template, &[node.0.to_string().as_str()]),
            Self::DepthExceeded { limit, .. } => format_message(template, &[limit.to_string().as_str()]),
            Self::UnknownScope { scope } => format_message(template, &[scope.0.to_string().as_str()]),
        }
    }

    /// Diagnostic record for external reporters.
    pub fn to_diagnostic(&self, graph: &TypeGraph) -> Diagnostic {
        let (file, start, length) = match self.decl() {
            Some(decl) => (
                graph.file_name(decl.file).unwrap_or_default().to_string(),
                decl.pos,
                decl.len(),
            ),
            None => (String::new(), 0, 0),
        };
        let diag = Diagnostic::error(file, start, length, self.message(), self.code());
        match self {
            Self::DuplicateIdentifier {
                name,
                previous: Some(previous),
                ..
            } => diag.with_related(
                graph.file_name(previous.file).unwrap_or_default().to_string(),
                previous.pos,
                previous.len(),
                format!("'{name}' was also declared here."),
            ),
            _ => diag,
        }
    }
}
