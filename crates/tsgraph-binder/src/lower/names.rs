//! Binding-name derivation.

use super::Binder;
use crate::errors::{BindError, Result};
use smallvec::SmallVec;
use tsgraph_decl::{NodeArena, NodeIndex, SyntaxKind};

pub(crate) type Segments = SmallVec<[String; 1]>;

impl Binder {
    /// Name a declaration binds under.
    ///
    /// - identifiers and private names: their text
    /// - string literals: the literal content
    /// - numeric literals: the canonical number (`0x10` and `16` agree)
    /// - computed names: `[expression]`
    /// - qualified names: segments joined with `.`
    pub(crate) fn declaration_name(&self, arena: &NodeArena, idx: NodeIndex) -> Result<String> {
        let node = self.node(arena, idx)?;
        let text = node.text().unwrap_or_default();
        match node.kind {
            SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier | SyntaxKind::StringLiteral => {
                Ok(text.to_string())
            }
            SyntaxKind::NumericLiteral => Ok(canonical_number(text)),
            SyntaxKind::ComputedPropertyName => Ok(format!("[{text}]")),
            SyntaxKind::QualifiedName => Ok(self.entity_segments(arena, idx)?.join(".")),
            kind => Err(BindError::UnhandledDeclarationKind {
                kind,
                decl: self.decl(idx, node),
            }),
        }
    }

    /// Segments of an identifier or left-nested qualified name.
    pub(crate) fn entity_segments(&self, arena: &NodeArena, idx: NodeIndex) -> Result<Segments> {
        let mut segments = Segments::new();
        let mut current = idx;
        for _ in 0..self.options.max_depth {
            let node = self.node(arena, current)?;
            match node.qualified_name() {
                Some((left, right)) => {
                    segments.push(self.declaration_name(arena, right)?);
                    current = left;
                }
                None => {
                    segments.push(self.declaration_name(arena, current)?);
                    segments.reverse();
                    return Ok(segments);
                }
            }
        }
        Err(BindError::DepthExceeded {
            limit: self.options.max_depth,
            decl: None,
        })
    }
}

fn canonical_number(text: &str) -> String {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok().map(|n| n as f64)
    } else {
        text.replace('_', "").parse::<f64>().ok()
    };
    parsed.map_or_else(|| text.to_string(), |n| n.to_string())
}
