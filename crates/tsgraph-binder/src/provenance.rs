//! Creation-site tracking for graph nodes.
//!
//! Every type node remembers two things: the declaration node it was lowered
//! from (if any), and the engine source location that allocated it. The
//! first feeds external reporters; the second is for debugging the engine
//! itself (`RUST_LOG=trace` prints both).

use serde::Serialize;
use std::fmt;
use std::panic::Location;
use tsgraph_decl::{Node, NodeIndex};

/// Index of a lowered file inside one [`TypeGraph`](crate::TypeGraph) run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

/// Handle to an originating declaration node.
///
/// The span is copied out of the node at lowering time so diagnostics can be
/// produced after the declaration arena is gone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclHandle {
    pub file: FileId,
    pub node: NodeIndex,
    pub pos: u32,
    pub end: u32,
}

impl DeclHandle {
    pub const fn new(file: FileId, node: NodeIndex, pos: u32, end: u32) -> Self {
        Self {
            file,
            node,
            pos,
            end,
        }
    }

    pub const fn of(file: FileId, idx: NodeIndex, node: &Node) -> Self {
        Self::new(file, idx, node.pos, node.end)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.pos)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for DeclHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}:{}..{}", self.file.0, self.pos, self.end)
    }
}

/// Where a graph node came from.
#[derive(Copy, Clone, Debug)]
pub struct Provenance {
    pub decl: Option<DeclHandle>,
    pub created_at: &'static Location<'static>,
}

impl Provenance {
    #[track_caller]
    pub fn here(decl: Option<DeclHandle>) -> Self {
        Self {
            decl,
            created_at: Location::caller(),
        }
    }
}
