//! Undo-logged storage for type nodes.
//!
//! Allocation is append-only. The handful of in-place mutations the engine
//! performs (recording a signature or heritage entry on an object, promoting
//! an object's flavor, linking a reference to its target) are logged so that a failed declaration can be
//! rolled back to its snapshot.

use super::{ObjectFlavor, ObjectType, PrimitiveKind, ResolvedRef, TypeData, TypeId, TypeNode};
use crate::provenance::{DeclHandle, Provenance};
use ena::snapshot_vec::{Snapshot, SnapshotVec, SnapshotVecDelegate};

#[derive(Copy, Clone, Debug)]
pub(crate) enum TypeUndo {
    Signature(TypeId),
    Heritage(TypeId),
    Resolved(TypeId),
    Flavor(TypeId, ObjectFlavor),
}

pub(crate) struct TypeDelegate;

impl SnapshotVecDelegate for TypeDelegate {
    type Value = TypeNode;
    type Undo = TypeUndo;

    fn reverse(values: &mut Vec<TypeNode>, action: TypeUndo) {
        match action {
            TypeUndo::Signature(id) => {
                if let Some(obj) = object_mut(values, id) {
                    obj.signatures.pop();
                }
            }
            TypeUndo::Heritage(id) => {
                if let Some(obj) = object_mut(values, id) {
                    obj.heritage.pop();
                }
            }
            TypeUndo::Resolved(id) => {
                if let Some(TypeData::Reference(reference)) =
                    values.get_mut(id.0 as usize).map(|node| &mut node.data)
                {
                    reference.resolved = None;
                }
            }
            TypeUndo::Flavor(id, previous) => {
                if let Some(obj) = object_mut(values, id) {
                    obj.flavor = previous;
                }
            }
        }
    }
}

fn object_mut(values: &mut [TypeNode], id: TypeId) -> Option<&mut ObjectType> {
    match values.get_mut(id.0 as usize).map(|node| &mut node.data) {
        Some(TypeData::Object(obj)) => Some(obj),
        _ => None,
    }
}

pub struct TypeArena {
    nodes: SnapshotVec<TypeDelegate>,
}

impl TypeArena {
    pub fn new() -> Self {
        let mut nodes = SnapshotVec::new();
        for kind in PrimitiveKind::ALL {
            nodes.push(TypeNode {
                data: TypeData::Primitive(kind),
                provenance: Provenance::here(None),
            });
        }
        Self { nodes }
    }

    #[track_caller]
    pub fn alloc(&mut self, data: TypeData, decl: Option<DeclHandle>) -> TypeId {
        let provenance = Provenance::here(decl);
        let index = self.nodes.push(TypeNode { data, provenance });
        TypeId(index as u32)
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        let index = id.0 as usize;
        (index < self.nodes.len()).then(|| &self.nodes[index])
    }

    #[inline]
    pub fn data(&self, id: TypeId) -> Option<&TypeData> {
        self.get(id).map(|node| &node.data)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn object_mut(&mut self, id: TypeId) -> Option<&mut ObjectType> {
        let index = id.0 as usize;
        if index >= self.nodes.len() {
            return None;
        }
        match &mut self.nodes.get_mut(index).data {
            TypeData::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Record a call/construct signature on an object; namespaces refuse.
    pub fn push_signature(&mut self, object: TypeId, signature: TypeId) -> bool {
        let Some(obj) = self.object_mut(object) else {
            return false;
        };
        if obj.flavor == ObjectFlavor::Namespace {
            return false;
        }
        obj.signatures.push(signature);
        self.nodes.record(TypeUndo::Signature(object));
        true
    }

    pub fn push_heritage(&mut self, object: TypeId, reference: TypeId) -> bool {
        let Some(obj) = self.object_mut(object) else {
            return false;
        };
        obj.heritage.push(reference);
        self.nodes.record(TypeUndo::Heritage(object));
        true
    }

    /// Change the flavor of a non-namespace object.
    pub fn set_flavor(&mut self, object: TypeId, flavor: ObjectFlavor) -> bool {
        let Some(obj) = self.object_mut(object) else {
            return false;
        };
        if obj.flavor == ObjectFlavor::Namespace {
            return false;
        }
        let previous = std::mem::replace(&mut obj.flavor, flavor);
        self.nodes.record(TypeUndo::Flavor(object, previous));
        true
    }

    /// Link an unresolved reference to its target. Resolved references are
    /// never relinked.
    pub fn set_resolution(&mut self, reference: TypeId, resolution: ResolvedRef) -> bool {
        let index = reference.0 as usize;
        if index >= self.nodes.len() {
            return false;
        }
        match &mut self.nodes.get_mut(index).data {
            TypeData::Reference(r) if r.resolved.is_none() => r.resolved = Some(resolution),
            _ => return false,
        }
        self.nodes.record(TypeUndo::Resolved(reference));
        true
    }

    pub(crate) fn start_snapshot(&mut self) -> Snapshot {
        self.nodes.start_snapshot()
    }

    pub(crate) fn rollback_to(&mut self, snapshot: Snapshot) {
        self.nodes.rollback_to(snapshot);
    }

    pub(crate) fn commit(&mut self, snapshot: Snapshot) {
        self.nodes.commit(snapshot);
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}
