//! Copy plans: the walker's verdict for one shape at one path and depth.

use crate::shape::{FieldKey, PointerKind};

/// Container flavour for elementwise copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Sequence containers driven by `iter()`/`collect()`.
    Seq,
    /// Keyed maps; the loop is driven by the source container's own
    /// enumeration, keys are cloned directly.
    Map,
    /// Fixed-size arrays, rebuilt through `each_ref()`.
    Array,
}

/// One node of a copy plan, mirroring a shape node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyPlanNode {
    /// Shallow copy: a single `clone()` of the source value.
    DirectAssign,
    /// Guarded allocation of a fresh pointer followed by the inner plan
    /// against the dereferenced value.
    AllocateAndRecurse {
        kind: PointerKind,
        nullable: bool,
        inner: Box<CopyPlanNode>,
    },
    /// A fresh container of the same length/key-set, one inner plan shared by
    /// every element.
    Elementwise {
        container: ContainerKind,
        inner: Box<CopyPlanNode>,
    },
    /// Per-field plans in declared field order.
    Fieldwise { children: Vec<(FieldKey, CopyPlanNode)> },
    /// Trait-object value; shallow-assigned because the concrete type behind
    /// it is not statically known.
    DynamicDispatch,
    /// A pointer whose target shape already appears as an ancestor on the
    /// current path; lowered as a recursive call through the generated
    /// method on the target type.
    CycleGuard {
        kind: PointerKind,
        nullable: bool,
        target: String,
    },
    /// A struct revisited by value through container indirection
    /// (`Vec<Tree>` inside `Tree`); lowered as a recursive call with no
    /// pointer constructor around it.
    ValueCycle { target: String },
}

impl CopyPlanNode {
    /// Whether `clone()` of this subtree already yields an independent copy.
    ///
    /// `Box` and plain `Option` wrappers inherit triviality from their
    /// payload because their `Clone` duplicates the pointee; `Rc`/`Arc`
    /// cloning shares the allocation, so those subtrees always need a
    /// rebuild. Trivial subtrees produce no fix-up statements.
    pub fn is_trivial(&self) -> bool {
        match self {
            Self::DirectAssign | Self::DynamicDispatch => true,
            Self::AllocateAndRecurse { kind, inner, .. } => match kind {
                PointerKind::Rc | PointerKind::Arc => false,
                PointerKind::Boxed | PointerKind::Plain => inner.is_trivial(),
            },
            Self::Elementwise { inner, .. } => inner.is_trivial(),
            Self::Fieldwise { children } => children.iter().all(|(_, child)| child.is_trivial()),
            Self::CycleGuard { .. } | Self::ValueCycle { .. } => false,
        }
    }
}
