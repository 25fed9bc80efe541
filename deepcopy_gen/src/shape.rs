//! Index-addressed arena of resolved type shapes.
//!
//! Shapes describe the structure of a type independently of runtime values.
//! Mutually recursive types are represented through [`ShapeId`] references
//! into the arena rather than owning links, so construction never cycles and
//! cycle detection during the walk is a membership check over a stack of ids.

use std::collections::HashMap;

use proc_macro2::Span;
use syn::Member;

/// Handle to a shape stored in a [`ShapeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u32);

/// The pointer flavour behind a [`TypeShape::Pointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// `Rc<T>`; cloning shares the allocation.
    Rc,
    /// `Arc<T>`; cloning shares the allocation.
    Arc,
    /// `Box<T>`; cloning already duplicates the pointee.
    Boxed,
    /// `Option<T>` over a non-pointer payload; no allocation of its own.
    Plain,
}

/// Addresses one struct or tuple field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// A named field.
    Name(String),
    /// A positional field of a tuple or tuple struct.
    Index(u32),
}

impl FieldKey {
    /// Converts the key into a `syn::Member` for token emission.
    pub fn to_member(&self) -> Member {
        match self {
            Self::Name(name) => Member::Named(syn::Ident::new(name, Span::call_site())),
            Self::Index(index) => Member::Unnamed(syn::Index::from(*index as usize)),
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// One field of a struct shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name or tuple position.
    pub key: FieldKey,
    /// Shape of the field's type.
    pub shape: ShapeId,
    /// Whether the field carries any visibility modifier. Unexported fields
    /// still participate in copying; the generated method lives in the
    /// declaring package.
    pub exported: bool,
}

/// Structural description of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A scalar or otherwise opaque owned value; `clone()` is a deep copy.
    Basic(String),
    /// A type alias wrapping another shape.
    Named { ident: String, underlying: ShapeId },
    /// A pointer-like wrapper, optionally nil-able through `Option`.
    Pointer {
        kind: PointerKind,
        nullable: bool,
        elem: ShapeId,
    },
    /// An iterable sequence container (`Vec`, `VecDeque`, sets).
    Slice { elem: ShapeId },
    /// A fixed-size array.
    Array { elem: ShapeId },
    /// A keyed map container.
    Map { key: ShapeId, value: ShapeId },
    /// A struct, tuple struct, or tuple with per-field shapes.
    Struct { ident: String, fields: Vec<Field> },
    /// A trait object; the concrete type is unknown at generation time.
    Interface { describes: String },
    /// A shape with no defined copy strategy (references, raw pointers,
    /// function pointers, unseen external types).
    Unsupported { describes: String },
}

/// Arena of interned shapes, keyed by canonical type text.
#[derive(Debug, Default)]
pub struct ShapeArena {
    nodes: Vec<TypeShape>,
    interned: HashMap<String, ShapeId>,
}

impl ShapeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shape behind `id`.
    pub fn get(&self, id: ShapeId) -> &TypeShape {
        &self.nodes[id.0 as usize]
    }

    /// Looks up a previously interned key.
    pub(crate) fn lookup(&self, key: &str) -> Option<ShapeId> {
        self.interned.get(key).copied()
    }

    /// Interns `shape` under `key`, reusing an existing entry when present.
    pub(crate) fn intern(&mut self, key: &str, shape: TypeShape) -> ShapeId {
        if let Some(id) = self.lookup(key) {
            return id;
        }
        let id = self.push(shape);
        self.interned.insert(key.to_owned(), id);
        id
    }

    /// Reserves an id under `key` before its shape is known. Recursive
    /// references created while building the shape resolve to the reserved
    /// id; [`ShapeArena::fill`] completes the entry.
    pub(crate) fn reserve(&mut self, key: &str) -> ShapeId {
        let id = self.push(TypeShape::Unsupported {
            describes: "unresolved placeholder".to_owned(),
        });
        self.interned.insert(key.to_owned(), id);
        id
    }

    /// Completes a reserved entry.
    pub(crate) fn fill(&mut self, id: ShapeId, shape: TypeShape) {
        self.nodes[id.0 as usize] = shape;
    }

    /// Follows `Named` aliases down to the base shape id.
    pub(crate) fn base(&self, mut id: ShapeId) -> ShapeId {
        while let TypeShape::Named { underlying, .. } = self.get(id) {
            id = *underlying;
        }
        id
    }

    fn push(&mut self, shape: TypeShape) -> ShapeId {
        let id = ShapeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(shape);
        id
    }
}
