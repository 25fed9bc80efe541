//! Depth-first walk of a type's shape graph into a copy plan.
//!
//! The walk carries the current selector path, an ancestor stack of shape ids
//! for cycle detection, and the allocation-depth counter. Check order at each
//! node: selector match, then the depth bound, then the ancestor stack, then
//! dispatch on the shape kind. Depth counts pointer and nested-struct
//! crossings only; container wrappers and aliases are free.

use std::collections::HashSet;

use crate::error::{Error, Warning};
use crate::plan::{ContainerKind, CopyPlanNode};
use crate::request::GenerationRequest;
use crate::selector::{PathSegment, SkipSet};
use crate::shape::{FieldKey, PointerKind, ShapeArena, ShapeId, TypeShape};


/// Builds the copy plan for one requested type.
pub fn walk_type(
    arena: &ShapeArena,
    root: ShapeId,
    type_name: &str,
    skip: &SkipSet,
    request: &GenerationRequest,
) -> Result<(CopyPlanNode, Vec<Warning>), Error> {
    let mut walker = Walker {
        arena,
        skip,
        type_name,
        max_depth: request.options().max_depth,
        interface_return: request.options().return_interface.is_some(),
        path: Vec::new(),
        ancestors: Vec::new(),
        used: HashSet::new(),
        warnings: Vec::new(),
    };
    let base = arena.base(root);
    let TypeShape::Struct { fields, .. } = arena.get(base) else {
        return Err(Error::NotAStruct(type_name.to_owned()));
    };
    walker.ancestors.push(base);
    let mut children = Vec::new();
    for field in fields {
        walker.path.push(path_segment(&field.key));
        let child = walker.node(field.shape, 1)?;
        walker.path.pop();
        children.push((field.key.clone(), child));
    }
    walker.ancestors.pop();

    let plan = CopyPlanNode::Fieldwise { children };
    tracing::debug!(type_name, "built copy plan");
    let mut warnings = walker.warnings;
    for index in 0..skip.len() {
        if !walker.used.contains(&index) {
            warnings.push(Warning::UnusedSelector {
                selector: skip.raw(index).to_owned(),
                type_name: type_name.to_owned(),
            });
        }
    }
    Ok((plan, warnings))
}

struct Walker<'a> {
    arena: &'a ShapeArena,
    skip: &'a SkipSet,
    type_name: &'a str,
    max_depth: usize,
    interface_return: bool,
    path: Vec<PathSegment>,
    ancestors: Vec<ShapeId>,
    used: HashSet<usize>,
    warnings: Vec<Warning>,
}

impl Walker<'_> {
    fn node(&mut self, id: ShapeId, depth: usize) -> Result<CopyPlanNode, Error> {
        if let Some(index) = self.skip.matches(&self.path) {
            self.used.insert(index);
            return Ok(CopyPlanNode::DirectAssign);
        }
        match self.arena.get(id) {
            TypeShape::Basic(_) => Ok(CopyPlanNode::DirectAssign),
            TypeShape::Named { underlying, .. } => self.node(*underlying, depth),
            TypeShape::Interface { .. } => Ok(CopyPlanNode::DynamicDispatch),
            TypeShape::Unsupported { describes } => {
                self.warnings.push(Warning::UnsupportedShape {
                    path: self.path_text(),
                    describes: describes.clone(),
                });
                Ok(CopyPlanNode::DirectAssign)
            }
            TypeShape::Pointer {
                kind: PointerKind::Plain,
                elem,
                ..
            } => {
                let inner = self.node(*elem, depth)?;
                Ok(CopyPlanNode::AllocateAndRecurse {
                    kind: PointerKind::Plain,
                    nullable: true,
                    inner: Box::new(inner),
                })
            }
            TypeShape::Pointer {
                kind,
                nullable,
                elem,
            } => self.pointer(*kind, *nullable, *elem, depth),
            TypeShape::Slice { elem } => self.elementwise(ContainerKind::Seq, *elem, depth),
            TypeShape::Array { elem } => self.elementwise(ContainerKind::Array, *elem, depth),
            TypeShape::Map { value, .. } => self.elementwise(ContainerKind::Map, *value, depth),
            TypeShape::Struct { ident, fields } => {
                if self.exhausted(depth) {
                    return Ok(CopyPlanNode::DirectAssign);
                }
                if self.ancestors.contains(&id) {
                    // Reached by value through container indirection, so the
                    // recursion has no pointer to rebuild around.
                    if self.interface_return {
                        self.warnings.push(Warning::CycleThroughInterface {
                            path: self.path_text(),
                        });
                        return Ok(CopyPlanNode::DirectAssign);
                    }
                    return Ok(CopyPlanNode::ValueCycle {
                        target: ident.clone(),
                    });
                }
                self.ancestors.push(id);
                let mut children = Vec::new();
                for field in fields {
                    self.path.push(path_segment(&field.key));
                    let child = self.node(field.shape, depth + 1);
                    self.path.pop();
                    children.push((field.key.clone(), child?));
                }
                self.ancestors.pop();
                Ok(CopyPlanNode::Fieldwise { children })
            }
        }
    }

    fn pointer(
        &mut self,
        kind: PointerKind,
        nullable: bool,
        elem: ShapeId,
        depth: usize,
    ) -> Result<CopyPlanNode, Error> {
        if self.exhausted(depth) {
            return Ok(CopyPlanNode::DirectAssign);
        }
        let base = self.arena.base(elem);
        if self.ancestors.contains(&base) {
            if self.interface_return {
                // The recursive call would return the interface type, not the
                // concrete type the field needs.
                self.warnings.push(Warning::CycleThroughInterface {
                    path: self.path_text(),
                });
                return Ok(CopyPlanNode::DirectAssign);
            }
            let target = match self.arena.get(base) {
                TypeShape::Struct { ident, .. } => ident.clone(),
                other => {
                    return Err(Error::Internal(format!(
                        "cycle through a non-struct shape: {other:?}"
                    )));
                }
            };
            return Ok(CopyPlanNode::CycleGuard {
                kind,
                nullable,
                target,
            });
        }
        let inner = self.node(elem, depth + 1)?;
        Ok(CopyPlanNode::AllocateAndRecurse {
            kind,
            nullable,
            inner: Box::new(inner),
        })
    }

    fn elementwise(
        &mut self,
        container: ContainerKind,
        elem: ShapeId,
        depth: usize,
    ) -> Result<CopyPlanNode, Error> {
        self.path.push(PathSegment::Element);
        let inner = self.node(elem, depth);
        self.path.pop();
        Ok(CopyPlanNode::Elementwise {
            container,
            inner: Box::new(inner?),
        })
    }

    fn exhausted(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }

    fn path_text(&self) -> String {
        let mut text = self.type_name.to_owned();
        for segment in &self.path {
            text.push('.');
            text.push_str(&segment.to_string());
        }
        text
    }
}

fn path_segment(key: &FieldKey) -> PathSegment {
    match key {
        FieldKey::Name(name) => PathSegment::Field(name.clone()),
        FieldKey::Index(index) => PathSegment::Index(*index),
    }
}
