//! The syn front end: loads a package and resolves type shapes.
//!
//! A package is a directory of `.rs` files (read in sorted name order so
//! resolution is deterministic) or a single file. Declarations are collected
//! by identifier, including those inside inline modules; shape construction
//! happens on demand per requested type and interns every shape in the arena
//! by canonical type text, reserving ids ahead of recursive references so
//! mutually recursive types resolve without cycling.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use quote::ToTokens;

use crate::error::Error;
use crate::shape::{Field, FieldKey, PointerKind, ShapeArena, ShapeId, TypeShape};

#[cfg(test)]
mod tests;

/// Primitive scalar names treated as `Basic` shapes.
const PRIMITIVES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32",
    "f64", "bool", "char",
];

/// Well-known owned std types whose `clone()` is a deep copy.
const KNOWN_BASICS: &[&str] = &[
    "String", "PathBuf", "OsString", "Duration", "Instant", "SystemTime", "IpAddr", "Ipv4Addr",
    "Ipv6Addr", "SocketAddr",
];

/// Sequence containers copied elementwise through `iter()`/`collect()`.
const SEQUENCE_CONTAINERS: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];

/// A loaded package with its declarations and shape arena.
#[derive(Debug)]
pub struct ResolvedPackage {
    origin: String,
    arena: ShapeArena,
    structs: HashMap<String, syn::ItemStruct>,
    aliases: HashMap<String, syn::ItemType>,
    enums: HashSet<String>,
}

/// Loads the package at `path`: a directory of `.rs` files or one file.
pub fn load_package(path: &Path) -> Result<ResolvedPackage, Error> {
    let origin = path.display().to_string();
    let mut sources = Vec::new();
    if path.is_dir() {
        let mut files: Vec<_> = fs::read_dir(path)
            .map_err(|err| load_error(&origin, &err.to_string()))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
            .collect();
        files.sort();
        for file in files {
            let text = fs::read_to_string(&file)
                .map_err(|err| load_error(&file.display().to_string(), &err.to_string()))?;
            sources.push((file.display().to_string(), text));
        }
        if sources.is_empty() {
            return Err(Error::NoPackage(origin));
        }
    } else if path.is_file() {
        let text =
            fs::read_to_string(path).map_err(|err| load_error(&origin, &err.to_string()))?;
        sources.push((origin.clone(), text));
    } else {
        return Err(Error::NoPackage(origin));
    }

    let mut package = ResolvedPackage::empty(origin);
    for (name, text) in sources {
        let file = syn::parse_file(&text).map_err(|err| load_error(&name, &err.to_string()))?;
        package.collect(file.items);
    }
    Ok(package)
}

/// Builds a single-file package from in-memory source text.
pub fn package_from_source(source: &str) -> Result<ResolvedPackage, Error> {
    let file = syn::parse_file(source)
        .map_err(|err| load_error("<source>", &err.to_string()))?;
    let mut package = ResolvedPackage::empty("<source>".to_owned());
    package.collect(file.items);
    Ok(package)
}

fn load_error(path: &str, message: &str) -> Error {
    Error::PackageLoad {
        path: path.to_owned(),
        message: message.to_owned(),
    }
}

impl ResolvedPackage {
    fn empty(origin: String) -> Self {
        Self {
            origin,
            arena: ShapeArena::new(),
            structs: HashMap::new(),
            aliases: HashMap::new(),
            enums: HashSet::new(),
        }
    }

    fn collect(&mut self, items: Vec<syn::Item>) {
        for item in items {
            match item {
                syn::Item::Struct(s) => {
                    self.structs.insert(s.ident.to_string(), s);
                }
                syn::Item::Enum(e) => {
                    self.enums.insert(e.ident.to_string());
                }
                syn::Item::Type(t) => {
                    self.aliases.insert(t.ident.to_string(), t);
                }
                syn::Item::Mod(m) => {
                    if let Some((_, nested)) = m.content {
                        self.collect(nested);
                    }
                }
                _ => {}
            }
        }
    }

    /// Path or marker this package was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The shape arena backing this package.
    pub fn arena(&self) -> &ShapeArena {
        &self.arena
    }

    /// Resolves a requested type name, enforcing that it is a struct or an
    /// alias whose underlying shape is a struct.
    pub fn requested_shape(&mut self, name: &str) -> Result<ShapeId, Error> {
        if let Some(decl) = self.structs.get(name) {
            if !decl.generics.params.is_empty() {
                return Err(Error::GenericType(name.to_owned()));
            }
            return self.named_shape(name);
        }
        if self.aliases.contains_key(name) {
            let id = self.named_shape(name)?;
            let base = self.arena.base(id);
            return match self.arena.get(base) {
                TypeShape::Struct { .. } => Ok(id),
                _ => Err(Error::NotAStruct(name.to_owned())),
            };
        }
        if self.enums.contains(name) {
            return Err(Error::NotAStruct(name.to_owned()));
        }
        Err(Error::UnknownType(name.to_owned()))
    }

    /// Shape of a declared struct or alias, building it on first use.
    fn named_shape(&mut self, name: &str) -> Result<ShapeId, Error> {
        if let Some(id) = self.arena.lookup(name) {
            return Ok(id);
        }
        if let Some(decl) = self.structs.get(name).cloned() {
            let id = self.arena.reserve(name);
            let mut fields = Vec::new();
            for (index, field) in decl.fields.iter().enumerate() {
                let key = match &field.ident {
                    Some(ident) => FieldKey::Name(ident.to_string()),
                    None => FieldKey::Index(u32::try_from(index).unwrap_or(u32::MAX)),
                };
                let shape = self.type_shape(&field.ty, name)?;
                let exported = !matches!(field.vis, syn::Visibility::Inherited);
                fields.push(Field {
                    key,
                    shape,
                    exported,
                });
            }
            self.arena.fill(
                id,
                TypeShape::Struct {
                    ident: name.to_owned(),
                    fields,
                },
            );
            return Ok(id);
        }
        if let Some(alias) = self.aliases.get(name).cloned() {
            let id = self.arena.reserve(name);
            let underlying = self.type_shape(&alias.ty, name)?;
            self.arena.fill(
                id,
                TypeShape::Named {
                    ident: name.to_owned(),
                    underlying,
                },
            );
            return Ok(id);
        }
        Err(Error::UnresolvedType {
            ident: name.to_owned(),
            context: self.origin.clone(),
        })
    }

    /// Shape of an arbitrary field type. `context` names the declaring type
    /// for error reporting.
    fn type_shape(&mut self, ty: &syn::Type, context: &str) -> Result<ShapeId, Error> {
        let text = type_text(ty);
        if let Some(id) = self.arena.lookup(&text) {
            return Ok(id);
        }
        let shape = match ty {
            syn::Type::Paren(inner) => return self.type_shape(&inner.elem, context),
            syn::Type::Group(inner) => return self.type_shape(&inner.elem, context),
            syn::Type::Path(path) if path.qself.is_none() => {
                return self.path_shape(path, &text, context);
            }
            syn::Type::Array(array) => TypeShape::Array {
                elem: self.type_shape(&array.elem, context)?,
            },
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeShape::Basic(text.clone()),
            syn::Type::Tuple(tuple) => {
                let mut fields = Vec::new();
                for (index, elem) in tuple.elems.iter().enumerate() {
                    fields.push(Field {
                        key: FieldKey::Index(u32::try_from(index).unwrap_or(u32::MAX)),
                        shape: self.type_shape(elem, context)?,
                        exported: true,
                    });
                }
                TypeShape::Struct {
                    ident: text.clone(),
                    fields,
                }
            }
            syn::Type::TraitObject(_) => TypeShape::Interface {
                describes: text.clone(),
            },
            syn::Type::Reference(_) => TypeShape::Unsupported {
                describes: format!("reference `{text}`"),
            },
            syn::Type::Ptr(_) => TypeShape::Unsupported {
                describes: format!("raw pointer `{text}`"),
            },
            syn::Type::BareFn(_) => TypeShape::Unsupported {
                describes: format!("function pointer `{text}`"),
            },
            _ => TypeShape::Unsupported {
                describes: format!("type `{text}`"),
            },
        };
        Ok(self.arena.intern(&text, shape))
    }

    /// Shape of a path type: known containers and pointers by their final
    /// segment, primitives and known std scalars, then local declarations.
    fn path_shape(
        &mut self,
        path: &syn::TypePath,
        text: &str,
        context: &str,
    ) -> Result<ShapeId, Error> {
        let segment = path
            .path
            .segments
            .last()
            .ok_or_else(|| Error::Internal(format!("empty type path `{text}`")))?;
        let ident = segment.ident.to_string();

        if let Some(shape) = self.container_shape(&ident, segment, text, context)? {
            return Ok(shape);
        }
        if PRIMITIVES.contains(&ident.as_str()) || KNOWN_BASICS.contains(&ident.as_str()) {
            return Ok(self.arena.intern(text, TypeShape::Basic(text.to_owned())));
        }
        if path.path.segments.len() > 1 {
            // A qualified external type the one-package resolver cannot see;
            // degrades to a shallow clone with a warning during the walk.
            let shape = TypeShape::Unsupported {
                describes: format!("external type `{text}`"),
            };
            return Ok(self.arena.intern(text, shape));
        }
        if !segment.arguments.is_none() {
            let shape = TypeShape::Unsupported {
                describes: format!("generic type `{text}`"),
            };
            return Ok(self.arena.intern(text, shape));
        }
        if let Some(decl) = self.structs.get(&ident) {
            if !decl.generics.params.is_empty() {
                let shape = TypeShape::Unsupported {
                    describes: format!("generic type `{text}`"),
                };
                return Ok(self.arena.intern(text, shape));
            }
            return self.named_shape(&ident);
        }
        if self.aliases.contains_key(&ident) {
            return self.named_shape(&ident);
        }
        if self.enums.contains(&ident) {
            // Enum fields clone as opaque owned values.
            return Ok(self.arena.intern(text, TypeShape::Basic(text.to_owned())));
        }
        Err(Error::UnresolvedType {
            ident,
            context: context.to_owned(),
        })
    }

    /// Recognizes pointer and container wrappers by segment name.
    fn container_shape(
        &mut self,
        ident: &str,
        segment: &syn::PathSegment,
        text: &str,
        context: &str,
    ) -> Result<Option<ShapeId>, Error> {
        let shape = match ident {
            "Option" => {
                let Some(inner) = first_type_arg(segment) else {
                    return Ok(None);
                };
                match pointer_payload(inner) {
                    Some((kind, payload)) => {
                        if let syn::Type::TraitObject(_) = strip_wrappers(payload) {
                            TypeShape::Interface {
                                describes: text.to_owned(),
                            }
                        } else {
                            TypeShape::Pointer {
                                kind,
                                nullable: true,
                                elem: self.type_shape(payload, context)?,
                            }
                        }
                    }
                    None => TypeShape::Pointer {
                        kind: PointerKind::Plain,
                        nullable: true,
                        elem: self.type_shape(inner, context)?,
                    },
                }
            }
            "Rc" | "Arc" | "Box" => {
                let Some(inner) = first_type_arg(segment) else {
                    return Ok(None);
                };
                if let syn::Type::TraitObject(_) = strip_wrappers(inner) {
                    TypeShape::Interface {
                        describes: text.to_owned(),
                    }
                } else {
                    TypeShape::Pointer {
                        kind: pointer_kind(ident),
                        nullable: false,
                        elem: self.type_shape(inner, context)?,
                    }
                }
            }
            _ if SEQUENCE_CONTAINERS.contains(&ident) => {
                let Some(inner) = first_type_arg(segment) else {
                    return Ok(None);
                };
                TypeShape::Slice {
                    elem: self.type_shape(inner, context)?,
                }
            }
            "HashMap" | "BTreeMap" => {
                let args = type_args(segment);
                let [key, value] = args.as_slice() else {
                    return Ok(None);
                };
                TypeShape::Map {
                    key: self.type_shape(key, context)?,
                    value: self.type_shape(value, context)?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(self.arena.intern(text, shape)))
    }
}

fn pointer_kind(ident: &str) -> PointerKind {
    match ident {
        "Rc" => PointerKind::Rc,
        "Arc" => PointerKind::Arc,
        _ => PointerKind::Boxed,
    }
}

/// If `ty` is `Rc<T>`, `Arc<T>`, or `Box<T>`, returns the kind and `T`.
fn pointer_payload(ty: &syn::Type) -> Option<(PointerKind, &syn::Type)> {
    let syn::Type::Path(path) = strip_wrappers(ty) else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let ident = segment.ident.to_string();
    if !matches!(ident.as_str(), "Rc" | "Arc" | "Box") {
        return None;
    }
    first_type_arg(segment).map(|inner| (pointer_kind(&ident), inner))
}

fn strip_wrappers(mut ty: &syn::Type) -> &syn::Type {
    loop {
        match ty {
            syn::Type::Paren(inner) => ty = &inner.elem,
            syn::Type::Group(inner) => ty = &inner.elem,
            _ => return ty,
        }
    }
}

fn first_type_arg(segment: &syn::PathSegment) -> Option<&syn::Type> {
    type_args(segment).first().copied()
}

fn type_args(segment: &syn::PathSegment) -> Vec<&syn::Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn type_text(ty: &syn::Type) -> String {
    ty.to_token_stream().to_string()
}
