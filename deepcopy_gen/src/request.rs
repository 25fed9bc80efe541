//! Immutable per-run generation request and its construction-time checks.

use crate::error::Error;
use crate::selector::SkipSet;

/// Receiver and return form of the generated method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiverKind {
    /// `fn method(&self) -> T`.
    #[default]
    Value,
    /// `fn method(&self) -> Box<T>`.
    Pointer,
}

/// An interface dependency declared in another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDep {
    /// Alias the import should take.
    pub name: String,
    /// Fully qualified path of the declaring package.
    pub path: String,
}

/// Wraps the return type as a declared trait object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceReturn {
    /// Trait name; the return type becomes `Box<dyn Name>`.
    pub name: String,
    /// Declaring package, when the trait is not local to the target package.
    pub dep: Option<InterfaceDep>,
}

/// Tunable options accompanying the requested type list.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Receiver and return form.
    pub receiver: ReceiverKind,
    /// Name of the generated method.
    pub method: String,
    /// Recursion depth bound; 0 means unbounded.
    pub max_depth: usize,
    /// Append a `target: &mut T` destination parameter. Pointer receiver only.
    pub copy_into: bool,
    /// Wrap the return type as a trait object.
    pub return_interface: Option<InterfaceReturn>,
    /// Feature tags emitted as a file-level `#![cfg(...)]` attribute.
    pub build_tags: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            receiver: ReceiverKind::Value,
            method: "deep_copy".to_owned(),
            max_depth: 0,
            copy_into: false,
            return_interface: None,
            build_tags: Vec::new(),
        }
    }
}

/// Immutable record of one generation run: requested types in order, their
/// positionally aligned skip sets, and the method shape options.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    types: Vec<String>,
    skip_sets: Vec<SkipSet>,
    options: GenerationOptions,
}

impl GenerationRequest {
    /// Validates and freezes a request.
    ///
    /// All configuration invariants are enforced here, before the resolver is
    /// ever consulted: the destination-parameter option requires a pointer
    /// receiver, names must be valid identifiers, and the skip list cannot
    /// outnumber the requested types. Missing trailing skip sets are padded
    /// with empty sets.
    pub fn new(
        types: Vec<String>,
        mut skip_sets: Vec<SkipSet>,
        options: GenerationOptions,
    ) -> Result<Self, Error> {
        if types.is_empty() {
            return Err(Error::Configuration("no requested types".to_owned()));
        }
        for name in &types {
            require_ident(name, "requested type")?;
        }
        require_ident(&options.method, "method name")?;
        if options.copy_into && options.receiver != ReceiverKind::Pointer {
            return Err(Error::Configuration(
                "copy-into destination parameter requires a pointer receiver".to_owned(),
            ));
        }
        if skip_sets.len() > types.len() {
            return Err(Error::Configuration(format!(
                "{} skip sets supplied for {} requested types",
                skip_sets.len(),
                types.len()
            )));
        }
        if let Some(interface) = &options.return_interface {
            require_ident(&interface.name, "return interface")?;
            if let Some(dep) = &interface.dep {
                require_ident(&dep.name, "return interface dependency")?;
                syn::parse_str::<syn::Path>(&dep.path).map_err(|_| {
                    Error::Configuration(format!(
                        "return interface dependency path `{}` is not a valid path",
                        dep.path
                    ))
                })?;
            }
        }
        for tag in &options.build_tags {
            if tag.is_empty() {
                return Err(Error::Configuration("empty build tag".to_owned()));
            }
        }
        skip_sets.resize(types.len(), SkipSet::empty());
        Ok(Self {
            types,
            skip_sets,
            options,
        })
    }

    /// Requested type names, in declaration order.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Skip set aligned with the requested type at `index`.
    pub fn skip_for(&self, index: usize) -> &SkipSet {
        &self.skip_sets[index]
    }

    /// Method shape options.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

fn require_ident(name: &str, what: &str) -> Result<(), Error> {
    syn::parse_str::<syn::Ident>(name)
        .map(|_| ())
        .map_err(|_| Error::Configuration(format!("{what} `{name}` is not a valid identifier")))
}
