//! Error and warning taxonomy for the generation pipeline.
//!
//! Every stage returns a typed failure up to the [`Generator`], which stops at
//! the first fatal error. Non-fatal findings accumulate as [`Warning`] values
//! and are reported alongside a successful result.
//!
//! [`Generator`]: crate::Generator

use thiserror::Error;

/// Fatal errors surfaced by the generation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid combination of request options, detected before the resolver
    /// is consulted.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The package path could not be read or parsed.
    #[error("failed to load package at '{path}': {message}")]
    PackageLoad { path: String, message: String },

    /// The package path named no Rust sources at all.
    #[error("no package found at '{0}'")]
    NoPackage(String),

    /// A requested type is absent from the resolved package.
    #[error("requested type `{0}` was not found in the package")]
    UnknownType(String),

    /// A requested type resolves to something other than a struct.
    #[error("requested type `{0}` does not resolve to a struct")]
    NotAStruct(String),

    /// A requested type carries generic parameters.
    #[error("requested type `{0}` has generic parameters, which are not supported")]
    GenericType(String),

    /// A bare identifier in a field type has no declaration in the package.
    #[error("type `{ident}` referenced by `{context}` could not be resolved")]
    UnresolvedType { ident: String, context: String },

    /// A shallow-copy selector failed to compile.
    #[error("invalid shallow-copy selector `{selector}`: {reason}")]
    SelectorSyntax { selector: String, reason: String },

    /// The output sink rejected the generated text.
    #[error("failed to write generated output: {0}")]
    Output(#[from] std::io::Error),

    /// An internal invariant was violated; generation is aborted rather than
    /// emitting suspect output.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Non-fatal findings gathered while walking and synthesizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// A syntactically valid selector matched nothing during the walk.
    #[error("selector `{selector}` did not match anything in `{type_name}`")]
    UnusedSelector { selector: String, type_name: String },

    /// A shape with no defined copy strategy degraded to a shallow copy.
    #[error("no copy strategy for {describes} at `{path}`; falling back to a shallow copy")]
    UnsupportedShape { path: String, describes: String },

    /// A recursive reference cannot call through an interface-typed return.
    #[error("cycle at `{path}` cannot recurse through an interface return; falling back to a shallow copy")]
    CycleThroughInterface { path: String },
}
