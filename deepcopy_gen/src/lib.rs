//! Build-time deep-copy method generation for Rust packages.
//!
//! Given a package (a directory of `.rs` files or a single file) and a list
//! of named struct types, `deepcopy_gen` emits one deep-copy method per type
//! as compilable source text, with no runtime reflection. The walk over each
//! type's shape decides, per field, container element, map entry, pointer,
//! and trait-object value, whether to allocate-and-recurse or shallow-assign;
//! user-supplied selectors force shallow copies for chosen paths, recursion
//! depth can be bounded, and self-referential types are handled through
//! cycle guards that recurse via the generated method itself.
//!
//! ```no_run
//! use deepcopy_gen::{GenerationOptions, GenerationRequest, Generator};
//!
//! # fn main() -> Result<(), deepcopy_gen::Error> {
//! let mut package = deepcopy_gen::load_package(std::path::Path::new("src/model"))?;
//! let request = GenerationRequest::new(
//!     vec!["Node".to_owned()],
//!     Vec::new(),
//!     GenerationOptions::default(),
//! )?;
//! let mut out = Vec::new();
//! let report = Generator::new(request).generate(&mut out, &mut package)?;
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod deps;
mod emit;
pub mod error;
pub mod generate;
pub mod plan;
pub mod request;
pub mod resolve;
pub mod selector;
pub mod shape;
mod synth;
pub mod walk;

pub use error::{Error, Warning};
pub use generate::{Generator, Report};
pub use request::{
    GenerationOptions, GenerationRequest, InterfaceDep, InterfaceReturn, ReceiverKind,
};
pub use resolve::{ResolvedPackage, load_package, package_from_source};
pub use selector::SkipSet;
