//! Command-line interface definitions for `deepcopy-gen`.

use camino::Utf8PathBuf;
use clap::Parser;
use deepcopy_gen::{
    GenerationOptions, GenerationRequest, InterfaceDep, InterfaceReturn, ReceiverKind, SkipSet,
};

use crate::error::CliError;

/// Parsed CLI arguments for `deepcopy-gen`.
#[derive(Debug, Parser)]
#[command(name = "deepcopy-gen")]
#[command(about = "Generate deep-copy methods for the structs of a package")]
#[command(version)]
pub struct Args {
    /// Struct to generate a copy method for (repeat for multiple types).
    #[arg(long = "type", value_name = "NAME")]
    pub types: Vec<String>,
    /// Comma-separated field paths to copy shallowly. Each occurrence pairs
    /// with the --type at the same position.
    #[arg(long = "skip", value_name = "SEL1,SEL2")]
    pub skips: Vec<String>,
    /// Recursion depth bound; 0 means unbounded.
    #[arg(long = "maxdepth", value_name = "N", default_value_t = 0)]
    pub max_depth: usize,
    /// Name of the generated method.
    #[arg(long, value_name = "NAME", default_value = "deep_copy")]
    pub method: String,
    /// Generate `fn(&self) -> Box<T>` instead of `fn(&self) -> T`.
    #[arg(long = "pointer-receiver")]
    pub pointer_receiver: bool,
    /// Copy into a caller-supplied destination instead of returning.
    #[arg(long = "another-struct")]
    pub another_struct: bool,
    /// Return the copy as `Box<dyn NAME>`.
    #[arg(long = "return-interface", value_name = "NAME")]
    pub return_interface: Option<String>,
    /// Module the return interface lives in, imported into the output.
    #[arg(long = "return-interface-dep", value_name = "NAME")]
    pub return_interface_dep: Option<String>,
    /// Import path for the interface module when it differs from its name.
    #[arg(long = "return-interface-dep-path", value_name = "PATH")]
    pub return_interface_dep_path: Option<String>,
    /// Feature tags emitted as a file-level `#![cfg(...)]` attribute.
    #[arg(long, value_name = "T1,T2", value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Output file; `-` or absent writes to stdout.
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
    /// Enable debug logging.
    #[arg(long, short = 'v')]
    pub verbose: bool,
    /// Package to read: a directory of `.rs` files or a single file.
    #[arg(value_name = "PACKAGE")]
    pub package: Option<Utf8PathBuf>,
}

impl Args {
    /// Validates flag combinations and builds the generation request.
    pub fn to_request(&self) -> Result<GenerationRequest, CliError> {
        if self.types.is_empty() {
            return Err(CliError::NoTypes);
        }
        if self.another_struct && !self.pointer_receiver {
            return Err(CliError::CopyIntoWithoutPointer);
        }
        let skip_sets = self
            .skips
            .iter()
            .map(|raw| SkipSet::compile(&raw.split(',').collect::<Vec<_>>()))
            .collect::<Result<Vec<_>, _>>()?;
        let options = GenerationOptions {
            receiver: if self.pointer_receiver {
                ReceiverKind::Pointer
            } else {
                ReceiverKind::Value
            },
            method: self.method.clone(),
            max_depth: self.max_depth,
            copy_into: self.another_struct,
            return_interface: self.interface_return()?,
            build_tags: self.tags.clone(),
        };
        Ok(GenerationRequest::new(
            self.types.clone(),
            skip_sets,
            options,
        )?)
    }

    fn interface_return(&self) -> Result<Option<InterfaceReturn>, CliError> {
        let Some(name) = &self.return_interface else {
            if self.return_interface_dep.is_some() {
                return Err(CliError::DepWithoutInterface);
            }
            if self.return_interface_dep_path.is_some() {
                return Err(CliError::DepPathWithoutDep);
            }
            return Ok(None);
        };
        let dep = match (&self.return_interface_dep, &self.return_interface_dep_path) {
            (Some(dep), path) => Some(InterfaceDep {
                name: dep.clone(),
                path: path.clone().unwrap_or_else(|| dep.clone()),
            }),
            (None, Some(_)) => return Err(CliError::DepPathWithoutDep),
            (None, None) => None,
        };
        Ok(Some(InterfaceReturn {
            name: name.clone(),
            dep,
        }))
    }
}
