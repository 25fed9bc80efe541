//! Error types for the `deepcopy-gen` binary.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("at least one --type is required")]
    NoTypes,

    #[error("a package path is required")]
    NoPackage,

    #[error("--another-struct requires --pointer-receiver")]
    CopyIntoWithoutPointer,

    #[error("--return-interface-dep-path requires --return-interface-dep")]
    DepPathWithoutDep,

    #[error("--return-interface-dep requires --return-interface")]
    DepWithoutInterface,

    #[error("failed to create output file {path}: {source}")]
    CreateOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generation(#[from] deepcopy_gen::Error),
}
