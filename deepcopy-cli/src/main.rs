//! CLI entrypoint for `deepcopy-gen`.

mod cli;
mod error;
mod output;

use clap::Parser;
use deepcopy_gen::{Generator, load_package};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Args;
use crate::error::CliError;
use crate::output::OutputTarget;

fn main() -> Result<(), CliError> {
    run()
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let request = args.to_request()?;
    let package_path = args.package.as_deref().ok_or(CliError::NoPackage)?;
    let mut package = load_package(package_path.as_std_path())?;

    let mut target = OutputTarget::open(args.output.as_deref())?;
    let report = Generator::new(request).generate(&mut target.writer(), &mut package)?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
