//! Generation orchestration: validate, resolve, walk, synthesize, emit.

use std::io::Write;

use crate::deps::DependencyTracker;
use crate::emit;
use crate::error::{Error, Warning};
use crate::request::GenerationRequest;
use crate::resolve::ResolvedPackage;
use crate::synth::Synthesizer;
use crate::walk::walk_type;


/// Outcome of a successful run: the non-fatal findings gathered on the way.
#[derive(Debug, Default)]
pub struct Report {
    /// Warnings in discovery order.
    pub warnings: Vec<Warning>,
}

/// Drives one generation run over a resolved package.
#[derive(Debug)]
pub struct Generator {
    request: GenerationRequest,
}

impl Generator {
    /// Creates a generator for an already validated request.
    pub fn new(request: GenerationRequest) -> Self {
        Self { request }
    }

    /// The request this generator runs.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Generates copy methods for every requested type, in request order,
    /// writing the artifact to `out` only after all of them succeed. A
    /// failure at any stage aborts the run with the first error and leaves
    /// the sink untouched.
    pub fn generate(
        &self,
        out: &mut dyn Write,
        package: &mut ResolvedPackage,
    ) -> Result<Report, Error> {
        let options = self.request.options();
        let mut deps = DependencyTracker::new();
        let mut budget = 0;
        let mut impls = Vec::new();
        let mut warnings = Vec::new();

        for (index, name) in self.request.types().iter().enumerate() {
            let shape = package.requested_shape(name)?;
            let skip = self.request.skip_for(index);
            let (plan, mut found) = walk_type(package.arena(), shape, name, skip, &self.request)?;
            warnings.append(&mut found);
            let statements =
                Synthesizer::new(options, &mut deps, &mut budget).fixups(&plan)?;
            impls.push(emit::render_method(name, &statements, options, &mut deps));
        }

        let text = emit::render_file(&impls, options, &deps)?;
        // The report is the reporting channel; callers decide how to surface it.
        for warning in &warnings {
            tracing::debug!(%warning, "generation warning");
        }
        out.write_all(text.as_bytes())?;
        Ok(Report { warnings })
    }
}
