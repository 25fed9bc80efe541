//! Tracking of external packages referenced by synthesized code.
//!
//! Every distinct path gets a stable alias; repeated references reuse it and
//! colliding default names get a numeric suffix. Entries keep first-use order
//! so the emitted import block is deterministic.

use proc_macro2::Span;
use syn::Ident;

/// First-use-ordered table of `(alias, package path)` pairs.
#[derive(Debug, Default)]
pub struct DependencyTracker {
    entries: Vec<(String, String)>,
}

impl DependencyTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path`, aliasing it by its last segment.
    pub fn record(&mut self, path: &str) -> Ident {
        let default = path.rsplit("::").next().unwrap_or(path).to_owned();
        self.record_with_alias(path, &default)
    }

    /// Records `path` under a caller-preferred alias.
    pub fn record_with_alias(&mut self, path: &str, preferred: &str) -> Ident {
        if let Some((alias, _)) = self.entries.iter().find(|(_, p)| p == path) {
            return Ident::new(alias, Span::call_site());
        }
        let mut alias = preferred.to_owned();
        let mut counter = 1;
        while self.entries.iter().any(|(a, _)| a == &alias) {
            counter += 1;
            alias = format!("{preferred}{counter}");
        }
        self.entries.push((alias.clone(), path.to_owned()));
        Ident::new(&alias, Span::call_site())
    }

    /// The recorded `(alias, path)` pairs in first-use order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Whether anything was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
