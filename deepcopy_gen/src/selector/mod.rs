//! Compilation of shallow-copy override strings into path matchers.
//!
//! A selector is a `.`-delimited field path; a segment is a field name, a
//! tuple index, or the wildcard `*` matching any slice/map/array element.
//! Compilation validates syntax only — whether the path exists in the target
//! type is checked during the walk, where an unmatched selector is reported
//! as a non-fatal warning.

use crate::error::Error;


/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// A literal field name.
    Field(String),
    /// A tuple or tuple-struct position.
    Index(u32),
    /// Any element of a slice, array, or map.
    Wildcard,
}

/// One position in the type graph reached by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment {
    Field(String),
    Index(u32),
    Element,
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
            Self::Element => f.write_str("*"),
        }
    }
}

/// A compiled shallow-copy override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    raw: String,
    segments: Vec<Segment>,
}

impl Selector {
    /// The override string this selector was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn compile(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::SelectorSyntax {
                selector: raw.to_owned(),
                reason: "selector is empty".to_owned(),
            });
        }
        let mut segments = Vec::new();
        for part in raw.split('.') {
            segments.push(Self::compile_segment(raw, part)?);
        }
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    fn compile_segment(raw: &str, part: &str) -> Result<Segment, Error> {
        if part.is_empty() {
            return Err(Error::SelectorSyntax {
                selector: raw.to_owned(),
                reason: "empty path segment".to_owned(),
            });
        }
        if part == "*" {
            return Ok(Segment::Wildcard);
        }
        if part.chars().all(|c| c.is_ascii_digit()) {
            return part.parse().map(Segment::Index).map_err(|_| Error::SelectorSyntax {
                selector: raw.to_owned(),
                reason: format!("index segment `{part}` is out of range"),
            });
        }
        let mut chars = part.chars();
        let leading_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if leading_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Ok(Segment::Field(part.to_owned()));
        }
        Err(Error::SelectorSyntax {
            selector: raw.to_owned(),
            reason: format!("segment `{part}` is not a field name, index, or `*`"),
        })
    }

    fn matches(&self, path: &[PathSegment]) -> bool {
        self.segments.len() == path.len()
            && self.segments.iter().zip(path).all(|(seg, step)| match (seg, step) {
                (Segment::Field(name), PathSegment::Field(field)) => name == field,
                (Segment::Index(index), PathSegment::Index(position)) => index == position,
                (Segment::Wildcard, PathSegment::Element) => true,
                _ => false,
            })
    }
}

/// The set of shallow-copy overrides attached to one requested type.
///
/// Selectors are ordered lexicographically by their raw text so the walk (and
/// therefore the output) is deterministic regardless of the order overrides
/// were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    selectors: Vec<Selector>,
}

impl SkipSet {
    /// Compiles a set of override strings, failing on the first syntactically
    /// invalid selector.
    pub fn compile<S: AsRef<str>>(raw: &[S]) -> Result<Self, Error> {
        let mut selectors = raw
            .iter()
            .map(|s| Selector::compile(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        selectors.sort_by(|a, b| a.raw.cmp(&b.raw));
        selectors.dedup();
        Ok(Self { selectors })
    }

    /// A set with no overrides.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of compiled selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the set contains no selectors.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Raw text of the selector at `index`.
    pub fn raw(&self, index: usize) -> &str {
        self.selectors[index].raw()
    }

    /// Index of the first selector matching `path`, if any.
    pub(crate) fn matches(&self, path: &[PathSegment]) -> Option<usize> {
        self.selectors.iter().position(|s| s.matches(path))
    }
}
