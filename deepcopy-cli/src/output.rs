//! Output sink selection for the generated artifact.

use std::fs::File;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::CliError;

/// Where the generated artifact goes.
pub enum OutputTarget {
    Stdout,
    File(File),
}

impl OutputTarget {
    /// Opens the requested sink. `-` or no path selects stdout; a file path
    /// is created (and truncated) up front so a failed run leaves at most an
    /// empty file.
    pub fn open(path: Option<&Utf8Path>) -> Result<Self, CliError> {
        match path {
            None => Ok(Self::Stdout),
            Some(path) if path.as_str() == "-" => Ok(Self::Stdout),
            Some(path) => {
                let file = File::create(path).map_err(|source| CliError::CreateOutput {
                    path: Utf8PathBuf::from(path),
                    source,
                })?;
                Ok(Self::File(file))
            }
        }
    }

    /// The sink as a writer for the generator.
    pub fn writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Stdout => Box::new(io::stdout().lock()),
            Self::File(file) => Box::new(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use camino::Utf8Path;
    use rstest::rstest;

    use super::OutputTarget;

    #[rstest]
    #[case::absent(None)]
    #[case::dash(Some("-"))]
    fn stdout_is_selected_without_a_file_path(#[case] path: Option<&str>) -> Result<()> {
        let target = OutputTarget::open(path.map(Utf8Path::new))?;
        ensure!(
            matches!(target, OutputTarget::Stdout),
            "expected the stdout sink"
        );
        Ok(())
    }

    #[test]
    fn file_sink_is_created_up_front() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.rs");
        let utf8 = Utf8Path::from_path(&path).ok_or_else(|| anyhow::anyhow!("non-utf8 tempdir"))?;
        let target = OutputTarget::open(Some(utf8))?;
        ensure!(matches!(target, OutputTarget::File(_)), "expected a file sink");
        ensure!(path.exists(), "the file should exist before generation runs");
        Ok(())
    }

    #[test]
    fn missing_parent_directory_fails_to_open() {
        let result = OutputTarget::open(Some(Utf8Path::new("/nonexistent/dir/out.rs")));
        assert!(result.is_err());
    }
}
