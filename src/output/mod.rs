//! Output routing for fetched bodies
//!
//! A step writes its body to at most one file. An explicit `out` path wins
//! over `outdir`; with `outdir` the file name is the basename of the URL that
//! was actually fetched.

use crate::config::StepDescriptor;
use crate::url::basename;
use crate::GetterError;
use std::path::{Path, PathBuf};

/// Where a step's body goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Exact file path from `out`
    File(PathBuf),

    /// `outdir` joined with the basename of the fetched URL
    Directory { dir: PathBuf, file_name: String },
}

impl OutputTarget {
    /// Picks the output target for a step, or `None` when the step saves nothing
    ///
    /// # Arguments
    ///
    /// * `step` - The step being run
    /// * `url` - The URL that was fetched (after joining the propagated value)
    pub fn resolve(step: &StepDescriptor, url: &str) -> Option<Self> {
        if !step.out.is_empty() {
            Some(Self::File(PathBuf::from(&step.out)))
        } else if !step.outdir.is_empty() {
            Some(Self::Directory {
                dir: PathBuf::from(&step.outdir),
                file_name: basename(url).to_string(),
            })
        } else {
            None
        }
    }

    /// The path that will be written
    pub fn path(&self) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Directory { dir, file_name } => dir.join(file_name),
        }
    }
}

/// Writes `body` to the target, replacing any existing file
///
/// Missing directories are not created; writing into one fails with
/// [`GetterError::Output`].
pub fn write_body(target: &OutputTarget, body: &[u8]) -> Result<PathBuf, GetterError> {
    let path = target.path();
    write_file(&path, body)?;
    tracing::info!("Wrote {} bytes to {}", body.len(), path.display());
    Ok(path)
}

fn write_file(path: &Path, body: &[u8]) -> Result<(), GetterError> {
    std::fs::write(path, body).map_err(|source| GetterError::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn step(out: &str, outdir: &str) -> StepDescriptor {
        StepDescriptor {
            out: out.to_string(),
            outdir: outdir.to_string(),
            ..StepDescriptor::new("http://h/x")
        }
    }

    #[test]
    fn test_resolve_none() {
        assert_eq!(OutputTarget::resolve(&step("", ""), "http://h/x"), None);
    }

    #[test]
    fn test_resolve_out_wins_over_outdir() {
        let target = OutputTarget::resolve(&step("page.html", "dl"), "http://h/x").unwrap();
        assert_eq!(target, OutputTarget::File(PathBuf::from("page.html")));
        assert_eq!(target.path(), PathBuf::from("page.html"));
    }

    #[test]
    fn test_resolve_outdir_uses_url_basename() {
        let target =
            OutputTarget::resolve(&step("", "dl"), "http://h/files/app-1.2.tar.gz").unwrap();
        assert_eq!(target.path(), PathBuf::from("dl").join("app-1.2.tar.gz"));
    }

    #[test]
    fn test_write_body_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = OutputTarget::File(dir.path().join("body.bin"));

        write_body(&target, b"first version").unwrap();
        let written = write_body(&target, b"second").unwrap();

        assert_eq!(written, dir.path().join("body.bin"));
        assert_eq!(std::fs::read(&written).unwrap(), b"second");
    }

    #[test]
    fn test_write_body_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = OutputTarget::Directory {
            dir: dir.path().join("missing"),
            file_name: "x".to_string(),
        };

        let err = write_body(&target, b"data").unwrap_err();
        assert!(matches!(err, GetterError::Output { .. }));
    }
}
