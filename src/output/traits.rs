//! Output sink traits and types
//!
//! This module defines the trait interface for output sinks and the artifact
//! tree they receive.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during packaging
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Output sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A fully written artifact tree for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTree {
    /// Directory holding every artifact file
    pub root: PathBuf,

    /// Filesystem-safe form of the crawled domain
    pub clean_domain: String,

    pub job_id: String,
}

impl ArtifactTree {
    /// Returns `<clean_domain>_<job_id>`, the tree's directory name
    pub fn name(&self) -> String {
        format!("{}_{}", self.clean_domain, self.job_id)
    }

    /// Lists every file in the tree as paths relative to the root, sorted
    pub fn files(&self) -> OutputResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        collect_files(&self.root, Path::new(""), &mut files)?;
        files.sort();
        Ok(files)
    }
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> OutputResult<()> {
    for entry in fs::read_dir(root.join(relative))? {
        let entry = entry?;
        let path = relative.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            collect_files(root, &path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Where a sink delivered the artifact tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkLocation {
    /// A single archive file
    Archive(PathBuf),

    /// A served directory and the public URL it is reachable at
    Published { dir: PathBuf, url: String },
}

/// Trait for output sinks
///
/// A sink receives a complete artifact tree and delivers it somewhere.
/// Implementations run on a blocking thread and must be thread-safe.
pub trait OutputSink: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Delivers the tree
    ///
    /// # Returns
    ///
    /// * `Ok(SinkLocation)` - Where the tree now lives
    /// * `Err(OutputError)` - Delivery failed; the job fails with it
    fn deliver(&self, tree: &ArtifactTree) -> OutputResult<SinkLocation>;
}

/// Writes a file, naming the path in any error
pub(crate) fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> OutputResult<()> {
    fs::write(path, contents)
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tree_name() {
        let tree = ArtifactTree {
            root: PathBuf::from("/tmp/x"),
            clean_domain: "example.com".to_string(),
            job_id: "abc".to_string(),
        };
        assert_eq!(tree.name(), "example.com_abc");
    }

    #[test]
    fn test_tree_files_sorted_and_relative() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "c").unwrap();

        let tree = ArtifactTree {
            root: dir.path().to_path_buf(),
            clean_domain: "example.com".to_string(),
            job_id: "abc".to_string(),
        };

        assert_eq!(
            tree.files().unwrap(),
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.json"),
                PathBuf::from("nested").join("c.txt"),
            ]
        );
    }

    #[test]
    fn test_write_file_error_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("file.json");

        let err = write_file(&path, "{}").unwrap_err();
        assert!(err.to_string().contains("file.json"));
    }
}
