//! Zip archive sink

use super::traits::{ArtifactTree, OutputResult, OutputSink, SinkLocation};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes the tree as `<dir>/<clean_domain>_<job_id>.zip` (deflate)
#[derive(Debug, Clone)]
pub struct ZipArchiveSink {
    dir: PathBuf,
}

impl ZipArchiveSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the archive path for a tree
    pub fn archive_path(&self, tree: &ArtifactTree) -> PathBuf {
        self.dir.join(format!("{}.zip", tree.name()))
    }
}

impl OutputSink for ZipArchiveSink {
    fn name(&self) -> &str {
        "archive"
    }

    fn deliver(&self, tree: &ArtifactTree) -> OutputResult<SinkLocation> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.archive_path(tree);

        let file = File::create(&path)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for relative in tree.files()? {
            zip.start_file(entry_name(&relative), options)?;
            let contents = std::fs::read(tree.root.join(&relative))?;
            zip.write_all(&contents)?;
        }

        zip.finish()?.flush()?;

        tracing::debug!("Wrote archive {}", path.display());
        Ok(SinkLocation::Archive(path))
    }
}

/// Zip entry names always use `/` separators
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
