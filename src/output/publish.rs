//! Publish directory sink
//!
//! Copies the artifact tree to `<publish_dir>/<clean_domain>/`, replacing any
//! earlier copy for the same domain. The copy is staged next to the target
//! and swapped in once complete. Swaps into the same target are serialized
//! across the whole process, so concurrent jobs for one domain each land a
//! complete copy and the last one wins.

use super::traits::{ArtifactTree, OutputResult, OutputSink, SinkLocation};
use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// One lock per publish target
static TARGET_LOCKS: OnceLock<DashMap<PathBuf, Arc<Mutex<()>>>> = OnceLock::new();

fn target_lock(target: &Path) -> Arc<Mutex<()>> {
    let locks = TARGET_LOCKS.get_or_init(DashMap::new);
    let entry = locks.entry(target.to_path_buf()).or_default();
    Arc::clone(entry.value())
}

/// Returns the public URL of a domain's published tree, ending in `/`
///
/// ```
/// use schema_crawler::output::publish_url;
///
/// assert_eq!(
///     publish_url("http://localhost:8000/cdn/", "example.com"),
///     "http://localhost:8000/cdn/example.com/"
/// );
/// ```
pub fn publish_url(base_url: &str, clean_domain: &str) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), clean_domain)
}

/// Sink that maintains one served copy per domain
#[derive(Debug, Clone)]
pub struct PublishSink {
    dir: PathBuf,
    base_url: String,
}

impl PublishSink {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }
}

impl OutputSink for PublishSink {
    fn name(&self) -> &str {
        "publish"
    }

    fn deliver(&self, tree: &ArtifactTree) -> OutputResult<SinkLocation> {
        fs::create_dir_all(&self.dir)?;

        let target = self.dir.join(&tree.clean_domain);
        let staging = self.dir.join(format!(".{}.staging", tree.name()));
        let retired = self.dir.join(format!(".{}.retired", tree.name()));

        remove_if_present(&staging)?;
        copy_tree(tree, &staging)?;

        let lock = target_lock(&target);
        {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

            remove_if_present(&retired)?;
            if target.exists() {
                fs::rename(&target, &retired)?;
            }
            fs::rename(&staging, &target)?;
        }
        remove_if_present(&retired)?;

        tracing::debug!("Published {} to {}", tree.name(), target.display());
        Ok(SinkLocation::Published {
            dir: target,
            url: publish_url(&self.base_url, &tree.clean_domain),
        })
    }
}

fn remove_if_present(dir: &Path) -> OutputResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn copy_tree(tree: &ArtifactTree, dest: &Path) -> OutputResult<()> {
    fs::create_dir_all(dest)?;
    for relative in tree.files()? {
        let to = dest.join(&relative);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(tree.root.join(&relative), to)?;
    }
    Ok(())
}
