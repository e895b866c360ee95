use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

use crate::utils::validation::object_stem;

/// Per-invocation scratch directory, removed with everything in it when dropped.
///
/// The directory name starts with the sanitised base name of the object being processed.
/// `tempfile` appends a random suffix, so two invocations for the same object never share
/// a directory.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(root: &Path, object_name: &str) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;

        let prefix = format!("{}-", sanitize(object_stem(object_name)));
        let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(root)?;
        let path = dir.path().to_path_buf();

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Removes the directory now and logs the result.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => info!("🧹 Cleaned up local files in {}", self.path.display()),
            Err(e) => warn!(
                "⚠️  Failed to remove scratch directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}

fn sanitize(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
