//! A resource subtree on disk.

use std::fs;
use std::path::{Path, PathBuf};
use structcall_application::ports::resource_store::{ResourceError, ResourceKind};
use tracing::{debug, info, warn};

/// Directory holding one kind of resource file.
#[derive(Debug, Clone)]
pub struct ResourceDir {
    kind: ResourceKind,
    path: PathBuf,
}

impl ResourceDir {
    /// Open `path`, creating it (empty) when missing.
    pub fn open(kind: ResourceKind, path: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        let path = path.into();
        if !path.exists() {
            warn!("{} directory not found: {}", kind, path.display());
            fs::create_dir_all(&path).map_err(|source| ResourceError::Io {
                path: path.clone(),
                source,
            })?;
            info!("Directory created: {}", path.display());
        }
        Ok(Self { kind, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Disk check, independent of any cache.
    pub fn exists(&self, name: &str) -> bool {
        self.file(name).exists()
    }

    /// Read a file as UTF-8, mapping a missing file to `NotFound`.
    pub fn read(&self, name: &str) -> Result<String, ResourceError> {
        let path = self.file(name);
        if !path.exists() {
            return Err(ResourceError::NotFound {
                kind: self.kind,
                path,
            });
        }
        fs::read_to_string(&path).map_err(|source| ResourceError::Io { path, source })
    }

    /// Filenames with this kind's extension, sorted. Reflects the current
    /// disk state, not the cache.
    pub fn list(&self) -> Vec<String> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.path.to_string_lossy()),
            self.kind.extension()
        );
        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Invalid glob pattern {}: {}", pattern, e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }
}
