//! Prompt loader: plain UTF-8 `*.txt` files with `{placeholder}` templates.

use super::cache::ResourceCache;
use super::directory::ResourceDir;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use structcall_application::ports::resource_store::{ResourceError, ResourceKind};
use structcall_domain::render_template;
use tracing::{debug, error, info, warn};

/// Loads prompt texts, caching them by filename.
///
/// Loaded text is trimmed of surrounding whitespace. An empty prompt is
/// logged but still loaded and cached.
#[derive(Debug)]
pub struct PromptLoader {
    dir: ResourceDir,
    cache: ResourceCache<String>,
}

impl PromptLoader {
    /// Open the prompts directory, creating it when missing.
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        Ok(Self {
            dir: ResourceDir::open(ResourceKind::Prompt, prompts_dir)?,
            cache: ResourceCache::new(),
        })
    }

    pub fn load(&self, filename: &str, use_cache: bool) -> Result<String, ResourceError> {
        if use_cache && let Some(cached) = self.cache.get(filename) {
            debug!("Prompt '{}' loaded from cache", filename);
            return Ok(cached);
        }

        info!("Loading prompt: {}", self.dir.file(filename).display());
        let content = self
            .dir
            .read(filename)
            .inspect_err(|e| {
                if !e.is_not_found() {
                    error!("Error loading prompt '{}': {}", filename, e);
                }
            })?
            .trim()
            .to_string();

        if content.is_empty() {
            warn!("Empty prompt: {}", filename);
        }

        self.cache.insert(filename, content.clone());
        Ok(content)
    }

    /// Load a prompt and substitute its placeholders.
    pub fn format(
        &self,
        filename: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, ResourceError> {
        let template = self.load(filename, true)?;
        render_template(&template, variables).map_err(|e| {
            error!("Cannot format prompt '{}': {}", filename, e);
            ResourceError::from_template(filename, e)
        })
    }

    /// Evict one prompt, or clear the cache when `filename` is `None`.
    pub fn reload(&self, filename: Option<&str>) {
        match filename {
            Some(name) if self.cache.remove(name) => info!("Prompt reloaded: {}", name),
            Some(name) => warn!("Prompt was not in cache: {}", name),
            None => {
                let count = self.cache.clear();
                info!("Prompt cache cleared ({} prompts removed)", count);
            }
        }
    }

    pub fn list(&self) -> Vec<String> {
        self.dir.list()
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.dir.exists(filename)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn directory(&self) -> &Path {
        self.dir.path()
    }
}
