//! Tools loader: UTF-8 `*.json` tool-schema documents.

use super::cache::ResourceCache;
use super::directory::ResourceDir;
use serde_json::Value;
use std::path::{Path, PathBuf};
use structcall_application::ports::resource_store::{ResourceError, ResourceKind};
use structcall_domain::ToolDefinition;
use tracing::{debug, error, info, warn};

/// Loads parsed tool-schema documents, caching them by filename.
///
/// A file that is not valid JSON fails with `SchemaDecode` and is never
/// cached.
#[derive(Debug)]
pub struct ToolsLoader {
    dir: ResourceDir,
    cache: ResourceCache<Value>,
}

impl ToolsLoader {
    /// Open the tools directory, creating it when missing.
    pub fn new(tools_dir: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        Ok(Self {
            dir: ResourceDir::open(ResourceKind::Tools, tools_dir)?,
            cache: ResourceCache::new(),
        })
    }

    pub fn load(&self, filename: &str, use_cache: bool) -> Result<Value, ResourceError> {
        if use_cache && let Some(cached) = self.cache.get(filename) {
            debug!("Tools '{}' loaded from cache", filename);
            return Ok(cached);
        }

        info!("Loading tools: {}", self.dir.file(filename).display());
        let raw = self.dir.read(filename)?;
        let document: Value = serde_json::from_str(&raw).map_err(|source| {
            error!("Invalid JSON in '{}': {}", filename, source);
            ResourceError::SchemaDecode {
                file: filename.to_string(),
                source,
            }
        })?;

        self.cache.insert(filename, document.clone());
        Ok(document)
    }

    /// Look up one tool by name.
    ///
    /// A list document is scanned by each entry's `name`. A document that is
    /// itself one definition matches only its own name; any other mapping
    /// is looked up by key. Returns `Ok(None)` when the document has no such
    /// tool.
    pub fn get_tool(
        &self,
        filename: &str,
        tool_name: &str,
    ) -> Result<Option<ToolDefinition>, ResourceError> {
        let document = self.load(filename, true)?;

        let entry = match &document {
            Value::Array(items) => items
                .iter()
                .find(|item| ToolDefinition::declared_name(item) == Some(tool_name)),
            Value::Object(_) if ToolDefinition::is_single_definition(&document) => {
                (ToolDefinition::declared_name(&document) == Some(tool_name)).then_some(&document)
            }
            Value::Object(map) => map.get(tool_name),
            _ => None,
        };

        let Some(entry) = entry else {
            warn!("Tool '{}' not found in '{}'", tool_name, filename);
            return Ok(None);
        };

        ToolDefinition::from_json(entry, Some(tool_name))
            .map(Some)
            .map_err(|source| ResourceError::InvalidToolSet {
                file: filename.to_string(),
                source,
            })
    }

    /// Evict one file, or clear the cache when `filename` is `None`.
    pub fn reload(&self, filename: Option<&str>) {
        match filename {
            Some(name) if self.cache.remove(name) => info!("Tools reloaded: {}", name),
            Some(name) => warn!("Tools were not in cache: {}", name),
            None => {
                let count = self.cache.clear();
                info!("Tools cache cleared ({} files removed)", count);
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn loader_with(files: &[(&str, &str)]) -> (tempfile::TempDir, ToolsLoader) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let loader = ToolsLoader::new(dir.path()).unwrap();
        (dir, loader)
    }

    const SUM_TOOLS: &str = r#"[
        {"name": "sum_tool", "description": "Add", "parameters": {
            "type": "object",
            "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
            "required": ["a", "b"]
        }},
        {"name": "noop", "description": "Nothing"}
    ]"#;

    #[test]
    fn test_load_parses_and_caches() {
        let (dir, loader) = loader_with(&[("sum.json", SUM_TOOLS)]);
        let document = loader.load("sum.json", true).unwrap();
        assert_eq!(document[0]["name"], "sum_tool");
        assert_eq!(loader.cache_size(), 1);

        fs::write(dir.path().join("sum.json"), "[]").unwrap();
        assert_eq!(loader.load("sum.json", true).unwrap(), document);
        assert_eq!(loader.load("sum.json", false).unwrap(), json!([]));
    }

    #[test]
    fn test_invalid_json_is_not_cached() {
        let (dir, loader) = loader_with(&[("broken.json", "{not json")]);
        let err = loader.load("broken.json", true).unwrap_err();
        assert!(matches!(err, ResourceError::SchemaDecode { ref file, .. } if file == "broken.json"));
        assert_eq!(loader.cache_size(), 0);

        fs::write(dir.path().join("broken.json"), "[]").unwrap();
        assert_eq!(loader.load("broken.json", true).unwrap(), json!([]));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, loader) = loader_with(&[]);
        assert!(loader.load("missing.json", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_tool_from_list() {
        let (_dir, loader) = loader_with(&[("sum.json", SUM_TOOLS)]);
        let tool = loader.get_tool("sum.json", "sum_tool").unwrap().unwrap();
        assert_eq!(tool.required_parameters(), vec!["a", "b"]);
        assert!(loader.get_tool("sum.json", "missing").unwrap().is_none());
    }

    #[test]
    fn test_get_tool_from_mapping_uses_key_as_name() {
        let (_dir, loader) = loader_with(&[(
            "mapped.json",
            r#"{"insights": {"description": "Generate insights"}}"#,
        )]);
        let tool = loader.get_tool("mapped.json", "insights").unwrap().unwrap();
        assert_eq!(tool.name, "insights");
        assert_eq!(tool.description, "Generate insights");
    }

    #[test]
    fn test_get_tool_from_single_definition() {
        let (_dir, loader) = loader_with(&[(
            "single.json",
            r#"{"type": "function", "function": {"name": "only", "description": "d"}}"#,
        )]);
        let tool = loader.get_tool("single.json", "only").unwrap().unwrap();
        assert_eq!(tool.description, "d");

        let (_dir, loader) =
            loader_with(&[("plain.json", r#"{"name": "only", "description": "d"}"#)]);
        assert_eq!(
            loader.get_tool("plain.json", "only").unwrap().unwrap().name,
            "only"
        );
    }

    #[test]
    fn test_single_definition_ignores_its_own_field_names() {
        let (_dir, loader) = loader_with(&[
            (
                "single.json",
                r#"{"type": "function", "function": {"name": "only", "parameters": {"type": "object"}}}"#,
            ),
            (
                "plain.json",
                r#"{"name": "only", "description": "d", "parameters": {"type": "object"}}"#,
            ),
        ]);

        assert!(loader.get_tool("single.json", "function").unwrap().is_none());
        assert!(loader.get_tool("single.json", "type").unwrap().is_none());
        assert!(loader.get_tool("plain.json", "parameters").unwrap().is_none());
        assert!(loader.get_tool("plain.json", "description").unwrap().is_none());
        assert_eq!(
            loader.get_tool("plain.json", "only").unwrap().unwrap().description,
            "d"
        );
    }

    #[test]
    fn test_reload_absent_entry_is_noop() {
        let (_dir, loader) = loader_with(&[("sum.json", SUM_TOOLS)]);
        loader.load("sum.json", true).unwrap();
        loader.reload(Some("other.json"));
        assert_eq!(loader.cache_size(), 1);
        loader.reload(Some("sum.json"));
        assert_eq!(loader.cache_size(), 0);
    }
}
