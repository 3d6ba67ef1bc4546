//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `STRUCTCALL_BACKEND__MODEL`.
pub const ENV_PREFIX: &str = "STRUCTCALL_";

const PROJECT_FILES: [&str; 2] = ["structcall.toml", ".structcall.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `STRUCTCALL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./structcall.toml` or `./.structcall.toml`
    /// 4. Global config under the XDG config dir
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/structcall/config.toml if set,
    /// otherwise falls back to ~/.config/structcall/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("structcall").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        let overrides: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if overrides.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", overrides.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./structcall.toml or ./.structcall.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        let xdg = jail.directory().join("xdg");
        jail.set_env("XDG_CONFIG_HOME", xdg.display());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.backend.model, "llama3.1");
        assert_eq!(config.invocation.max_retries, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("structcall"));
    }

    #[test]
    fn test_load_without_files_gives_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config, FileConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_global() {
        Jail::expect_with(|jail| {
            isolate(jail);
            std::fs::create_dir_all(jail.directory().join("xdg/structcall"))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                "xdg/structcall/config.toml",
                r#"
                [backend]
                model = "global-model"
                temperature = 0.5
                "#,
            )?;
            jail.create_file(
                ".structcall.toml",
                r#"
                [backend]
                model = "project-model"
                "#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.backend.model, "project-model");
            assert_eq!(config.backend.temperature, 0.5);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("structcall.toml", "[invocation]\nmax_retries = 2\n")?;
            jail.create_file("custom.toml", "[invocation]\nmax_retries = 7\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.invocation.max_retries, 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("structcall.toml", "[backend]\nprovider = \"ollama\"\n")?;
            jail.set_env("STRUCTCALL_BACKEND__PROVIDER", "openai");
            jail.set_env("STRUCTCALL_INVOCATION__EXTRA_TOOL_CALLS", "reject");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.backend.provider, "openai");
            assert_eq!(config.invocation.extra_tool_calls, "reject");
            Ok(())
        });
    }

    #[test]
    fn test_type_mismatch_is_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("structcall.toml", "[invocation]\nmax_retries = \"many\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
