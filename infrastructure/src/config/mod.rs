//! Configuration file loading for structcall
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STRUCTCALL_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./structcall.toml` or `./.structcall.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/structcall/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBackendConfig, FileConfig, FileInvocationConfig, FileLoggingConfig, FileOutputConfig,
    FileResourcesConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
