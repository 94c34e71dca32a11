use std::fmt;
use std::path::PathBuf;

mod loader;
mod paths;

use loader::ConfigLoader;
pub use paths::ConfigPaths;

/// Startup configuration: the commands sourced before the first prompt.
pub struct Config {
    paths: ConfigPaths,
}

impl Config {
    pub fn new(explicit: Option<&str>) -> Self {
        Config {
            paths: ConfigPaths::new(explicit),
        }
    }

    /// Lines of the startup file, in order. Empty when there is no file.
    pub fn startup_lines(&self) -> Result<Vec<String>, ConfigError> {
        ConfigLoader::new(&self.paths).load()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(PathBuf),
    IoError(PathBuf, std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            ConfigError::IoError(path, e) => write!(f, "{}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for ConfigError {}
