use std::fs;
use std::io::ErrorKind;

use super::{ConfigError, ConfigPaths};

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load(&self) -> Result<Vec<String>, ConfigError> {
        let Some(path) = &self.paths.rc_path else {
            return Ok(Vec::new());
        };

        match fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("sourcing {}", path.display());
                Ok(content.lines().map(String::from).collect())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ConfigError::ConfigFileNotFound(path.clone()))
            }
            Err(e) => Err(ConfigError::IoError(path.clone(), e)),
        }
    }
}
