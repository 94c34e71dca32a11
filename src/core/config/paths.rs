use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Only a file named with `-c` is sourced, and it must exist.
    pub rc_path: Option<PathBuf>,
}

impl ConfigPaths {
    pub fn new(explicit: Option<&str>) -> Self {
        ConfigPaths {
            rc_path: explicit.map(PathBuf::from),
        }
    }
}
