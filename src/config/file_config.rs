use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub song_data_dir: Option<String>,
    pub log_data_dir: Option<String>,
    pub reset_schema: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "db_path = \"/tmp/warehouse.db\"\nreset_schema = true\n").unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/tmp/warehouse.db"));
        assert_eq!(config.reset_schema, Some(true));
        assert!(config.song_data_dir.is_none());
        assert!(config.log_data_dir.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "db_dir = \"/tmp\"\n").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(FileConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
