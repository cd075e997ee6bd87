use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{APP_NAME, UTF8_PATH_PANIC};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    /// Where `recipes.json` is kept instead of the platform data dir
    pub data_dir: Option<Utf8PathBuf>,
    /// Print save failures after every command
    pub warn_on_save_failure: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            warn_on_save_failure: true,
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .context("Could not determine home directory path")
}

pub fn global_file_path(name: &str) -> Result<Utf8PathBuf> {
    let dirs = project_dirs()?;
    let config = Utf8Path::from_path(dirs.config_dir()).expect(UTF8_PATH_PANIC);
    Ok(config.join(name))
}

pub fn default_data_dir() -> Result<Utf8PathBuf> {
    let dirs = project_dirs()?;
    let data = Utf8Path::from_path(dirs.data_dir()).expect(UTF8_PATH_PANIC);
    Ok(data.to_path_buf())
}

/// Loads a file from the config dir, defaults if it does not exist
pub fn global_load<T: DeserializeOwned + Default>(name: &str) -> Result<T> {
    let path = global_file_path(name)?;
    match File::open(&path) {
        Ok(mut f) => {
            let mut content = String::new();
            f.read_to_string(&mut content)?;
            toml::from_str(&content).with_context(|| format!("Bad TOML data in {path}"))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::trace!("no config file at {path}, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e).context("Failed to load config file"),
    }
}

pub fn global_store<T: Serialize>(name: &str, val: T) -> Result<()> {
    let path = global_file_path(name)?;
    store_at_path(path, val)
}

pub fn store_at_path<T: Serialize>(path: impl AsRef<Path>, val: T) -> Result<()> {
    let parent = path
        .as_ref()
        .parent()
        .context("Invalid config dir: no parent")?;
    fs::create_dir_all(parent).context("Failed to create config directory")?;
    let toml_str = toml::to_string_pretty(&val)?;
    fs::write(path, toml_str).context("Failed to write config file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: BookConfig = toml::from_str("").unwrap();
        assert_eq!(config, BookConfig::default());
        assert!(config.warn_on_save_failure);
    }

    #[test]
    fn test_partial() {
        let config: BookConfig = toml::from_str("data_dir = \"/srv/recipes\"").unwrap();
        assert_eq!(config.data_dir.as_deref(), Some(Utf8Path::new("/srv/recipes")));
        assert!(config.warn_on_save_failure);

        let config: BookConfig = toml::from_str("warn_on_save_failure = false").unwrap();
        assert_eq!(config.data_dir, None);
        assert!(!config.warn_on_save_failure);
    }

    #[test]
    fn test_unknown_key() {
        assert!(toml::from_str::<BookConfig>("color = true").is_err());
    }

    #[test]
    fn test_store_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = BookConfig {
            data_dir: Some("/srv/recipes".into()),
            warn_on_save_failure: false,
        };
        store_at_path(&path, &config).unwrap();
        let read: BookConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, config);
    }
}
