use anyhow::{Context, Result};
use engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::args::ConfigCmd;

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("symtree")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("symtree");
        }
    }
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("symtree")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    /// Library JSON files registered before every run.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: EngineConfig,
    #[serde(default)]
    pub libraries: LibraryConfig,
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    } else {
        Ok(Config::default())
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_file_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let data = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))
}

pub fn handle_config(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Show => {
            let config = load_config()?;
            let data = toml::to_string_pretty(&config).context("failed to serialize config")?;
            println!("# {}", config_file_path().display());
            print!("{data}");
        }
        ConfigCmd::Init => {
            let path = config_file_path();
            if path.exists() {
                println!("Configuration already exists at {}", path.display());
            } else {
                save_config(&Config::default())?;
                println!("Configuration written to {}", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.analysis, EngineConfig::default());
        assert!(config.libraries.paths.is_empty());
    }

    #[test]
    fn partial_analysis_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            "[analysis]\nnested_type_separator = \".\"\n\n[libraries]\npaths = [\"jdk.json\"]\n",
        )
        .unwrap();
        assert_eq!(config.analysis.nested_type_separator, ".");
        assert_eq!(config.analysis.unique_delimiter, ".");
        assert_eq!(config.analysis.default_package, "default");
        assert_eq!(config.libraries.paths, vec![PathBuf::from("jdk.json")]);
    }
}
