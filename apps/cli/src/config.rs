use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use water_app::TrackerConfig;

use crate::dirs;

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3846;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tracker: TrackerConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub paths: ConfigPaths,
    pub created: bool,
}

pub fn load_or_create() -> Result<ConfigLoad, String> {
    load_or_create_in(&dirs::config_dir()?)
}

fn load_or_create_in(dir: &Path) -> Result<ConfigLoad, String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    let file = dir.join(CONFIG_FILE_NAME);
    let paths = ConfigPaths { file };

    if paths.file.exists() {
        let contents = fs::read_to_string(&paths.file)
            .map_err(|err| format!("read config {}: {}", paths.file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", paths.file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            paths,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&paths.file, contents)
        .map_err(|err| format!("write config {}: {}", paths.file.display(), err))?;

    Ok(ConfigLoad {
        config,
        paths,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use water_app::CostModelKind;

    #[test]
    fn creates_defaults_then_reloads() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = temp.path().join("water-tracker");

        let created = load_or_create_in(&dir).expect("create");
        assert!(created.created);
        assert_eq!(created.config.port, 3846);

        let loaded = load_or_create_in(&dir).expect("load");
        assert!(!loaded.created);
        assert_eq!(loaded.config.tracker, TrackerConfig::default());
        assert_eq!(loaded.paths.file, dir.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn partial_tracker_table_keeps_defaults() {
        let config: CliConfig = toml::from_str(
            "[tracker]\ncost_model = \"per_character\"\nestimate_mode = \"single_text\"\n",
        )
        .expect("parse");
        assert_eq!(config.port, 3846);
        assert_eq!(config.tracker.cost_model, CostModelKind::PerCharacter);
        assert_eq!(config.tracker.max_history, 1000);
    }
}
