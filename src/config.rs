use crate::cmds::Cmd;
use crate::error::{Error, ErrorKind, Result};
use crate::view::Classes;

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use unsegen::input::Key;

pub type KeyMap = HashMap<Key, Cmd>;

const CONFIG_PATH_ENV_VAR: &str = "MONTHGRID_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("monthgrid").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".monthgrid.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first existing file of the default
/// locations. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => Config::from_file(&path),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub prev_month: char,
    pub next_month: char,
    pub left: char,
    pub right: char,
    pub up: char,
    pub down: char,
    pub select: char,
    pub today: char,
    pub form: char,
    pub command: char,
    pub quit: char,
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            prev_month: 'p',
            next_month: 'n',
            left: 'h',
            right: 'l',
            up: 'k',
            down: 'j',
            select: '\n',
            today: 't',
            form: 'i',
            command: ':',
            quit: 'q',
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classes: Classes,
    pub keys: Keys,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::Config,
                &format!("Could not read '{}': {}", path.display(), e),
            )
        })?;

        log::info!("Loading config from '{}'", path.display());
        content.parse()
    }

    pub fn key_map(&self) -> KeyMap {
        let keys = &self.keys;
        let mut key_map = HashMap::new();

        key_map.insert(Key::Char(keys.prev_month), Cmd::PrevMonth);
        key_map.insert(Key::Char(keys.next_month), Cmd::NextMonth);
        key_map.insert(Key::Char(keys.left), Cmd::Left);
        key_map.insert(Key::Char(keys.right), Cmd::Right);
        key_map.insert(Key::Char(keys.up), Cmd::Up);
        key_map.insert(Key::Char(keys.down), Cmd::Down);
        key_map.insert(Key::Char(keys.select), Cmd::Select);
        key_map.insert(Key::Char(keys.today), Cmd::Today);
        key_map.insert(Key::Char(keys.form), Cmd::Form);
        key_map.insert(Key::Char(keys.command), Cmd::Command);
        key_map.insert(Key::Char(keys.quit), Cmd::Exit);

        key_map.insert(Key::Left, Cmd::PrevMonth);
        key_map.insert(Key::Right, Cmd::NextMonth);

        key_map
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        let classes = &config.classes;

        if classes.initial == classes.adjacent || classes.is_reserved(&classes.active) {
            return Err(Error::new(
                ErrorKind::Config,
                "The initial, active and adjacent classes must all differ",
            ));
        }

        Ok(config)
    }
}
