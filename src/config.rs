use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// .osm file to scan, optionally `.xz` compressed.
    pub input_path: String,
    /// KML with one placemark per way.
    pub output_path_grouped: String,
    /// KML with one placemark per (way, marker) pair.
    pub output_path_split: String,
    /// Relation tag key whose value names the marked path.
    #[serde(default = "default_marker_tag_key")]
    pub marker_tag_key: String,
    /// Prefix of the `<marker>.png` icons referenced from placemark descriptions.
    #[serde(default = "default_icon_base_path")]
    pub icon_base_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_marker_tag_key() -> String {
    "jel".to_string()
}

fn default_icon_base_path() -> String {
    "tj/".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path).map_err(|source| Error::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })
}
