mod config;
mod data;
mod errors;
mod etl;
mod reader;

use std::env;
use std::io;
use std::path::Path;

use log::error;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use crate::config::{load_user_config, DEFAULT_CONFIG_PATH, DEFAULT_LOG_LEVEL};
use crate::errors::Result;
use crate::etl::marked_paths::MarkedPathsEtl;
use crate::etl::Etl;

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let user_config = match load_user_config(Path::new(&config_path)) {
        Ok(config) => config,
        Err(err) => {
            setup_logging(DEFAULT_LOG_LEVEL);
            error!(config_path = config_path.as_str(), err = err.to_string().as_str(); "Could not load config");
            return Err(err);
        }
    };
    setup_logging(&user_config.log_level);

    let mut etl = MarkedPathsEtl::new(&user_config);
    etl.process()
}
