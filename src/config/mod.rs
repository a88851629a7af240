mod credentials;

use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use derive_getters::Getters;
use serde::Deserialize;

pub use credentials::Credentials;

fn default_pacing_ms() -> u64 {
    250
}

#[derive(Debug, Deserialize, Getters)]
pub struct Config {
    auth: Credentials,
    /// Minimum delay between paced remote calls.
    #[serde(default = "default_pacing_ms")]
    pacing_ms: u64,
}

impl Config {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config_file = match file {
            Some(file) => file.to_path_buf(),
            None => default_location()?,
        };
        let contents = read_to_string(&config_file)
            .with_context(|| format!("config file {} should be readable", config_file.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("config file {} should be parseable", config_file.display()))
    }
}

fn default_location() -> Result<PathBuf> {
    let mut config_dir = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from_str(&config_home).context("XDG_CONFIG_HOME should be a parseable path")?
    } else {
        let mut config_home = PathBuf::from_str(&env::var("HOME").context("HOME should be set")?)
            .context("HOME should be a parseable path")?;
        config_home.push(".config");
        config_home
    };
    config_dir.push(env!("CARGO_PKG_NAME"));
    config_dir.push("config.toml");

    Ok(config_dir)
}
