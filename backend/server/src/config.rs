use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use seed::DEFAULT_SEED_URL;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_USER_FILE_PATH: &str = "user.json";
pub const DEFAULT_ASSETS_DIR: &str = "dist/assets";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub user_file_path: PathBuf,
    pub assets_dir: PathBuf,
    pub seed_url: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", &DEFAULT_PORT.to_string())?,
            user_file_path: try_load("USER_FILE_PATH", DEFAULT_USER_FILE_PATH)?,
            assets_dir: try_load("ASSETS_DIR", DEFAULT_ASSETS_DIR)?,
            seed_url: try_load("SEED_URL", DEFAULT_SEED_URL)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            user_file_path: PathBuf::from(DEFAULT_USER_FILE_PATH),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            seed_url: DEFAULT_SEED_URL.to_string(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse(key, var(key), default)
}

fn parse<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}
