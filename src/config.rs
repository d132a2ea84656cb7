use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::cache::DEFAULT_TTL_MS;

pub const FEED_URL: &str = "https://www.youtube.com/feed/channels";
pub const LOGIN_URL: &str = "https://accounts.google.com/ServiceLogin?service=youtube";
const DEFAULT_CACHE_PATH: &str = "data/yt_subs.sqlite";
const ENV_PREFIX: &str = "YT_SUBS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub feed_url: String,
    pub login_url: String,
    pub cache_path: PathBuf,
    pub cache_ttl_ms: i64,
    /// `name=value; name2=value2` taken from a signed-in browser session.
    #[serde(default)]
    pub cookie: Option<String>,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `YT_SUBS_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_builder(file, Environment::with_prefix(ENV_PREFIX))
    }

    fn from_builder(file: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("feed_url", FEED_URL)?
            .set_default("login_url", LOGIN_URL)?
            .set_default("cache_path", DEFAULT_CACHE_PATH)?
            .set_default("cache_ttl_ms", DEFAULT_TTL_MS)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(env)
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
