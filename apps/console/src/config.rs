use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_filter: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub seed_events: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            email: "demo@eventboard.local".into(),
            password: "demo-password".into(),
            display_name: "Demo User".into(),
            seed_events: None,
        }
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(error) if error.kind() == io::ErrorKind::NotFound => Settings::default(),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

fn apply_env_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = lookup("EVENTBOARD_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("EVENTBOARD_EMAIL") {
        settings.email = v;
    }
    if let Some(v) = lookup("EVENTBOARD_PASSWORD") {
        settings.password = v;
    }
    if let Some(v) = lookup("EVENTBOARD_NAME") {
        settings.display_name = v;
    }
    if let Some(v) = lookup("EVENTBOARD_SEED") {
        settings.seed_events = Some(PathBuf::from(v));
    }
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
