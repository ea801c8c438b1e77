use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::ValueEnum;
use serde::Deserialize;

use crate::constants::{ANIMATION_DURATION, DEFAULT_CONFIG_PATH, DISPLAY_DURATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Console,
    Window,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub url: Option<String>,
    pub delay_secs: f64,
    pub debug: bool,
    pub animation_secs: f64,
    pub surface: SurfaceKind,
    pub request_timeout_secs: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: None,
            delay_secs: DISPLAY_DURATION,
            debug: true,
            animation_secs: ANIMATION_DURATION as f64,
            surface: SurfaceKind::Console,
            request_timeout_secs: None,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub delay_secs: Option<f64>,
    pub debug: Option<bool>,
    pub animation_secs: Option<f64>,
    pub surface: Option<SurfaceKind>,
    pub request_timeout_secs: Option<f64>,
}

/// Loads settings from the config file and the environment.
///
/// Without an explicit path the default file is read if it exists; an
/// explicit path that can't be read is an error. Keys the slideshow doesn't
/// know are ignored so other tools can share the file.
pub fn load_settings(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_file(path)?
            .ok_or_else(|| anyhow!("config file '{}' does not exist", path.display()))?,
        None => read_file(Path::new(DEFAULT_CONFIG_PATH))?.unwrap_or_default(),
    };
    apply_env(&mut settings, env)?;
    Ok(settings)
}

fn read_file(path: &Path) -> anyhow::Result<Option<Settings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    };
    let settings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    Ok(Some(settings))
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
    if let Some(v) = env("FADESHOW_URL") {
        settings.url = Some(v);
    }
    if let Some(v) = env("FADESHOW_DELAY_SECS") {
        settings.delay_secs = v
            .trim()
            .parse()
            .with_context(|| format!("FADESHOW_DELAY_SECS is not a number: '{v}'"))?;
    }
    if let Some(v) = env("FADESHOW_DEBUG") {
        settings.debug = parse_flag(&v)
            .with_context(|| format!("FADESHOW_DEBUG is not a boolean: '{v}'"))?;
    }
    Ok(())
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised flag value '{other}'"),
    }
}

impl Settings {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.url = Some(url);
        }
        if let Some(delay) = overrides.delay_secs {
            self.delay_secs = delay;
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
        if let Some(animation) = overrides.animation_secs {
            self.animation_secs = animation;
        }
        if let Some(surface) = overrides.surface {
            self.surface = surface;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = Some(timeout);
        }
    }

    pub fn url(&self) -> anyhow::Result<&str> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => bail!("no slide URL given: pass one on the command line, set FADESHOW_URL or add `url` to the config file"),
        }
    }

    pub fn animation(&self) -> anyhow::Result<Duration> {
        Duration::try_from_secs_f64(self.animation_secs)
            .with_context(|| format!("invalid animation length {}", self.animation_secs))
    }

    pub fn request_timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.request_timeout_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid request timeout {secs}"))
            })
            .transpose()
    }
}
