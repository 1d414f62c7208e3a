// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tabula_layout::display_width;
use tabula_tui::UiOptions;
use tracing_subscriber::filter::LevelFilter;

const APP_NAME: &str = "tabula";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "TABULA_CONFIG_PATH";
const LOG_FILE_ENV: &str = "TABULA_LOG_FILE";
const DEFAULT_SEPARATOR: &str = " │ ";
const MAX_SEPARATOR_WIDTH: usize = 8;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub show_dashboard: Option<bool>,
    pub separator: Option<String>,
    pub remember_view_state: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            show_dashboard: Some(true),
            separator: Some(DEFAULT_SEPARATOR.to_owned()),
            remember_view_state: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [ui] and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(separator) = &self.ui.separator {
            let width = display_width(separator);
            if width == 0 {
                bail!(
                    "ui.separator in {} must not be empty; use something like \" │ \"",
                    path.display()
                );
            }
            if width > MAX_SEPARATOR_WIDTH {
                bail!(
                    "ui.separator in {} is {} cells wide; keep it at most {}",
                    path.display(),
                    width,
                    MAX_SEPARATOR_WIDTH
                );
            }
        }

        if let Some(level) = &self.log.level {
            parse_level(level).with_context(|| format!("invalid log.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn show_dashboard(&self) -> bool {
        self.ui.show_dashboard.unwrap_or(true)
    }

    pub fn separator(&self) -> &str {
        self.ui.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }

    pub fn remember_view_state(&self) -> bool {
        self.ui.remember_view_state.unwrap_or(false)
    }

    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            separator: self.separator().to_owned(),
            show_dashboard: self.show_dashboard(),
            remember_view_state: self.remember_view_state(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log destination: `[log] file`, else `TABULA_LOG_FILE`. `None` turns
    /// logging off.
    pub fn log_file(&self) -> Option<PathBuf> {
        if let Some(file) = &self.log.file {
            return Some(PathBuf::from(file));
        }
        env::var_os(LOG_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tabula config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Open on the dashboard instead of the table.\nshow_dashboard = true\n# Drawn between columns; at most {} cells wide.\nseparator = \"{}\"\n# Keep sort keys and hidden columns when the table is reopened.\nremember_view_state = false\n\n[log]\n# trace, debug, info, warn, error or off. RUST_LOG overrides it.\nlevel = \"{}\"\n# Logging stays off until a file is set here or in {}.\n# file = \"/tmp/tabula.log\"\n",
            path.display(),
            MAX_SEPARATOR_WIDTH,
            DEFAULT_SEPARATOR,
            DEFAULT_LOG_LEVEL,
            LOG_FILE_ENV,
        )
    }
}

pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    raw.trim().parse::<LevelFilter>().map_err(|_| {
        anyhow!("unknown log level {raw:?}; use one of: trace, debug, info, warn, error, off")
    })
}
