// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, parse_level};

/// Installs a file logger when a log file is configured. The terminal
/// belongs to the table view, so nothing is ever logged to stderr.
pub fn init(config: &Config) -> Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(config.log_level())?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    info!(path = %path.display(), level = config.log_level(), "logging started");
    Ok(())
}

/// `RUST_LOG` when set, otherwise the configured level.
fn filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = parse_level(level)?;
    EnvFilter::try_new(level.to_string()).with_context(|| format!("build log filter for {level}"))
}
