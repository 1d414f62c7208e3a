// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabula_app::{Cell, ColumnSpec, DashboardSection, RowId, RowMeta, TableSnapshot};
use tabula_testkit::TableFaker;
use tracing::debug;

pub const DEMO_SEED: u64 = 20_260_219;
const DEMO_ROWS: usize = 48;

/// On-disk shape of a `--data` file.
#[derive(Debug, Deserialize)]
struct DataFile {
    title: String,
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    rows: Vec<RowRecord>,
    #[serde(default)]
    dashboard: Vec<DashboardSection>,
}

#[derive(Debug, Deserialize)]
struct RowRecord {
    id: i64,
    #[serde(default)]
    deleted: bool,
    /// `null` marks a missing value, distinct from `""`.
    cells: Vec<Option<String>>,
    #[serde(default)]
    links: Vec<Option<i64>>,
}

pub fn load_data_file(path: &Path) -> Result<(TableSnapshot, Vec<DashboardSection>)> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read data file {}", path.display()))?;
    let file: DataFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse JSON data file {}", path.display()))?;
    file.into_parts()
        .with_context(|| format!("invalid data file {}", path.display()))
}

impl DataFile {
    fn into_parts(self) -> Result<(TableSnapshot, Vec<DashboardSection>)> {
        let mut snapshot = TableSnapshot::new(self.title, self.columns);
        let width = snapshot.column_count();

        for (index, row) in self.rows.into_iter().enumerate() {
            if row.cells.len() != width {
                bail!(
                    "row {} (id {}) has {} cells; expected {} to match the columns",
                    index,
                    row.id,
                    row.cells.len(),
                    width
                );
            }
            if !row.links.is_empty() && row.links.len() != width {
                bail!(
                    "row {} (id {}) has {} links; expected none or {}",
                    index,
                    row.id,
                    row.links.len(),
                    width
                );
            }

            let cells = row
                .cells
                .into_iter()
                .zip(&snapshot.columns)
                .enumerate()
                .map(|(column, (value, spec))| {
                    let link = row.links.get(column).copied().flatten();
                    match (value, link) {
                        (None, _) => Cell::null(spec.kind),
                        (Some(value), Some(target)) => Cell::linked(spec.kind, value, target),
                        (Some(value), None) => Cell::new(spec.kind, value),
                    }
                })
                .collect::<Vec<_>>();
            let meta = RowMeta {
                id: RowId::new(row.id),
                deleted: row.deleted,
            };
            snapshot.push_row(meta, cells);
        }

        for section in &self.dashboard {
            let grouped = section.groups.iter().map(|group| group.count).sum::<usize>();
            if !section.groups.is_empty() && grouped != section.row_count() {
                bail!(
                    "dashboard section {:?} groups cover {} rows but it has {}",
                    section.title,
                    grouped,
                    section.row_count()
                );
            }
        }

        snapshot.validate()?;
        Ok((snapshot, self.dashboard))
    }
}

/// Reads a JSON data file on every load.
#[derive(Debug)]
pub struct FileRuntime {
    path: PathBuf,
    dashboard: Vec<DashboardSection>,
}

impl FileRuntime {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            dashboard: Vec::new(),
        }
    }
}

impl tabula_tui::AppRuntime for FileRuntime {
    fn load_snapshot(&mut self) -> Result<TableSnapshot> {
        let (snapshot, dashboard) = load_data_file(&self.path)?;
        debug!(path = %self.path.display(), rows = snapshot.row_count(), "data file read");
        self.dashboard = dashboard;
        Ok(snapshot)
    }

    fn load_dashboard(&mut self) -> Result<Vec<DashboardSection>> {
        Ok(self.dashboard.clone())
    }
}

/// Seeded sample data; every load yields the same rows.
#[derive(Debug, Clone, Copy)]
pub struct DemoRuntime {
    seed: u64,
}

impl DemoRuntime {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl tabula_tui::AppRuntime for DemoRuntime {
    fn load_snapshot(&mut self) -> Result<TableSnapshot> {
        Ok(TableFaker::new(self.seed).projects(DEMO_ROWS))
    }

    fn load_dashboard(&mut self) -> Result<Vec<DashboardSection>> {
        Ok(TableFaker::new(self.seed.wrapping_add(1)).dashboard())
    }
}
