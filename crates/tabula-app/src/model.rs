// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::ids::RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Money,
    Date,
    Numeric,
    Notes,
    Reference,
    Drilldown,
}

impl ColumnKind {
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Money,
        Self::Date,
        Self::Numeric,
        Self::Notes,
        Self::Reference,
        Self::Drilldown,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Money => "money",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Notes => "notes",
            Self::Reference => "reference",
            Self::Drilldown => "drilldown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "money" => Some(Self::Money),
            "date" => Some(Self::Date),
            "numeric" => Some(Self::Numeric),
            "notes" => Some(Self::Notes),
            "reference" => Some(Self::Reference),
            "drilldown" => Some(Self::Drilldown),
            _ => None,
        }
    }

    /// Right-aligned kinds line up on their last digit.
    pub const fn right_aligned(self) -> bool {
        matches!(self, Self::Money | Self::Numeric | Self::Drilldown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub title: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub min: usize,
    /// Zero means uncapped.
    #[serde(default)]
    pub max: usize,
    /// Every value the column can hold, so its width does not jump as the
    /// visible subset of rows changes.
    #[serde(default)]
    pub fixed_values: Vec<String>,
    #[serde(default)]
    pub flex: bool,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            title: title.into(),
            kind,
            min: 0,
            max: 0,
            fixed_values: Vec::new(),
            flex: false,
        }
    }

    pub fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn with_fixed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn flex(mut self) -> Self {
        self.flex = true;
        self
    }

    pub const fn max_width(&self) -> Option<usize> {
        if self.max == 0 { None } else { Some(self.max) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    pub kind: ColumnKind,
    /// Target row of a navigable cross-reference.
    #[serde(default)]
    pub link_id: Option<i64>,
    #[serde(default)]
    pub null: bool,
}

impl Cell {
    pub fn new(kind: ColumnKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
            link_id: None,
            null: false,
        }
    }

    pub fn null(kind: ColumnKind) -> Self {
        Self {
            value: String::new(),
            kind,
            link_id: None,
            null: true,
        }
    }

    pub fn linked(kind: ColumnKind, value: impl Into<String>, link_id: i64) -> Self {
        Self {
            link_id: Some(link_id),
            ..Self::new(kind, value)
        }
    }

    pub const fn is_null(&self) -> bool {
        self.null
    }

    pub const fn has_link(&self) -> bool {
        self.link_id.is_some()
    }

    pub fn display(&self) -> &str {
        if self.null { "" } else { &self.value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMeta {
    pub id: RowId,
    #[serde(default)]
    pub deleted: bool,
}

impl RowMeta {
    pub const fn new(id: i64) -> Self {
        Self {
            id: RowId::new(id),
            deleted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSnapshot {
    pub title: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Cell>>,
    pub meta: Vec<RowMeta>,
}

impl TableSnapshot {
    pub fn new(title: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
            meta: Vec::new(),
        }
    }

    pub fn push_row(&mut self, meta: RowMeta, cells: Vec<Cell>) {
        self.meta.push(meta);
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }

    pub fn row_meta(&self, row: usize) -> Option<RowMeta> {
        self.meta.get(row).copied()
    }

    pub fn deleted_count(&self) -> usize {
        self.meta.iter().filter(|meta| meta.deleted).count()
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows.len() != self.meta.len() {
            bail!(
                "table {:?} has {} rows but {} row metadata entries",
                self.title,
                self.rows.len(),
                self.meta.len()
            );
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                bail!(
                    "row {} of table {:?} has {} cells; expected {} to match the columns",
                    index,
                    self.title,
                    row.len(),
                    self.columns.len()
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortEntry {
    pub const fn asc(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGroup {
    pub title: String,
    pub count: usize,
}

/// One block of the summary dashboard. Rows of a grouped section are stored
/// group after group, in the order of `groups`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSection {
    pub title: String,
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub groups: Vec<SubGroup>,
}

impl DashboardSection {
    pub fn flat(title: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            title: title.into(),
            rows,
            groups: Vec::new(),
        }
    }

    pub fn grouped(title: impl Into<String>, groups: Vec<(String, Vec<String>)>) -> Self {
        let mut rows = Vec::new();
        let mut subs = Vec::with_capacity(groups.len());
        for (title, group_rows) in groups {
            subs.push(SubGroup {
                title,
                count: group_rows.len(),
            });
            rows.extend(group_rows);
        }
        Self {
            title: title.into(),
            rows,
            groups: subs,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_grouped(&self) -> bool {
        self.groups.len() > 1
    }

    pub fn sub_counts(&self) -> Vec<usize> {
        self.groups.iter().map(|group| group.count).collect()
    }

    /// Rows belonging to the group at `index`.
    pub fn group_rows(&self, index: usize) -> &[String] {
        let start = self
            .groups
            .iter()
            .take(index)
            .map(|group| group.count)
            .sum::<usize>()
            .min(self.rows.len());
        let len = self.groups.get(index).map_or(0, |group| group.count);
        let end = (start + len).min(self.rows.len());
        &self.rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, ColumnKind, ColumnSpec, DashboardSection, RowMeta, TableSnapshot};
    use anyhow::Result;

    #[test]
    fn column_kind_parse_round_trips_labels() {
        for kind in ColumnKind::ALL {
            assert_eq!(ColumnKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ColumnKind::parse("currency"), None);
    }

    #[test]
    fn zero_max_means_uncapped() {
        let spec = ColumnSpec::new("Notes", ColumnKind::Notes);
        assert_eq!(spec.max_width(), None);
        assert_eq!(spec.with_max(12).max_width(), Some(12));
    }

    #[test]
    fn null_cell_displays_empty_but_is_not_an_empty_string() {
        let null = Cell::null(ColumnKind::Money);
        let empty = Cell::new(ColumnKind::Money, "");
        assert_eq!(null.display(), "");
        assert!(null.is_null());
        assert!(!empty.is_null());
        assert_ne!(null, empty);
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let mut snapshot = TableSnapshot::new(
            "projects",
            vec![
                ColumnSpec::new("ID", ColumnKind::Numeric),
                ColumnSpec::new("Title", ColumnKind::Text),
            ],
        );
        snapshot.push_row(RowMeta::new(1), vec![Cell::new(ColumnKind::Numeric, "1")]);

        let error = snapshot.validate().expect_err("ragged row should fail");
        assert!(error.to_string().contains("row 0"));
    }

    #[test]
    fn validate_accepts_aligned_rows() -> Result<()> {
        let mut snapshot = TableSnapshot::new(
            "projects",
            vec![ColumnSpec::new("ID", ColumnKind::Numeric)],
        );
        snapshot.push_row(RowMeta::new(1), vec![Cell::new(ColumnKind::Numeric, "1")]);
        snapshot.validate()?;
        assert_eq!(snapshot.cell(0, 0).map(Cell::display), Some("1"));
        assert_eq!(snapshot.cell(0, 1), None);
        assert_eq!(snapshot.cell(3, 0), None);
        Ok(())
    }

    #[test]
    fn grouped_section_slices_rows_per_group() {
        let section = DashboardSection::grouped(
            "Maintenance",
            vec![
                ("Overdue".to_owned(), vec!["a".to_owned(), "b".to_owned()]),
                ("Upcoming".to_owned(), vec!["c".to_owned()]),
            ],
        );
        assert!(section.is_grouped());
        assert_eq!(section.sub_counts(), vec![2, 1]);
        assert_eq!(section.group_rows(0), ["a".to_owned(), "b".to_owned()]);
        assert_eq!(section.group_rows(1), ["c".to_owned()]);
        assert!(section.group_rows(2).is_empty());
    }
}
