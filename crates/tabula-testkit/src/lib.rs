// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use tabula_app::{Cell, ColumnKind, ColumnSpec, DashboardSection, RowMeta, TableSnapshot};
use time::{Date, Duration, Month};

const PROJECT_TYPES: [&str; 10] = [
    "Appliance",
    "Electrical",
    "Exterior",
    "Flooring",
    "HVAC",
    "Landscaping",
    "Painting",
    "Plumbing",
    "Roof",
    "Windows",
];

const PROJECT_STATUSES: [&str; 5] = ["ideating", "planned", "underway", "completed", "abandoned"];

const VENDORS: [&str; 10] = [
    "Premier Plumbing Co",
    "Hartley Electric",
    "Summit Roofing Pros",
    "Greenleaf Landscaping",
    "Apex HVAC Services",
    "Reed Painting",
    "Bright Window Works",
    "Quality Flooring Group",
    "Eagle Handyman",
    "Central Concrete",
];

const MAINTENANCE_ITEMS: [&str; 10] = [
    "Replace HVAC filter",
    "Test smoke detectors",
    "Flush water heater",
    "Clean gutters",
    "Test GFCI outlets",
    "Service furnace",
    "Clean dryer vent",
    "Inspect roof flashing",
    "Seal deck",
    "Drain sprinkler lines",
];

const INCIDENT_TITLES: [&str; 6] = [
    "Leak under kitchen sink",
    "Tripped breaker in garage",
    "Cracked window pane",
    "Water stain on ceiling",
    "Fence post rot",
    "Noisy dishwasher",
];

const NOTE_WORDS: [&str; 16] = [
    "inspect", "repair", "replace", "estimate", "budget", "kitchen", "garage", "basement", "attic",
    "roof", "window", "furnace", "verify", "safety", "upgrade", "schedule",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    /// True with probability `percent` / 100.
    fn chance(&mut self, percent: usize) -> bool {
        self.int_n(100) < percent
    }
}

/// Seeded generator for demo tables and dashboards. The same seed always
/// yields the same data.
#[derive(Debug, Clone)]
pub struct TableFaker {
    rng: DeterministicRng,
}

impl TableFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn projects(&mut self, count: usize) -> TableSnapshot {
        let mut snapshot = TableSnapshot::new("Projects", project_columns());
        for index in 0..count {
            let id = i64::try_from(index + 1).unwrap_or(i64::MAX);
            let mut meta = RowMeta::new(id);
            meta.deleted = self.rng.chance(8);
            let cells = self.project_row(id);
            snapshot.push_row(meta, cells);
        }
        snapshot
    }

    fn project_row(&mut self, id: i64) -> Vec<Cell> {
        let type_name = self.pick(&PROJECT_TYPES);
        let status = self.pick(&PROJECT_STATUSES);
        let started = !matches!(status, "ideating" | "abandoned");

        let budget = started.then(|| self.int_range(5_000, 1_500_000));
        let actual = if status == "completed" {
            budget.map(|budget| {
                let variance = self.int_range(-20, 20);
                (budget + budget * variance / 100).max(0)
            })
        } else {
            None
        };
        let start = started.then(|| self.date_before(fixture_date(), 730));

        let vendor_index = self.int_n(VENDORS.len());
        let vendor = self.rng.chance(75).then(|| {
            Cell::linked(
                ColumnKind::Reference,
                VENDORS[vendor_index],
                i64::try_from(vendor_index + 1).unwrap_or(0),
            )
        });
        let quotes = self.int_n(4);

        vec![
            Cell::new(ColumnKind::Numeric, id.to_string()),
            Cell::new(ColumnKind::Text, type_name),
            Cell::new(ColumnKind::Text, self.project_title(type_name)),
            Cell::new(ColumnKind::Text, status),
            optional(ColumnKind::Money, budget.map(format_cents)),
            optional(ColumnKind::Money, actual.map(format_cents)),
            optional(ColumnKind::Date, start.map(format_date)),
            vendor.unwrap_or_else(|| Cell::null(ColumnKind::Reference)),
            Cell::new(ColumnKind::Notes, self.sentence(3, 12)),
            Cell::new(ColumnKind::Drilldown, quotes.to_string()),
        ]
    }

    fn project_title(&mut self, type_name: &str) -> String {
        let verbs = ["Replace", "Repair", "Upgrade", "Inspect"];
        format!(
            "{} {}",
            self.pick(&verbs),
            type_name.to_ascii_lowercase()
        )
    }

    /// Incidents, a two-group maintenance section and active projects.
    pub fn dashboard(&mut self) -> Vec<DashboardSection> {
        let incidents = (0..self.int_range(1, 4))
            .map(|_| {
                let days = self.int_range(1, 90);
                format!("{} | {days}d open", self.pick(&INCIDENT_TITLES))
            })
            .collect::<Vec<_>>();

        let overdue = (0..self.int_range(2, 6))
            .map(|_| {
                let days = self.int_range(1, 120);
                format!("{} | {days}d overdue", self.pick(&MAINTENANCE_ITEMS))
            })
            .collect::<Vec<_>>();
        let upcoming = (0..self.int_range(3, 8))
            .map(|_| {
                let days = self.int_range(1, 30);
                format!("{} | in {days}d", self.pick(&MAINTENANCE_ITEMS))
            })
            .collect::<Vec<_>>();

        let projects = (0..self.int_range(2, 5))
            .map(|_| {
                let type_name = self.pick(&PROJECT_TYPES);
                let title = self.project_title(type_name);
                format!("{title} | {}", format_cents(self.int_range(5_000, 900_000)))
            })
            .collect::<Vec<_>>();

        vec![
            DashboardSection::flat("Incidents", incidents),
            DashboardSection::grouped(
                "Maintenance",
                vec![
                    ("Overdue".to_owned(), overdue),
                    ("Upcoming".to_owned(), upcoming),
                ],
            ),
            DashboardSection::flat("Active projects", projects),
        ]
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.rng.next_u64() % span) as i64
    }

    fn date_before(&mut self, end: Date, max_days: i64) -> Date {
        end - Duration::days(self.int_range(0, max_days))
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.int_n(max_words.saturating_sub(min_words) + 1);
        let mut sentence = (0..count)
            .map(|_| self.pick(&NOTE_WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence
    }
}

pub fn project_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("ID", ColumnKind::Numeric).with_min(2),
        ColumnSpec::new("Type", ColumnKind::Text).with_fixed_values(PROJECT_TYPES),
        ColumnSpec::new("Title", ColumnKind::Text).flex().with_min(8),
        ColumnSpec::new("Status", ColumnKind::Text).with_fixed_values(PROJECT_STATUSES),
        ColumnSpec::new("Budget", ColumnKind::Money),
        ColumnSpec::new("Actual", ColumnKind::Money),
        ColumnSpec::new("Start", ColumnKind::Date),
        ColumnSpec::new("Vendor", ColumnKind::Reference).with_max(16),
        ColumnSpec::new("Notes", ColumnKind::Notes).flex().with_max(24),
        ColumnSpec::new("Quotes", ColumnKind::Drilldown),
    ]
}

/// Terse table builder: the first column is a numeric ID, the rest are
/// text. Empty strings become null cells. Row identifiers are 1-based row
/// positions.
pub fn table(title: &str, headers: &[&str], rows: &[&[&str]]) -> TableSnapshot {
    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let kind = if index == 0 {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            };
            ColumnSpec::new(*header, kind)
        })
        .collect::<Vec<_>>();
    let kinds = columns.iter().map(|column| column.kind).collect::<Vec<_>>();

    let mut snapshot = TableSnapshot::new(title, columns);
    for (index, row) in rows.iter().enumerate() {
        let cells = row
            .iter()
            .zip(&kinds)
            .map(|(value, kind)| {
                if value.is_empty() {
                    Cell::null(*kind)
                } else {
                    Cell::new(*kind, *value)
                }
            })
            .collect();
        let id = i64::try_from(index + 1).unwrap_or(i64::MAX);
        snapshot.push_row(RowMeta::new(id), cells);
    }
    snapshot
}

pub fn temp_data_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let data_path = dir.path().join("table.json");
    Ok((dir, data_path))
}

/// Fixed "today" for generated dates.
pub fn fixture_date() -> Date {
    Date::from_calendar_date(2026, Month::February, 19).unwrap_or(Date::MIN)
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        comma_format(cents / 100),
        cents % 100
    )
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn optional(kind: ColumnKind, value: Option<String>) -> Cell {
    value.map_or_else(|| Cell::null(kind), |value| Cell::new(kind, value))
}

fn comma_format(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
