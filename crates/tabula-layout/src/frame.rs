// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! One render pass over a table: projection, widths, window and stacks
//! computed in a fixed order, then assembled into text lines.

use std::ops::Range;

use tabula_app::{Cell, RowMeta, SortDirection, TableSnapshot, ViewState};

use crate::stack::{CollapsedStack, StackLayout, collapsed_stacks, edge_chrome, render_stack_lines};
use crate::text::{display_width, fit_cell, fit_header, truncate_label};
use crate::viewport::{ViewportRange, scroll_into_view};
use crate::visibility::{VisibleProjection, clamp_cursor, visible_count, visible_projection};
use crate::width::column_widths;

const RULE: &str = "─";
/// Marks a column holding navigable cross-references.
const LINK_ARROW: &str = " →";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLine {
    Header,
    Rule,
    /// Index into the projected rows.
    Row(usize),
    /// Index into the collapsed-stack lines.
    Stack(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFrame {
    pub projection: VisibleProjection,
    /// Widths of all visible columns, not just the windowed ones.
    pub widths: Vec<usize>,
    pub range: ViewportRange,
    pub stacks: Vec<CollapsedStack>,
    pub stack_lines: Vec<String>,
    pub separator: String,
    pub lead_chrome: usize,
    pub trail_chrome: usize,
    pub cursor_row: usize,
}

impl TableFrame {
    /// Runs the layout pipeline for `width` cells. Updates the cursor and
    /// scroll offset in `state` as needed to keep them valid and visible.
    pub fn compute(
        snapshot: &TableSnapshot,
        state: &mut ViewState,
        width: usize,
        separator: &str,
    ) -> Self {
        clamp_cursor(state, snapshot.row_count(), snapshot.column_count());
        let projection = visible_projection(snapshot, state);

        let (lead_chrome, trail_chrome) = edge_chrome(state, snapshot.column_count());
        let available = width.saturating_sub(lead_chrome + trail_chrome);
        let separator_width = display_width(separator);
        let widths = column_widths(
            &projection.columns,
            &projection.rows,
            available,
            separator_width,
        );

        let cursor = projection.cursor.unwrap_or(0);
        let range = scroll_into_view(state, &widths, separator_width, available, cursor);

        let stacks = collapsed_stacks(&StackLayout {
            columns: &snapshot.columns,
            state,
            full_index: &projection.full_index,
            widths: &widths,
            range,
            separator: separator_width,
        });
        let stack_lines = render_stack_lines(&stacks);

        Self {
            projection,
            widths,
            range,
            stacks,
            stack_lines,
            separator: separator.to_owned(),
            lead_chrome,
            trail_chrome,
            cursor_row: state.cursor_row,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projection.column_count() == 0
    }

    /// Visible column indices inside the horizontal window.
    pub fn window(&self) -> Range<usize> {
        self.range.start..self.range.end.min(self.widths.len())
    }

    /// Cursor position within the windowed cells, if it is on screen.
    pub fn cursor_cell(&self) -> Option<usize> {
        self.projection
            .cursor
            .filter(|cursor| self.range.contains(*cursor))
            .map(|cursor| cursor - self.range.start)
    }

    /// Width of the drawn table including edge chrome.
    pub fn table_width(&self) -> usize {
        let window = self.window();
        let content = self.widths[window.clone()].iter().sum::<usize>()
            + window.len().saturating_sub(1) * display_width(&self.separator);
        self.lead_chrome + content + self.trail_chrome
    }

    pub fn left_badge(&self) -> Option<String> {
        self.range
            .has_left
            .then(|| format!("◀ {}", self.range.start))
    }

    pub fn right_badge(&self) -> Option<String> {
        let hidden = self.range.hidden_right(self.widths.len());
        (hidden > 0).then(|| format!("{hidden} ▶"))
    }

    fn sort_marker(&self, visible: usize) -> String {
        let sorts = &self.projection.sorts;
        let Some((priority, sort)) = sorts
            .iter()
            .enumerate()
            .find(|(_, sort)| sort.column == visible)
        else {
            return String::new();
        };
        match (sorts.len(), sort.direction) {
            (1, SortDirection::Asc) => " ↑".to_owned(),
            (1, SortDirection::Desc) => " ↓".to_owned(),
            (_, SortDirection::Asc) => format!(" ▲{}", priority + 1),
            (_, SortDirection::Desc) => format!(" ▼{}", priority + 1),
        }
    }

    fn has_links(&self, visible: usize) -> bool {
        self.projection
            .rows
            .iter()
            .filter_map(|row| row.get(visible))
            .any(Cell::has_link)
    }

    pub fn header_cells(&self) -> Vec<String> {
        self.window()
            .map(|visible| {
                let link = if self.has_links(visible) { LINK_ARROW } else { "" };
                fit_header(
                    &self.projection.columns[visible].title,
                    &format!("{link}{}", self.sort_marker(visible)),
                    self.widths[visible],
                )
            })
            .collect()
    }

    pub fn body_cells(&self, row: usize) -> Vec<String> {
        let cells = self.projection.rows.get(row);
        self.window()
            .map(|visible| {
                let width = self.widths[visible];
                match cells.and_then(|cells| cells.get(visible)) {
                    Some(cell) => fit_cell(cell.display(), width, cell.kind.right_aligned()),
                    None => " ".repeat(width),
                }
            })
            .collect()
    }

    /// Joins windowed cells with the separator, inside the edge chrome.
    pub fn join_cells(&self, cells: &[String]) -> String {
        let line = format!(
            "{}{}",
            " ".repeat(self.lead_chrome),
            cells.join(&self.separator)
        );
        line.trim_end().to_owned()
    }

    pub fn header_line(&self) -> String {
        self.join_cells(&self.header_cells())
    }

    pub fn body_line(&self, row: usize) -> String {
        self.join_cells(&self.body_cells(row))
    }

    /// A horizontal rule under the header carrying the overflow badges.
    pub fn rule_line(&self) -> String {
        let width = self.table_width();
        let left = self
            .left_badge()
            .map(|badge| format!("{badge} "))
            .unwrap_or_default();
        let right = self
            .right_badge()
            .map(|badge| format!(" {badge}"))
            .unwrap_or_default();
        let fill = width.saturating_sub(display_width(&left) + display_width(&right));
        truncate_label(&format!("{left}{}{right}", RULE.repeat(fill)), width)
    }

    /// Rows to show when `count` lines are available, keeping the cursor
    /// row in view.
    pub fn row_window(&self, count: usize) -> Range<usize> {
        let total = self.projection.rows.len();
        let count = count.min(total);
        let start = (self.cursor_row + 1).saturating_sub(count).min(total - count);
        start..start + count
    }

    /// Decides which lines fit in `height`. Header and rule come first, then
    /// the cursor row, then stack lines, then the remaining rows.
    pub fn plan_lines(&self, height: usize) -> Vec<FrameLine> {
        if self.is_empty() || height == 0 {
            return Vec::new();
        }
        let mut budget = height;
        let mut lines = vec![FrameLine::Header];
        budget -= 1;
        if budget > 0 {
            lines.push(FrameLine::Rule);
            budget -= 1;
        }

        let row_count = self.projection.rows.len();
        let cursor_row = usize::from(row_count > 0).min(budget);
        budget -= cursor_row;
        let stacks = self.stack_lines.len().min(budget);
        budget -= stacks;
        let rows = (cursor_row + budget).min(row_count);

        lines.extend(self.row_window(rows).map(FrameLine::Row));
        lines.extend((0..stacks).map(FrameLine::Stack));
        lines
    }

    pub fn render_lines(&self, height: usize) -> Vec<String> {
        self.plan_lines(height)
            .into_iter()
            .map(|line| match line {
                FrameLine::Header => self.header_line(),
                FrameLine::Rule => self.rule_line(),
                FrameLine::Row(row) => self.body_line(row),
                FrameLine::Stack(index) => self.stack_lines[index].clone(),
            })
            .collect()
    }
}

/// Title bar text summarizing rows, columns, sort keys, deleted rows and
/// hidden columns.
pub fn table_title(snapshot: &TableSnapshot, state: &ViewState) -> String {
    let total = snapshot.column_count();
    let mut parts = vec![format!(
        "{} r:{} c:{}/{}",
        snapshot.title,
        snapshot.row_count(),
        visible_count(state, total),
        total,
    )];

    let labels = state
        .sorts
        .iter()
        .enumerate()
        .filter_map(|(index, sort)| {
            snapshot.columns.get(sort.column).map(|column| {
                format!(
                    "{}:{}#{}",
                    column.title,
                    sort.direction.as_str(),
                    index + 1
                )
            })
        })
        .collect::<Vec<_>>();
    if !labels.is_empty() {
        parts.push(format!("sort {}", labels.join(",")));
    }

    let deleted = snapshot.deleted_count();
    if deleted > 0 {
        parts.push(format!("del {deleted}"));
    }
    let hidden = state.hidden.iter().filter(|column| **column < total).count();
    if hidden > 0 {
        parts.push(format!("hidden {hidden}"));
    }
    parts.join(" | ")
}

/// Cell under the cursor, or `None` when the cursor is out of range or on
/// a hidden column.
pub fn selected_cell<'a>(snapshot: &'a TableSnapshot, state: &ViewState) -> Option<&'a Cell> {
    if state.is_hidden(state.cursor_col) {
        return None;
    }
    snapshot.cell(state.cursor_row, state.cursor_col)
}

pub fn selected_row_meta(snapshot: &TableSnapshot, state: &ViewState) -> Option<RowMeta> {
    snapshot.row_meta(state.cursor_row)
}
