// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Collapsed-column stacks: compact markers for runs of hidden columns,
//! drawn under the table at the gap (or edge) where the columns used to be.

use std::ops::Range;

use tabula_app::{ColumnSpec, ViewState};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::text::display_width;
use crate::viewport::ViewportRange;
use crate::visibility::visible_columns;

/// Cells reserved at a table edge for a stack's corner glyph and its gap.
pub const EDGE_CHROME: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEdge {
    Leading,
    Between,
    Trailing,
    /// Leading and trailing stacks merged because they would overlap.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub column: usize,
    pub name: String,
    /// Zero is the entry closest to the visible data.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    pub edge: StackEdge,
    /// Ordered by depth.
    pub entries: Vec<StackEntry>,
    pub offset: usize,
    pub width: usize,
}

impl CollapsedStack {
    pub fn label_width(&self) -> usize {
        label_width(&self.entries)
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    pub fn columns(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.column).collect()
    }

    fn entry_text(&self, entry: &StackEntry) -> (usize, String) {
        let last = entry.depth + 1 == self.entries.len();
        let name_width = display_width(&entry.name);
        match self.edge {
            StackEdge::Leading => {
                let glyph = if last { '╰' } else { '├' };
                (self.offset, format!("{glyph} {}", entry.name))
            }
            StackEdge::Trailing => {
                let glyph = if last { '╯' } else { '┤' };
                let x = self.end().saturating_sub(name_width + EDGE_CHROME);
                (x, format!("{} {glyph}", entry.name))
            }
            StackEdge::Between => {
                let x = self.offset + self.width.saturating_sub(name_width) / 2;
                (x, entry.name.clone())
            }
            StackEdge::Both => {
                let (left, right) = if last { ('╰', '╯') } else { ('├', '┤') };
                let pad = self
                    .width
                    .saturating_sub(2 * EDGE_CHROME)
                    .saturating_sub(name_width);
                (
                    self.offset,
                    format!("{left} {}{} {right}", entry.name, " ".repeat(pad)),
                )
            }
        }
    }
}

/// Everything needed to place stacks relative to the drawn columns.
#[derive(Debug, Clone, Copy)]
pub struct StackLayout<'a> {
    /// Full column set.
    pub columns: &'a [ColumnSpec],
    pub state: &'a ViewState,
    /// Visible index to full index.
    pub full_index: &'a [usize],
    /// Widths of the visible columns.
    pub widths: &'a [usize],
    pub range: ViewportRange,
    pub separator: usize,
}

/// Cells to reserve on the (left, right) of the table for edge stacks.
pub fn edge_chrome(state: &ViewState, column_count: usize) -> (usize, usize) {
    let visible = visible_columns(state, column_count);
    match (visible.first(), visible.last()) {
        (Some(first), Some(last)) => (
            if *first > 0 { EDGE_CHROME } else { 0 },
            if *last + 1 < column_count {
                EDGE_CHROME
            } else {
                0
            },
        ),
        _ => (0, 0),
    }
}

pub fn collapsed_stacks(layout: &StackLayout<'_>) -> Vec<CollapsedStack> {
    let count = layout.columns.len();
    let map = layout.full_index;
    let (Some(&first), Some(&last)) = (map.first(), map.last()) else {
        return Vec::new();
    };
    if layout.state.hidden.is_empty() {
        return Vec::new();
    }

    let (lead_chrome, trail_chrome) = edge_chrome(layout.state, count);
    let start = layout.range.start.min(map.len());
    let end = layout.range.end.min(map.len()).min(layout.widths.len());

    let mut gaps: Vec<(Range<usize>, usize)> = Vec::new();
    let mut x = lead_chrome;
    for visible in start..end {
        let right_edge = x + layout.widths[visible];
        if visible + 1 < end {
            let (left, right) = (map[visible], map[visible + 1]);
            if right > left + 1 {
                gaps.push((left + 1..right, right_edge + layout.separator / 2));
            }
            x = right_edge + layout.separator;
        } else {
            x = right_edge;
        }
    }
    let table_width = x + trail_chrome;

    let leading = (first > 0).then(|| {
        let entries = entries_by_depth(layout.columns, (0..first).rev());
        let width = label_width(&entries) + EDGE_CHROME;
        CollapsedStack {
            edge: StackEdge::Leading,
            entries,
            offset: 0,
            width,
        }
    });
    let trailing = (last + 1 < count).then(|| {
        let entries = entries_by_depth(layout.columns, last + 1..count);
        let width = label_width(&entries) + EDGE_CHROME;
        CollapsedStack {
            edge: StackEdge::Trailing,
            entries,
            offset: table_width.saturating_sub(width),
            width,
        }
    });
    let between = gaps.into_iter().map(|(columns, gap)| {
        let entries = entries_by_depth(layout.columns, columns);
        let width = label_width(&entries);
        let offset = gap
            .saturating_sub(width / 2)
            .min(table_width.saturating_sub(width));
        CollapsedStack {
            edge: StackEdge::Between,
            entries,
            offset,
            width,
        }
    });

    let mut stacks = Vec::new();
    match (leading, trailing) {
        (Some(leading), Some(trailing)) if leading.end() > trailing.offset => {
            debug!(
                leading_end = leading.end(),
                trailing_start = trailing.offset,
                "merging edge stacks"
            );
            stacks.push(merge_edges(layout, &leading, &trailing));
            stacks.extend(between);
        }
        (leading, trailing) => {
            stacks.extend(leading);
            stacks.extend(between);
            stacks.extend(trailing);
        }
    }
    merge_overlapping(stacks)
}

/// Folds each stack into its left neighbour while their footprints overlap.
/// Stacks arrive in left-to-right order.
fn merge_overlapping(stacks: Vec<CollapsedStack>) -> Vec<CollapsedStack> {
    let mut merged: Vec<CollapsedStack> = Vec::with_capacity(stacks.len());
    for stack in stacks {
        merged.push(stack);
        while merged.len() > 1 {
            let right = merged.len() - 1;
            if merged[right - 1].end() <= merged[right].offset {
                break;
            }
            let (Some(right), Some(left)) = (merged.pop(), merged.pop()) else {
                break;
            };
            debug!(
                left_end = left.end(),
                right_start = right.offset,
                "merging overlapping stacks"
            );
            merged.push(merge_pair(left, right));
        }
    }
    merged
}

fn merge_pair(left: CollapsedStack, right: CollapsedStack) -> CollapsedStack {
    let edge = match (left.edge, right.edge) {
        (StackEdge::Leading | StackEdge::Both, StackEdge::Trailing | StackEdge::Both) => {
            StackEdge::Both
        }
        (StackEdge::Both, _) | (_, StackEdge::Both) => StackEdge::Both,
        (StackEdge::Leading, _) => StackEdge::Leading,
        (_, StackEdge::Trailing) => StackEdge::Trailing,
        _ => StackEdge::Between,
    };
    let start = left.offset.min(right.offset);
    let end = left.end().max(right.end());

    let entries = left
        .entries
        .into_iter()
        .chain(right.entries)
        .enumerate()
        .map(|(depth, entry)| StackEntry { depth, ..entry })
        .collect::<Vec<_>>();

    let chrome = match edge {
        StackEdge::Leading | StackEdge::Trailing => EDGE_CHROME,
        StackEdge::Both => 2 * EDGE_CHROME,
        StackEdge::Between => 0,
    };
    let width = (end - start).max(label_width(&entries) + chrome);
    let offset = match edge {
        StackEdge::Trailing => end.saturating_sub(width),
        _ => start,
    };
    CollapsedStack {
        edge,
        entries,
        offset,
        width,
    }
}

fn entries_by_depth(
    columns: &[ColumnSpec],
    order: impl IntoIterator<Item = usize>,
) -> Vec<StackEntry> {
    order
        .into_iter()
        .enumerate()
        .map(|(depth, column)| StackEntry {
            column,
            name: columns
                .get(column)
                .map(|spec| spec.title.clone())
                .unwrap_or_default(),
            depth,
        })
        .collect()
}

fn label_width(entries: &[StackEntry]) -> usize {
    entries
        .iter()
        .map(|entry| display_width(&entry.name))
        .max()
        .unwrap_or(0)
}

fn merge_edges(
    layout: &StackLayout<'_>,
    leading: &CollapsedStack,
    trailing: &CollapsedStack,
) -> CollapsedStack {
    let by_hide_order = |stack: &CollapsedStack| {
        let mut columns = stack.columns();
        columns.sort_by_key(|column| layout.state.hide_order(*column));
        columns
    };
    let mut order = by_hide_order(leading);
    order.extend(by_hide_order(trailing));

    let entries = entries_by_depth(layout.columns, order);
    let union_end = leading.end().max(trailing.end());
    let width = union_end.max(label_width(&entries) + 2 * EDGE_CHROME);
    CollapsedStack {
        edge: StackEdge::Both,
        entries,
        offset: 0,
        width,
    }
}

/// Draws stacks as lines of text, one line per depth. Stacks are expected
/// not to overlap; if labels do collide, the one drawn first keeps the cells.
pub fn render_stack_lines(stacks: &[CollapsedStack]) -> Vec<String> {
    let depth = stacks
        .iter()
        .map(|stack| stack.entries.len())
        .max()
        .unwrap_or(0);
    let width = stacks.iter().map(CollapsedStack::end).max().unwrap_or(0);

    (0..depth)
        .map(|level| {
            let mut line = LineBuffer::new(width);
            for stack in stacks {
                if let Some(entry) = stack.entries.get(level) {
                    let (x, text) = stack.entry_text(entry);
                    line.put(x, &text);
                }
            }
            line.finish()
        })
        .collect()
}

struct LineBuffer {
    cells: Vec<Option<String>>,
}

impl LineBuffer {
    fn new(width: usize) -> Self {
        Self {
            cells: vec![None; width],
        }
    }

    fn put(&mut self, x: usize, text: &str) {
        let mut column = x;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if column + width > self.cells.len() {
                break;
            }
            if self.cells[column..column + width].iter().all(Option::is_none) {
                self.cells[column] = Some(ch.to_string());
                for filler in &mut self.cells[column + 1..column + width] {
                    *filler = Some(String::new());
                }
            }
            column += width;
        }
    }

    fn finish(self) -> String {
        let line = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| " ".to_owned()))
            .collect::<String>();
        line.trim_end().to_owned()
    }
}
