// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tabula_app::{Cell, ColumnSpec, SortEntry, TableSnapshot, ViewState};
use tracing::{debug, warn};

use crate::LayoutError;

pub fn visible_columns(state: &ViewState, column_count: usize) -> Vec<usize> {
    (0..column_count)
        .filter(|index| !state.is_hidden(*index))
        .collect()
}

pub fn visible_count(state: &ViewState, column_count: usize) -> usize {
    (0..column_count)
        .filter(|index| !state.is_hidden(*index))
        .count()
}

/// Hides `column`, refusing to hide the last visible one. On success the
/// cursor moves off the hidden column.
pub fn hide(state: &mut ViewState, column_count: usize, column: usize) -> Result<(), LayoutError> {
    if column >= column_count {
        return Err(LayoutError::ColumnOutOfRange {
            column,
            count: column_count,
        });
    }
    if state.is_hidden(column) {
        return Err(LayoutError::AlreadyHidden { column });
    }
    if visible_count(state, column_count) <= 1 {
        warn!(column, "refused to hide last visible column");
        return Err(LayoutError::LastVisibleColumn { column });
    }

    state.hidden.push(column);
    debug!(column, hide_order = state.hidden.len(), "column hidden");
    if state.cursor_col == column {
        state.cursor_col = coerce_visible(state, column_count, column).unwrap_or(0);
    }
    Ok(())
}

pub fn show_all(state: &mut ViewState) {
    if !state.hidden.is_empty() {
        debug!(count = state.hidden.len(), "showing all columns");
    }
    state.hidden.clear();
}

/// Next visible column from `from` in the given direction, or `from` itself
/// at the edge. Never wraps.
pub fn next_visible_column(
    state: &ViewState,
    column_count: usize,
    from: usize,
    forward: bool,
) -> usize {
    if forward {
        ((from + 1)..column_count)
            .find(|index| !state.is_hidden(*index))
            .unwrap_or(from)
    } else {
        (0..from.min(column_count))
            .rev()
            .find(|index| !state.is_hidden(*index))
            .unwrap_or(from)
    }
}

/// Nearest visible column to `column`, preferring the right.
fn coerce_visible(state: &ViewState, column_count: usize, column: usize) -> Option<usize> {
    let visible = visible_columns(state, column_count);
    match visible.binary_search(&column) {
        Ok(index) => Some(visible[index]),
        Err(index) if index < visible.len() => Some(visible[index]),
        Err(_) => visible.last().copied(),
    }
}

/// Brings a state back in line with a (possibly reloaded) snapshot shape:
/// drops stale hidden and sort entries, keeps at least one column visible
/// and moves the cursor onto a real, visible cell position.
pub fn clamp_cursor(state: &mut ViewState, row_count: usize, column_count: usize) {
    state.hidden.retain(|column| *column < column_count);
    state.sorts.retain(|sort| sort.column < column_count);

    if column_count == 0 {
        state.hidden.clear();
        state.cursor_col = 0;
        state.scroll_offset = 0;
    } else {
        if visible_count(state, column_count) == 0 {
            show_all(state);
        }
        state.cursor_col = coerce_visible(state, column_count, state.cursor_col).unwrap_or(0);
    }

    state.cursor_row = if row_count == 0 {
        0
    } else {
        state.cursor_row.min(row_count - 1)
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleProjection {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Cell>>,
    /// Cursor column in visible space; `None` when it sits on a hidden column.
    pub cursor: Option<usize>,
    /// Sort keys re-expressed in visible space. Keys on hidden columns are
    /// dropped.
    pub sorts: Vec<SortEntry>,
    /// Visible index to full index.
    pub full_index: Vec<usize>,
}

impl VisibleProjection {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn full_column(&self, visible: usize) -> Option<usize> {
        self.full_index.get(visible).copied()
    }

    pub fn visible_index(&self, full: usize) -> Option<usize> {
        self.full_index.iter().position(|index| *index == full)
    }
}

pub fn visible_projection(snapshot: &TableSnapshot, state: &ViewState) -> VisibleProjection {
    let full_index = visible_columns(state, snapshot.column_count());
    let columns = full_index
        .iter()
        .map(|index| snapshot.columns[*index].clone())
        .collect();
    let rows = snapshot
        .rows
        .iter()
        .map(|row| {
            full_index
                .iter()
                .filter_map(|index| row.get(*index).cloned())
                .collect()
        })
        .collect();

    let position = |full: usize| full_index.iter().position(|index| *index == full);
    let cursor = position(state.cursor_col);
    let sorts = state
        .sorts
        .iter()
        .filter_map(|sort| {
            position(sort.column).map(|column| SortEntry {
                column,
                direction: sort.direction,
            })
        })
        .collect();

    VisibleProjection {
        columns,
        rows,
        cursor,
        sorts,
        full_index,
    }
}
