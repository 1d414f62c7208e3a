// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Horizontal windowing. Offsets count columns, not character cells, so one
//! key press always moves exactly one column regardless of its width.

use tabula_app::ViewState;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportRange {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    pub has_left: bool,
    pub has_right: bool,
}

impl ViewportRange {
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Columns cut off to the right, given the total column count.
    pub const fn hidden_right(&self, count: usize) -> usize {
        count.saturating_sub(self.end)
    }
}

/// One past the last column that fits when the window starts at `start`.
/// The start column is always included, even when it alone overflows.
fn window_end(widths: &[usize], separator: usize, available: usize, start: usize) -> usize {
    let mut used = 0;
    let mut end = start;
    while end < widths.len() {
        let need = if end > start {
            widths[end] + separator
        } else {
            widths[end]
        };
        if end > start && used + need > available {
            break;
        }
        used += need;
        end += 1;
    }
    end
}

pub fn viewport_range(
    widths: &[usize],
    separator: usize,
    available: usize,
    scroll_offset: usize,
    cursor: usize,
) -> ViewportRange {
    let count = widths.len();
    if count == 0 {
        return ViewportRange::default();
    }
    if available == 0 {
        let start = scroll_offset.min(count);
        return ViewportRange {
            start,
            end: start,
            has_left: start > 0,
            has_right: start < count,
        };
    }

    let cursor = cursor.min(count - 1);
    let mut start = scroll_offset.min(count - 1).min(cursor);
    let mut end = window_end(widths, separator, available, start);
    while cursor >= end {
        start += 1;
        end = window_end(widths, separator, available, start);
    }

    ViewportRange {
        start,
        end,
        has_left: start > 0,
        has_right: end < count,
    }
}

/// Pulls the persisted offset back so the cursor column can land inside a
/// valid window. Pushing the window right is left to [`viewport_range`],
/// which knows the widths.
pub fn ensure_cursor_visible(state: &mut ViewState, cursor: usize, column_count: usize) {
    if column_count == 0 {
        state.scroll_offset = 0;
        return;
    }
    let cursor = cursor.min(column_count - 1);
    state.scroll_offset = state.scroll_offset.min(cursor);
}

/// Clamps the offset, computes the window and persists its new start.
pub fn scroll_into_view(
    state: &mut ViewState,
    widths: &[usize],
    separator: usize,
    available: usize,
    cursor: usize,
) -> ViewportRange {
    ensure_cursor_visible(state, cursor, widths.len());
    let range = viewport_range(widths, separator, available, state.scroll_offset, cursor);
    if !range.is_empty() && range.start != state.scroll_offset {
        debug!(
            from = state.scroll_offset,
            to = range.start,
            cursor,
            "scroll offset adjusted"
        );
        state.scroll_offset = range.start;
    }
    range
}
