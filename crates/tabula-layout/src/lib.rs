// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Layout arithmetic and ordering for tables drawn inside a fixed character
//! grid: column widths, hidden-column projection, horizontal windowing,
//! collapsed-column stacks, multi-key sorting and dashboard line budgets.
//!
//! Every function here is pure over its inputs plus an explicit
//! [`ViewState`](tabula_app::ViewState) borrowed from the caller.

pub mod budget;
pub mod dashboard;
pub mod error;
pub mod frame;
pub mod sort;
pub mod stack;
pub mod text;
pub mod viewport;
pub mod visibility;
pub mod width;

pub use budget::{distribute_dash_rows, distribute_sub_limits, fixed_cost, overhead};
pub use dashboard::render_dashboard;
pub use error::LayoutError;
pub use frame::{FrameLine, TableFrame, selected_cell, selected_row_meta, table_title};
pub use sort::{apply_sort, clear_sort, compare_cells, toggle_sort};
pub use stack::{
    CollapsedStack, StackEdge, StackEntry, StackLayout, collapsed_stacks, edge_chrome,
    render_stack_lines,
};
pub use text::{display_width, fit_cell, truncate_label};
pub use viewport::{ViewportRange, ensure_cursor_visible, scroll_into_view, viewport_range};
pub use visibility::{
    VisibleProjection, clamp_cursor, hide, next_visible_column, show_all, visible_columns,
    visible_count, visible_projection,
};
pub use width::{column_widths, natural_widths, total_width, widen_truncated};
