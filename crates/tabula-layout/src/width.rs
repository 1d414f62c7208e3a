// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Horizontal budget allocation across columns.

use std::cmp::Reverse;

use tabula_app::{Cell, ColumnSpec};
use tracing::debug;

use crate::text::display_width;

/// Width each column would take with no pressure at all. The configured
/// maximum is deliberately ignored here; it only applies once the natural
/// total no longer fits.
pub fn natural_widths(columns: &[ColumnSpec], rows: &[Vec<Cell>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let widest_cell = rows
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| display_width(cell.display()))
                .max()
                .unwrap_or(0);
            let widest_fixed = column
                .fixed_values
                .iter()
                .map(|value| display_width(value))
                .max()
                .unwrap_or(0);
            display_width(&column.title)
                .max(column.min)
                .max(widest_cell)
                .max(widest_fixed)
        })
        .collect()
}

pub fn total_width(widths: &[usize], separator: usize) -> usize {
    widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * separator
}

/// Allocates `width` cells among `columns`. Natural widths win when they
/// fit; otherwise every column is clamped to its maximum and any remaining
/// deficit is taken from non-flex columns before flex ones, never going
/// below a column's minimum.
pub fn column_widths(
    columns: &[ColumnSpec],
    rows: &[Vec<Cell>],
    width: usize,
    separator: usize,
) -> Vec<usize> {
    let count = columns.len();
    if count == 0 {
        return Vec::new();
    }

    let available = width.saturating_sub(count.saturating_sub(1) * separator);
    if count == 1 {
        return vec![available];
    }

    let natural = natural_widths(columns, rows);
    let natural_total = natural.iter().sum::<usize>();
    if natural_total <= available {
        return natural;
    }

    let mut widths = natural
        .iter()
        .zip(columns)
        .map(|(natural, column)| match column.max_width() {
            Some(max) => (*natural).min(max.max(floor(column))),
            None => *natural,
        })
        .collect::<Vec<_>>();

    let clamped_total = widths.iter().sum::<usize>();
    if clamped_total <= available {
        let unused = widen_truncated(&mut widths, &natural, available - clamped_total);
        debug!(available, clamped_total, unused, "widened clamped columns");
        return widths;
    }

    let left_over = shrink_to_fit(&mut widths, columns, clamped_total - available);
    if left_over > 0 {
        debug!(available, left_over, "column minimums exceed available width");
    }
    widths
}

/// Gives truncated columns back up to `extra` cells, most-truncated first,
/// never past their natural width. Returns what was not needed.
pub fn widen_truncated(widths: &mut [usize], natural: &[usize], extra: usize) -> usize {
    let mut truncated = widths
        .iter()
        .zip(natural)
        .enumerate()
        .filter(|(_, (width, natural))| natural > width)
        .map(|(index, (width, natural))| (index, natural - width))
        .collect::<Vec<_>>();
    truncated.sort_by_key(|(_, deficit)| Reverse(*deficit));

    let mut remaining = extra;
    for (index, deficit) in truncated {
        if remaining == 0 {
            break;
        }
        let grant = deficit.min(remaining);
        widths[index] += grant;
        remaining -= grant;
    }
    remaining
}

fn floor(column: &ColumnSpec) -> usize {
    column.min.max(1)
}

/// Takes `excess` cells away one at a time from the widest shrinkable
/// column, non-flex columns first. Returns the deficit that could not be
/// absorbed.
fn shrink_to_fit(widths: &mut [usize], columns: &[ColumnSpec], excess: usize) -> usize {
    let mut excess = excess;
    for flex_pass in [false, true] {
        while excess > 0 {
            let candidate = widths
                .iter()
                .zip(columns)
                .enumerate()
                .filter(|(_, (width, column))| column.flex == flex_pass && **width > floor(column))
                .max_by_key(|(index, (width, _))| (**width, *index))
                .map(|(index, _)| index);
            let Some(index) = candidate else {
                break;
            };
            widths[index] -= 1;
            excess -= 1;
        }
    }
    excess
}

#[cfg(test)]
mod tests {
    use super::{column_widths, natural_widths, total_width, widen_truncated};
    use tabula_app::{Cell, ColumnKind, ColumnSpec};

    fn text_rows(values: &[&[&str]]) -> Vec<Vec<Cell>> {
        values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| Cell::new(ColumnKind::Text, *value))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn natural_width_takes_widest_of_title_min_cells_and_fixed_values() {
        let columns = vec![
            ColumnSpec::new("ID", ColumnKind::Numeric).with_min(4),
            ColumnSpec::new("Status", ColumnKind::Text)
                .with_fixed_values(["planned", "underway", "abandoned"]),
            ColumnSpec::new("Notes", ColumnKind::Notes).with_max(5),
        ];
        let rows = text_rows(&[&["1", "planned", "a long note about the roof"]]);

        assert_eq!(natural_widths(&columns, &rows), vec![4, 9, 26]);
    }

    #[test]
    fn null_cells_measure_as_empty() {
        let columns = vec![ColumnSpec::new("X", ColumnKind::Money)];
        let mut null = Cell::null(ColumnKind::Money);
        null.value = "ignored".to_owned();
        assert_eq!(natural_widths(&columns, &[vec![null]]), vec![1]);
    }

    #[test]
    fn natural_widths_are_used_when_they_fit() {
        let columns = vec![
            ColumnSpec::new("ID", ColumnKind::Numeric),
            ColumnSpec::new("Title", ColumnKind::Text).with_max(3),
        ];
        let rows = text_rows(&[&["1", "Kitchen"]]);
        assert_eq!(column_widths(&columns, &rows, 40, 3), vec![2, 7]);
    }

    #[test]
    fn narrow_budget_fits_within_available_width() {
        let columns = vec![
            ColumnSpec::new("ID", ColumnKind::Numeric).with_min(4),
            ColumnSpec::new("Title", ColumnKind::Text).with_min(5),
        ];
        let rows = text_rows(&[&["1", "Replace the upstairs hvac"]]);
        assert_eq!(natural_widths(&columns, &rows), vec![4, 25]);

        let widths = column_widths(&columns, &rows, 20, 3);
        assert!(widths.iter().sum::<usize>() <= 17, "got {widths:?}");
        assert!(widths[0] >= 4);
        assert!(widths[1] >= 5);
        assert_eq!(total_width(&widths, 3), 20);
    }

    #[test]
    fn clamping_to_max_then_widening_restores_slack() {
        let columns = vec![
            ColumnSpec::new("A", ColumnKind::Text).with_max(4),
            ColumnSpec::new("B", ColumnKind::Text).with_max(4),
        ];
        let rows = text_rows(&[&["aaaaaaaaaa", "bbbbbb"]]);
        // natural [10, 6] = 16; clamped [4, 4]; available 12 leaves 4 to give back,
        // all to the most truncated column first.
        assert_eq!(column_widths(&columns, &rows, 13, 1), vec![8, 4]);
    }

    #[test]
    fn non_flex_columns_shrink_before_flex_columns() {
        let columns = vec![
            ColumnSpec::new("Title", ColumnKind::Text).flex().with_min(3),
            ColumnSpec::new("Vendor", ColumnKind::Reference).with_min(3),
        ];
        let rows = text_rows(&[&["abcdefghij", "abcdefghij"]]);
        let widths = column_widths(&columns, &rows, 16, 1);
        assert_eq!(widths, vec![10, 5]);
    }

    #[test]
    fn flex_columns_shrink_once_others_reach_minimum() {
        let columns = vec![
            ColumnSpec::new("Title", ColumnKind::Text).flex().with_min(3),
            ColumnSpec::new("Vendor", ColumnKind::Reference).with_min(3),
        ];
        let rows = text_rows(&[&["abcdefghij", "abcdefghij"]]);
        assert_eq!(column_widths(&columns, &rows, 10, 1), vec![6, 3]);
    }

    #[test]
    fn minimums_are_never_violated_even_when_they_overflow() {
        let columns = vec![
            ColumnSpec::new("A", ColumnKind::Text).with_min(6),
            ColumnSpec::new("B", ColumnKind::Text).with_min(6),
        ];
        let rows = text_rows(&[&["aaaaaaaa", "bbbbbbbb"]]);
        assert_eq!(column_widths(&columns, &rows, 8, 1), vec![6, 6]);
    }

    #[test]
    fn single_column_takes_whole_width() {
        let columns = vec![ColumnSpec::new("Title", ColumnKind::Text)];
        let rows = text_rows(&[&["x"]]);
        assert_eq!(column_widths(&columns, &rows, 30, 3), vec![30]);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        assert!(column_widths(&[], &[], 80, 3).is_empty());
        assert_eq!(total_width(&[], 3), 0);
    }

    #[test]
    fn widen_truncated_serves_most_truncated_first() {
        let natural = [10, 6, 3];
        let mut widths = [4, 4, 3];
        let remainder = widen_truncated(&mut widths, &natural, 5);
        assert_eq!(remainder, 0);
        assert_eq!(widths, [9, 4, 3]);
    }

    #[test]
    fn widen_truncated_returns_unused_budget() {
        let natural = [10, 6];
        let mut widths = [4, 4];
        let remainder = widen_truncated(&mut widths, &natural, 100);
        assert_eq!(widths, natural);
        assert_eq!(remainder, 92);
    }

    #[test]
    fn widen_truncated_with_zero_extra_is_a_no_op() {
        let natural = [10, 6];
        let mut widths = [4, 4];
        assert_eq!(widen_truncated(&mut widths, &natural, 0), 0);
        assert_eq!(widths, [4, 4]);
    }
}
