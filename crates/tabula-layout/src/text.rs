// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

pub fn display_width(value: &str) -> usize {
    UnicodeWidthStr::width(value)
}

/// Cuts `value` to at most `max_cells` terminal cells, ending in `…` when
/// anything was dropped.
pub fn truncate_label(value: &str, max_cells: usize) -> String {
    if display_width(value) <= max_cells {
        return value.to_owned();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in value.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// Pads or truncates `value` to exactly `width` cells.
pub fn fit_cell(value: &str, width: usize, right_align: bool) -> String {
    let text = truncate_label(value, width);
    let pad = width.saturating_sub(display_width(&text));
    if right_align {
        format!("{}{text}", " ".repeat(pad))
    } else {
        format!("{text}{}", " ".repeat(pad))
    }
}

/// Fits a header title plus its sort marker into `width`, truncating the
/// title first so the marker stays readable.
pub fn fit_header(title: &str, marker: &str, width: usize) -> String {
    let marker_width = display_width(marker);
    if marker_width == 0 || marker_width >= width {
        return fit_cell(&format!("{title}{marker}"), width, false);
    }
    let title = truncate_label(title, width - marker_width);
    fit_cell(&format!("{title}{marker}"), width, false)
}

#[cfg(test)]
mod tests {
    use super::{display_width, fit_cell, fit_header, truncate_label};

    #[test]
    fn wide_characters_count_two_cells() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_label_keeps_short_values() {
        assert_eq!(truncate_label("Budget", 6), "Budget");
        assert_eq!(truncate_label("Budget", 5), "Budg…");
        assert_eq!(truncate_label("Budget", 1), "…");
        assert_eq!(truncate_label("Budget", 0), "");
    }

    #[test]
    fn truncate_label_never_splits_wide_characters() {
        let cut = truncate_label("日本語", 4);
        assert_eq!(cut, "日…");
        assert!(display_width(&cut) <= 4);
    }

    #[test]
    fn fit_cell_pads_and_aligns() {
        assert_eq!(fit_cell("42", 5, true), "   42");
        assert_eq!(fit_cell("ab", 4, false), "ab  ");
        assert_eq!(fit_cell("abcdef", 4, false), "abc…");
    }

    #[test]
    fn fit_header_keeps_the_marker() {
        assert_eq!(fit_header("Budget", " ↑", 6), "Bud… ↑");
        assert_eq!(fit_header("ID", " ▲2", 6), "ID ▲2 ");
    }
}
