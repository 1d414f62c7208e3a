// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use tabula_app::{Cell, ColumnKind, RowMeta, SortDirection, SortEntry, TableSnapshot, ViewState};
use time::Date;
use time::macros::format_description;
use tracing::debug;

/// Cycles `column` through ascending, descending and removed. A column not
/// yet in the stack is appended at the lowest priority. Returns the
/// column's direction afterwards.
pub fn toggle_sort(state: &mut ViewState, column: usize) -> Option<SortDirection> {
    match state.sorts.iter().position(|sort| sort.column == column) {
        Some(index) => match state.sorts[index].direction {
            SortDirection::Asc => {
                state.sorts[index].direction = SortDirection::Desc;
                Some(SortDirection::Desc)
            }
            SortDirection::Desc => {
                state.sorts.remove(index);
                None
            }
        },
        None => {
            state.sorts.push(SortEntry::asc(column));
            Some(SortDirection::Asc)
        }
    }
}

pub fn clear_sort(state: &mut ViewState) {
    state.sorts.clear();
}

/// Reorders rows (and their metadata) by `sorts`, then by ascending row
/// identifier. The sort is stable.
pub fn apply_sort(snapshot: &mut TableSnapshot, sorts: &[SortEntry]) {
    if snapshot.rows.len() < 2 {
        return;
    }
    let keys = sort_keys(sorts, snapshot.column_count());
    let with_meta = snapshot.meta.len() == snapshot.rows.len();

    let mut order = (0..snapshot.rows.len()).collect::<Vec<_>>();
    order.sort_by(|left, right| {
        compare_rows(&snapshot.rows[*left], &snapshot.rows[*right], &keys).then_with(|| {
            if with_meta {
                compare_ids(&snapshot.meta[*left], &snapshot.meta[*right])
            } else {
                Ordering::Equal
            }
        })
    });
    debug!(
        table = %snapshot.title,
        rows = order.len(),
        keys = keys.len(),
        "rows sorted"
    );

    snapshot.rows = permute(std::mem::take(&mut snapshot.rows), &order);
    if with_meta {
        snapshot.meta = permute(std::mem::take(&mut snapshot.meta), &order);
    }
}

fn sort_keys(sorts: &[SortEntry], column_count: usize) -> Vec<SortEntry> {
    sorts
        .iter()
        .filter(|sort| sort.column < column_count)
        .copied()
        .collect()
}

fn compare_ids(left: &RowMeta, right: &RowMeta) -> Ordering {
    left.id.cmp(&right.id)
}

fn permute<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots = items.into_iter().map(Some).collect::<Vec<_>>();
    order
        .iter()
        .filter_map(|index| slots.get_mut(*index).and_then(Option::take))
        .collect()
}

fn compare_rows(left: &[Cell], right: &[Cell], keys: &[SortEntry]) -> Ordering {
    for key in keys {
        let left_value = left.get(key.column).filter(|cell| !cell.is_null());
        let right_value = right.get(key.column).filter(|cell| !cell.is_null());
        let order = match (left_value, right_value) {
            (None, None) => continue,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(left), Some(right)) => match key.direction {
                SortDirection::Asc => compare_cells(left, right),
                SortDirection::Desc => compare_cells(left, right).reverse(),
            },
        };
        if order != Ordering::Equal {
            return order;
        }
    }
    Ordering::Equal
}

/// Type-aware comparison of two non-null cells. Values that fail to parse
/// as their kind compare as case-insensitive text.
pub fn compare_cells(left: &Cell, right: &Cell) -> Ordering {
    let (left_text, right_text) = (left.display(), right.display());
    if left.kind != right.kind {
        return compare_text(left_text, right_text);
    }
    let typed = match left.kind {
        ColumnKind::Money => {
            both(parse_cents(left_text), parse_cents(right_text)).map(|(l, r)| l.cmp(&r))
        }
        ColumnKind::Date => {
            both(parse_date(left_text), parse_date(right_text)).map(|(l, r)| l.cmp(&r))
        }
        ColumnKind::Numeric | ColumnKind::Reference | ColumnKind::Drilldown => {
            both(parse_number(left_text), parse_number(right_text)).map(|(l, r)| l.total_cmp(&r))
        }
        ColumnKind::Text | ColumnKind::Notes => None,
    };
    typed.unwrap_or_else(|| compare_text(left_text, right_text))
}

fn both<T>(left: Option<T>, right: Option<T>) -> Option<(T, T)> {
    left.zip(right)
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), &format_description!("[year]-[month]-[day]")).ok()
}

fn parse_number(value: &str) -> Option<f64> {
    let clean = value
        .trim()
        .trim_start_matches('#')
        .chars()
        .filter(|ch| !matches!(ch, ',' | '_'))
        .collect::<String>();
    if clean.is_empty() {
        return None;
    }
    clean.parse::<f64>().ok().filter(|number| !number.is_nan())
}

/// Parses display money such as `$1,234.50`, `-$3.00`, `($3.00)` or the
/// compact `$1.2k` / `$3M` / `$1B` forms into cents.
fn parse_cents(value: &str) -> Option<i64> {
    let mut text = value.trim();
    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = !negative;
        text = rest.trim_start();
    }
    let text = text.strip_prefix('$').unwrap_or(text).replace(',', "");

    let (digits, scale) = match text.char_indices().last() {
        Some((index, 'k' | 'K')) => (&text[..index], 1_000_i128),
        Some((index, 'M')) => (&text[..index], 1_000_000),
        Some((index, 'B')) => (&text[..index], 1_000_000_000),
        _ => (text.as_str(), 1),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i128>().ok()?
    };
    let fraction_cents = if fraction.is_empty() {
        0
    } else {
        let denominator = 10_i128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        fraction.parse::<i128>().ok()?.checked_mul(scale * 100)? / denominator
    };
    let cents = whole.checked_mul(scale * 100)?.checked_add(fraction_cents)?;
    let cents = i64::try_from(cents).ok()?;
    Some(if negative { -cents } else { cents })
}
