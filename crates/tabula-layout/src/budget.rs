// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Vertical line budgets for the summary dashboard.

use tabula_app::DashboardSection;

/// Row allocation per section for `available` data lines. When everything
/// fits each section gets its full count. Otherwise every section gets one
/// line, the rest is split in proportion to each section's excess, and
/// rounding leftovers go to the section furthest from its full count.
pub fn distribute_dash_rows(counts: &[usize], available: usize) -> Vec<usize> {
    distribute(counts, available)
}

/// The same split one level down, across the named groups of one section.
/// Empty groups get nothing.
pub fn distribute_sub_limits(sub_counts: &[usize], limit: usize) -> Vec<usize> {
    distribute(sub_counts, limit)
}

fn distribute(counts: &[usize], budget: usize) -> Vec<usize> {
    let total = counts.iter().sum::<usize>();
    if total <= budget {
        return counts.to_vec();
    }

    let mut allocation = vec![0; counts.len()];
    let mut remaining = budget;
    for (slot, count) in allocation.iter_mut().zip(counts) {
        if remaining == 0 {
            break;
        }
        if *count > 0 {
            *slot = 1;
            remaining -= 1;
        }
    }

    let total_excess = counts
        .iter()
        .zip(&allocation)
        .map(|(count, given)| count - given)
        .sum::<usize>();
    if total_excess > 0 && remaining > 0 {
        let pool = remaining;
        for (slot, count) in allocation.iter_mut().zip(counts) {
            let excess = count - *slot;
            let share = (pool * excess / total_excess).min(excess);
            *slot += share;
            remaining -= share;
        }
    }

    while remaining > 0 {
        let widest_gap = counts
            .iter()
            .zip(&allocation)
            .enumerate()
            .map(|(index, (count, given))| (index, count - given))
            .filter(|(_, gap)| *gap > 0)
            .max_by(|(left_index, left_gap), (right_index, right_gap)| {
                left_gap.cmp(right_gap).then(right_index.cmp(left_index))
            });
        let Some((index, _)) = widest_gap else {
            break;
        };
        allocation[index] += 1;
        remaining -= 1;
    }
    allocation
}

/// Header and separator lines a section costs before any of its rows.
pub fn overhead(section: &DashboardSection) -> usize {
    if section.groups.len() <= 1 {
        return 1;
    }
    let non_empty = section.groups.iter().filter(|group| group.count > 0).count();
    if non_empty == 0 { 1 } else { 2 * non_empty - 1 }
}

/// Lines spent on section overheads, the blanks between sections and the
/// footer.
pub fn fixed_cost<'a>(
    sections: impl IntoIterator<Item = &'a DashboardSection>,
    footer_lines: usize,
) -> usize {
    let (count, overheads) = sections
        .into_iter()
        .fold((0_usize, 0_usize), |(count, total), section| {
            (count + 1, total + overhead(section))
        });
    overheads + count.saturating_sub(1) + footer_lines
}

#[cfg(test)]
mod tests {
    use super::{distribute_dash_rows, distribute_sub_limits, fixed_cost, overhead};
    use tabula_app::DashboardSection;

    fn rows(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("row {index}")).collect()
    }

    #[test]
    fn everything_fits_gets_full_counts() {
        assert_eq!(distribute_dash_rows(&[3, 2], 10), vec![3, 2]);
        assert_eq!(distribute_dash_rows(&[], 4), Vec::<usize>::new());
    }

    #[test]
    fn largest_section_gets_largest_share() {
        let allocation = distribute_dash_rows(&[10, 3, 1], 6);
        assert_eq!(allocation, vec![4, 1, 1]);
        assert_eq!(allocation.iter().sum::<usize>(), 6);
    }

    #[test]
    fn proportional_split_then_leftovers() {
        // mins [1,1] leave 8; excess [19, 9] gives shares [5, 2]; one leftover
        // goes to the bigger gap.
        assert_eq!(distribute_dash_rows(&[20, 10], 10), vec![7, 3]);
    }

    #[test]
    fn budget_smaller_than_section_count_gives_minimums_in_order() {
        assert_eq!(distribute_dash_rows(&[5, 5, 5], 2), vec![1, 1, 0]);
        assert_eq!(distribute_dash_rows(&[5, 5], 0), vec![0, 0]);
    }

    #[test]
    fn empty_groups_get_nothing() {
        assert_eq!(distribute_sub_limits(&[0, 6, 2], 4), vec![0, 3, 1]);
    }

    #[test]
    fn overhead_counts_headers_and_separators() {
        let flat = DashboardSection::flat("Incidents", rows(3));
        assert_eq!(overhead(&flat), 1);

        let grouped = DashboardSection::grouped(
            "Maintenance",
            vec![
                ("Overdue".to_owned(), rows(2)),
                ("Upcoming".to_owned(), rows(4)),
            ],
        );
        assert_eq!(overhead(&grouped), 3);

        let one_empty = DashboardSection::grouped(
            "Maintenance",
            vec![
                ("Overdue".to_owned(), Vec::new()),
                ("Upcoming".to_owned(), rows(4)),
            ],
        );
        assert_eq!(overhead(&one_empty), 1);
    }

    #[test]
    fn fixed_cost_adds_separators_and_footer() {
        let sections = vec![
            DashboardSection::flat("Incidents", rows(3)),
            DashboardSection::grouped(
                "Maintenance",
                vec![
                    ("Overdue".to_owned(), rows(2)),
                    ("Upcoming".to_owned(), rows(4)),
                ],
            ),
        ];
        assert_eq!(fixed_cost(&sections, 2), 1 + 3 + 1 + 2);
        assert_eq!(fixed_cost(&Vec::<DashboardSection>::new(), 2), 2);
    }
}
