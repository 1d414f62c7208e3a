// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tabula_app::DashboardSection;
use tracing::debug;

use crate::budget::{distribute_dash_rows, distribute_sub_limits, fixed_cost};
use crate::text::truncate_label;

const ROW_INDENT: &str = "  ";

/// Lays the dashboard out in at most `available_lines - footer_lines`
/// lines. Empty sections are skipped; when even one row per section does
/// not fit, sections are dropped from the bottom.
pub fn render_dashboard(
    sections: &[DashboardSection],
    width: usize,
    available_lines: usize,
    footer_lines: usize,
) -> Vec<String> {
    let mut shown = sections
        .iter()
        .filter(|section| section.row_count() > 0)
        .collect::<Vec<_>>();
    while !shown.is_empty()
        && fixed_cost(shown.iter().copied(), footer_lines) + shown.len() > available_lines
    {
        if let Some(section) = shown.pop() {
            debug!(section = %section.title, available_lines, "dashboard section dropped");
        }
    }
    if shown.is_empty() {
        return Vec::new();
    }

    let budget = available_lines.saturating_sub(fixed_cost(shown.iter().copied(), footer_lines));
    let counts = shown
        .iter()
        .map(|section| section.row_count())
        .collect::<Vec<_>>();
    let allocation = distribute_dash_rows(&counts, budget);

    let mut lines = Vec::new();
    for (index, (section, limit)) in shown.iter().zip(allocation).enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        if section.is_grouped() && section.groups.iter().any(|group| group.count > 0) {
            push_grouped(&mut lines, section, limit, width);
        } else {
            lines.push(header(&section.title, section.row_count(), width));
            push_rows(&mut lines, &section.rows, limit, width);
        }
    }
    lines
}

fn push_grouped(lines: &mut Vec<String>, section: &DashboardSection, limit: usize, width: usize) {
    let limits = distribute_sub_limits(&section.sub_counts(), limit);
    let mut first = true;
    for (index, group) in section.groups.iter().enumerate() {
        if group.count == 0 {
            continue;
        }
        if !first {
            lines.push(String::new());
        }
        first = false;
        lines.push(header(&group.title, group.count, width));
        let take = limits.get(index).copied().unwrap_or(0);
        push_rows(lines, section.group_rows(index), take, width);
    }
}

fn header(title: &str, count: usize, width: usize) -> String {
    truncate_label(&format!("{title} ({count})"), width)
}

fn push_rows(lines: &mut Vec<String>, rows: &[String], take: usize, width: usize) {
    lines.extend(
        rows.iter()
            .take(take)
            .map(|row| truncate_label(&format!("{ROW_INDENT}{row}"), width)),
    );
}

#[cfg(test)]
mod tests {
    use super::render_dashboard;
    use tabula_app::DashboardSection;

    fn rows(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|index| format!("{prefix} {index}")).collect()
    }

    fn sections() -> Vec<DashboardSection> {
        vec![
            DashboardSection::flat("Incidents", rows("inc", 3)),
            DashboardSection::flat("Empty", Vec::new()),
            DashboardSection::grouped(
                "Maintenance",
                vec![
                    ("Overdue".to_owned(), rows("over", 2)),
                    ("Upcoming".to_owned(), rows("up", 4)),
                ],
            ),
            DashboardSection::flat("Projects", rows("proj", 5)),
        ]
    }

    #[test]
    fn everything_fits_and_empty_sections_are_omitted() {
        let lines = render_dashboard(&sections(), 40, 40, 0);
        assert_eq!(lines.len(), 1 + 3 + 1 + 1 + 2 + 1 + 1 + 4 + 1 + 1 + 5);
        assert_eq!(lines[0], "Incidents (3)");
        assert!(!lines.iter().any(|line| line.starts_with("Empty")));
        assert!(!lines.iter().any(|line| line.starts_with("Maintenance")));
    }

    #[test]
    fn tight_budget_gives_every_section_a_row() {
        let lines = render_dashboard(&sections(), 40, 12, 1);
        assert_eq!(
            lines,
            vec![
                "Incidents (3)",
                "  inc 0",
                "",
                "Overdue (2)",
                "  over 0",
                "",
                "Upcoming (4)",
                "  up 0",
                "",
                "Projects (5)",
                "  proj 0",
            ]
        );
    }

    #[test]
    fn sections_are_dropped_from_the_bottom() {
        let lines = render_dashboard(&sections(), 40, 6, 0);
        assert_eq!(
            lines,
            vec!["Incidents (3)", "  inc 0", "  inc 1", "  inc 2"]
        );
    }

    #[test]
    fn lines_are_truncated_to_width() {
        let lines = render_dashboard(&sections()[..1], 8, 10, 0);
        assert_eq!(lines[0], "Inciden…");
        assert_eq!(lines[1], "  inc 0");
    }

    #[test]
    fn no_room_renders_nothing() {
        assert!(render_dashboard(&sections(), 40, 1, 0).is_empty());
        assert!(render_dashboard(&[], 40, 10, 0).is_empty());
    }
}
