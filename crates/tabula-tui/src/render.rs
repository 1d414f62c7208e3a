// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tabula_app::{AppState, DashboardSection, RowMeta, ViewMode};
use tabula_layout::{FrameLine, TableFrame, render_dashboard, table_title, truncate_label};

use crate::ViewData;

const TABLE_KEYS: &str =
    "j/k/h/l g/G ^/$ ctrl+d/u | s/S sort | c/C cols | r reload | D dashboard | ? help | q quit";
const DASHBOARD_KEYS: &str = "D/esc table | r reload | ? help | q quit";
const DASHBOARD_FOOTER_LINES: usize = 1;

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &mut ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    match state.mode {
        ViewMode::Table => render_table(frame, layout[0], view_data),
        ViewMode::Dashboard => {
            let block = Block::default().title("dashboard").borders(Borders::ALL);
            let inner = block.inner(layout[0]);
            let lines = dashboard_lines(
                &view_data.dashboard,
                usize::from(inner.width),
                usize::from(inner.height),
            );
            frame.render_widget(Paragraph::new(lines.join("\n")).block(block), layout[0]);
        }
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[1]);

    if state.help_visible {
        let area = centered_rect(72, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &mut ViewData) {
    let block = Block::default()
        .title(table_title(&view_data.table, &view_data.view))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    let table = TableFrame::compute(
        &view_data.table,
        &mut view_data.view,
        usize::from(inner.width),
        &view_data.options.separator,
    );
    let lines = table_lines(&table, &view_data.table.meta, usize::from(inner.height));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Styled lines for one table frame, at most `height` of them.
fn table_lines(table: &TableFrame, meta: &[RowMeta], height: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    table
        .plan_lines(height)
        .into_iter()
        .map(|line| match line {
            FrameLine::Header => Line::from(table.header_line()).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            FrameLine::Rule => Line::from(table.rule_line()).style(dim),
            FrameLine::Row(row) => {
                let deleted = meta.get(row).is_some_and(|meta| meta.deleted);
                row_line(table, row, deleted)
            }
            FrameLine::Stack(index) => Line::from(table.stack_lines[index].clone()).style(dim),
        })
        .collect()
}

fn row_line(table: &TableFrame, row: usize, deleted: bool) -> Line<'static> {
    let selected_row = row == table.cursor_row;
    let cursor = table.cursor_cell().filter(|_| selected_row);

    let mut row_style = Style::default();
    if deleted {
        row_style = row_style
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    if selected_row {
        row_style = row_style.bg(Color::DarkGray);
    }
    let separator_style = if selected_row {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::raw(" ".repeat(table.lead_chrome))];
    for (index, text) in table.body_cells(row).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(table.separator.clone(), separator_style));
        }
        let style = if cursor == Some(index) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            row_style
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

/// Dashboard body with a key hint on its last line.
fn dashboard_lines(sections: &[DashboardSection], width: usize, height: usize) -> Vec<String> {
    if height == 0 {
        return Vec::new();
    }
    let mut lines = render_dashboard(sections, width, height, DASHBOARD_FOOTER_LINES);
    if lines.is_empty() {
        lines.push(truncate_label("nothing to show", width));
    }
    lines.truncate(height - DASHBOARD_FOOTER_LINES);
    lines.resize(height - DASHBOARD_FOOTER_LINES, String::new());
    lines.push(truncate_label(DASHBOARD_KEYS, width));
    lines
}

fn status_text(state: &AppState) -> String {
    let (mode, keys) = match state.mode {
        ViewMode::Table => ("TABLE", TABLE_KEYS),
        ViewMode::Dashboard => ("DASH", DASHBOARD_KEYS),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {keys}"),
        None => format!("{mode} | {keys}"),
    }
}

fn help_overlay_text() -> &'static str {
    "rows: j/k or up/down | g/G first/last | ctrl+d/ctrl+u half page\n\
columns: h/l or left/right | ^/$ first/last visible\n\
sort: s cycles asc, desc, off on the cursor column | S clears every key\n\
columns: c hides the cursor column | C shows all\n\
data: r reloads and re-applies the sort\n\
views: D toggles the dashboard | esc returns to the table\n\
? help | q or ctrl+c quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
