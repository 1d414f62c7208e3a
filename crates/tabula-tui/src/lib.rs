// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tabula_app::{
    AppCommand, AppState, DashboardSection, SortDirection, TableSnapshot, ViewMode, ViewState,
};
use tabula_layout::{
    LayoutError, apply_sort, clamp_cursor, clear_sort, hide, next_visible_column,
    selected_row_meta, show_all, toggle_sort, visible_columns,
};
use tracing::{debug, info, warn};

mod render;

const HALF_PAGE_ROWS: isize = 10;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Source of the table and dashboard shown by the shell. Both are read
/// wholesale on start and on every reload.
pub trait AppRuntime {
    fn load_snapshot(&mut self) -> Result<TableSnapshot>;
    fn load_dashboard(&mut self) -> Result<Vec<DashboardSection>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    /// Drawn between adjacent columns; its display width is the separator
    /// width used for layout.
    pub separator: String,
    /// Open on the dashboard instead of the table.
    pub show_dashboard: bool,
    /// Keep sort keys and hidden columns when the table is closed and
    /// reopened.
    pub remember_view_state: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            separator: " │ ".to_owned(),
            show_dashboard: false,
            remember_view_state: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    MoveHalfPageDown,
    MoveHalfPageUp,
    JumpFirstRow,
    JumpLastRow,
    JumpFirstColumn,
    JumpLastColumn,
    CycleSort,
    ClearSort,
    HideCurrentColumn,
    ShowAllColumns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    SortUnavailable,
    SortAsc(String),
    SortDesc(String),
    SortOff(String),
    SortCleared,
    ColumnHidden(String),
    ColumnAlreadyHidden(String),
    ColumnUnavailable,
    KeepOneColumnVisible,
    ColumnsShown,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortOff(column) => format!("sort {column} off"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::ColumnHidden(label) => format!("column hidden: {label}"),
            Self::ColumnAlreadyHidden(label) => format!("column already hidden: {label}"),
            Self::ColumnUnavailable => "column unavailable".to_owned(),
            Self::KeepOneColumnVisible => "keep one column visible".to_owned(),
            Self::ColumnsShown => "all columns shown".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
}

#[derive(Debug, Default)]
struct ViewData {
    options: UiOptions,
    /// Rows in load order.
    source: TableSnapshot,
    /// `source` reordered by the current sort keys.
    table: TableSnapshot,
    view: ViewState,
    /// View state parked while the dashboard is open.
    saved_view: Option<ViewState>,
    dashboard: Vec<DashboardSection>,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    fn set_source(&mut self, snapshot: TableSnapshot) {
        self.source = snapshot;
        self.resort();
    }

    /// Rebuilds the displayed rows from the source and re-clamps the cursor.
    fn resort(&mut self) {
        clamp_cursor(
            &mut self.view,
            self.source.row_count(),
            self.source.column_count(),
        );
        let mut table = self.source.clone();
        apply_sort(&mut table, &self.view.sorts);
        self.table = table;
    }

    /// Re-sorts with the cursor following the row it was on.
    fn resort_keeping_selection(&mut self) {
        let selected = selected_row_meta(&self.table, &self.view).map(|meta| meta.id);
        self.resort();
        if let Some(id) = selected
            && let Some(row) = self.table.meta.iter().position(|meta| meta.id == id)
        {
            self.view.cursor_row = row;
        }
    }

    fn column_label(&self, column: usize) -> String {
        self.table
            .columns
            .get(column)
            .map_or_else(|| "column".to_owned(), |spec| spec.title.clone())
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if view_data.options.show_dashboard {
        show_dashboard(state, &mut view_data);
    }

    if let Err(error) = refresh_view_data(runtime, &mut view_data) {
        warn!(error = %error, "initial load failed");
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error:#}")));
    }

    let result = event_loop(
        &mut terminal,
        state,
        runtime,
        &mut view_data,
        &internal_tx,
        &internal_rx,
    );

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop<R: AppRuntime>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    internal_rx: &Receiver<InternalEvent>,
) -> Result<()> {
    loop {
        process_internal_events(state, view_data, internal_rx);

        // Layout is recomputed from the current frame size on every draw,
        // so resizes need no handling of their own.
        terminal
            .draw(|frame| render::render(frame, state, view_data))
            .context("draw frame")?;

        if !event::poll(POLL_INTERVAL).context("poll event")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(state, runtime, view_data, internal_tx, key)
        {
            return Ok(());
        }
    }
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let snapshot = runtime.load_snapshot().context("load table snapshot")?;
    snapshot.validate()?;
    let dashboard = runtime.load_dashboard().context("load dashboard")?;

    info!(
        table = %snapshot.title,
        rows = snapshot.row_count(),
        columns = snapshot.column_count(),
        sections = dashboard.len(),
        "view data loaded"
    );
    view_data.set_source(snapshot);
    view_data.dashboard = dashboard;
    Ok(())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Returns true when the shell should exit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            return true;
        }
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        _ => {}
    }

    if state.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            state.dispatch(AppCommand::ToggleHelp);
        }
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            state.dispatch(AppCommand::ToggleHelp);
            return false;
        }
        (KeyCode::Char('D'), _) => {
            match state.mode {
                ViewMode::Table => show_dashboard(state, view_data),
                ViewMode::Dashboard => show_table(state, view_data),
            }
            return false;
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            reload(state, runtime, view_data, internal_tx);
            return false;
        }
        _ => {}
    }

    match state.mode {
        ViewMode::Dashboard => {
            if key.code == KeyCode::Esc {
                show_table(state, view_data);
            }
        }
        ViewMode::Table => handle_table_key(state, view_data, internal_tx, key),
    }
    false
}

fn show_dashboard(state: &mut AppState, view_data: &mut ViewData) {
    let view = mem::take(&mut view_data.view);
    view_data.saved_view = view_data.options.remember_view_state.then_some(view);
    state.dispatch(AppCommand::ShowDashboard);
}

fn show_table(state: &mut AppState, view_data: &mut ViewData) {
    view_data.view = view_data.saved_view.take().unwrap_or_default();
    view_data.resort();
    debug!(
        restored = view_data.options.remember_view_state,
        "table view reopened"
    );
    state.dispatch(AppCommand::ShowTable);
}

fn reload<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match refresh_view_data(runtime, view_data) {
        Ok(()) => {
            let rows = view_data.table.row_count();
            emit_status(state, view_data, internal_tx, format!("reloaded {rows} rows"));
        }
        Err(error) => {
            warn!(error = %error, "reload failed");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("reload failed: {error:#}"),
            );
        }
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(command) = table_command_for_key(key) else {
        return;
    };
    debug!(?command, "table command");
    if let TableEvent::Status(status) = apply_table_command(view_data, command) {
        emit_status(state, view_data, internal_tx, status.message());
    }
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TableCommand::MoveHalfPageDown)
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TableCommand::MoveHalfPageUp)
        }
        (_, modifiers) if modifiers.contains(KeyModifiers::CONTROL) => None,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(TableCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(TableCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(TableCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(TableCommand::MoveColumn(1)),
        (KeyCode::Char('g'), _) => Some(TableCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) => Some(TableCommand::JumpLastRow),
        (KeyCode::Char('^'), _) => Some(TableCommand::JumpFirstColumn),
        (KeyCode::Char('$'), _) => Some(TableCommand::JumpLastColumn),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(TableCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(TableCommand::ClearSort),
        (KeyCode::Char('c'), KeyModifiers::NONE) => Some(TableCommand::HideCurrentColumn),
        (KeyCode::Char('C'), _) => Some(TableCommand::ShowAllColumns),
        _ => None,
    }
}

fn apply_table_command(view_data: &mut ViewData, command: TableCommand) -> TableEvent {
    let column_count = view_data.table.column_count();
    match command {
        TableCommand::MoveRow(delta) => {
            move_row(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            move_col(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveHalfPageDown => {
            move_row(view_data, HALF_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveHalfPageUp => {
            move_row(view_data, -HALF_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            view_data.view.cursor_row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            view_data.view.cursor_row = view_data.table.row_count().saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstColumn => {
            if let Some(first) = visible_columns(&view_data.view, column_count).first() {
                view_data.view.cursor_col = *first;
            }
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastColumn => {
            if let Some(last) = visible_columns(&view_data.view, column_count).last() {
                view_data.view.cursor_col = *last;
            }
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => TableEvent::Status(cycle_sort(view_data)),
        TableCommand::ClearSort => {
            clear_sort(&mut view_data.view);
            view_data.resort_keeping_selection();
            TableEvent::Status(TableStatus::SortCleared)
        }
        TableCommand::HideCurrentColumn => TableEvent::Status(hide_current_column(view_data)),
        TableCommand::ShowAllColumns => {
            show_all(&mut view_data.view);
            clamp_cursor(
                &mut view_data.view,
                view_data.table.row_count(),
                column_count,
            );
            TableEvent::Status(TableStatus::ColumnsShown)
        }
    }
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = view_data.table.row_count();
    if row_count == 0 {
        view_data.view.cursor_row = 0;
        return;
    }

    let current = view_data.view.cursor_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta.unsigned_abs())
    };
    view_data.view.cursor_row = next.min(row_count - 1);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let column_count = view_data.table.column_count();
    let forward = !delta.is_negative();
    for _ in 0..delta.unsigned_abs() {
        view_data.view.cursor_col = next_visible_column(
            &view_data.view,
            column_count,
            view_data.view.cursor_col,
            forward,
        );
    }
}

fn cycle_sort(view_data: &mut ViewData) -> TableStatus {
    let column = view_data.view.cursor_col;
    if column >= view_data.table.column_count() || view_data.view.is_hidden(column) {
        return TableStatus::SortUnavailable;
    }

    let label = view_data.column_label(column);
    let direction = toggle_sort(&mut view_data.view, column);
    view_data.resort_keeping_selection();
    match direction {
        Some(SortDirection::Asc) => TableStatus::SortAsc(label),
        Some(SortDirection::Desc) => TableStatus::SortDesc(label),
        None => TableStatus::SortOff(label),
    }
}

fn hide_current_column(view_data: &mut ViewData) -> TableStatus {
    let column = view_data.view.cursor_col;
    let label = view_data.column_label(column);
    match hide(&mut view_data.view, view_data.table.column_count(), column) {
        Ok(()) => TableStatus::ColumnHidden(label),
        Err(LayoutError::LastVisibleColumn { .. }) => TableStatus::KeepOneColumnVisible,
        Err(LayoutError::AlreadyHidden { .. }) => TableStatus::ColumnAlreadyHidden(label),
        Err(LayoutError::ColumnOutOfRange { .. }) => TableStatus::ColumnUnavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InternalEvent, TableCommand, TableEvent, TableStatus, UiOptions, ViewData,
        apply_table_command, emit_status, handle_key_event, process_internal_events,
        refresh_view_data, table_command_for_key,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::mpsc::{self, Sender};
    use tabula_app::{AppState, DashboardSection, SortEntry, TableSnapshot, ViewMode};
    use tabula_layout::selected_row_meta;

    #[derive(Debug)]
    struct TestRuntime {
        snapshot: TableSnapshot,
        dashboard: Vec<DashboardSection>,
        fail: bool,
    }

    impl AppRuntime for TestRuntime {
        fn load_snapshot(&mut self) -> Result<TableSnapshot> {
            if self.fail {
                bail!("data file vanished");
            }
            Ok(self.snapshot.clone())
        }

        fn load_dashboard(&mut self) -> Result<Vec<DashboardSection>> {
            Ok(self.dashboard.clone())
        }
    }

    fn vendors(extra: &[&[&str]]) -> TableSnapshot {
        let mut rows: Vec<&[&str]> = vec![
            &["1", "Pat's Plumbing", "Plumbing", "555-0101"],
            &["2", "Acme Electric", "Electrical", ""],
            &["3", "Bright Roofing", "Roofing", "555-0103"],
        ];
        rows.extend_from_slice(extra);
        tabula_testkit::table("Vendors", &["ID", "Name", "Trade", "Phone"], &rows)
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: Sender<InternalEvent>,
    }

    impl Harness {
        fn new(options: UiOptions) -> Result<Self> {
            let mut runtime = TestRuntime {
                snapshot: vendors(&[]),
                dashboard: vec![DashboardSection::flat(
                    "Incidents",
                    vec!["Leak under sink".to_owned()],
                )],
                fail: false,
            };
            let mut view_data = ViewData::new(options);
            refresh_view_data(&mut runtime, &mut view_data)?;
            let (tx, _rx) = mpsc::channel();
            Ok(Self {
                state: AppState::default(),
                runtime,
                view_data,
                tx,
            })
        }

        fn press(&mut self, key: KeyEvent) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                key,
            )
        }

        fn ids(&self) -> Vec<i64> {
            self.view_data
                .table
                .meta
                .iter()
                .map(|meta| meta.id.get())
                .collect()
        }

        fn status(&self) -> Option<&str> {
            self.state.status_line.as_deref()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn shifted(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    }

    #[test]
    fn keys_map_to_table_commands() {
        assert_eq!(
            table_command_for_key(key(KeyCode::Char('j'))),
            Some(TableCommand::MoveRow(1))
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Up)),
            Some(TableCommand::MoveRow(-1))
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Right)),
            Some(TableCommand::MoveColumn(1))
        );
        assert_eq!(
            table_command_for_key(ctrl('d')),
            Some(TableCommand::MoveHalfPageDown)
        );
        assert_eq!(
            table_command_for_key(ctrl('u')),
            Some(TableCommand::MoveHalfPageUp)
        );
        assert_eq!(
            table_command_for_key(shifted('G')),
            Some(TableCommand::JumpLastRow)
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Char('$'))),
            Some(TableCommand::JumpLastColumn)
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Char('s'))),
            Some(TableCommand::CycleSort)
        );
        assert_eq!(
            table_command_for_key(shifted('S')),
            Some(TableCommand::ClearSort)
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Char('c'))),
            Some(TableCommand::HideCurrentColumn)
        );
        assert_eq!(
            table_command_for_key(shifted('C')),
            Some(TableCommand::ShowAllColumns)
        );
        assert_eq!(table_command_for_key(ctrl('c')), None);
        assert_eq!(table_command_for_key(ctrl('j')), None);
        assert_eq!(table_command_for_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn column_moves_skip_hidden_columns_and_clamp_at_edges() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        let view_data = &mut harness.view_data;
        view_data.view.hidden.push(2);
        view_data.view.cursor_col = 1;

        apply_table_command(view_data, TableCommand::MoveColumn(1));
        assert_eq!(view_data.view.cursor_col, 3);
        apply_table_command(view_data, TableCommand::MoveColumn(1));
        assert_eq!(view_data.view.cursor_col, 3);
        apply_table_command(view_data, TableCommand::MoveColumn(-1));
        assert_eq!(view_data.view.cursor_col, 1);

        view_data.view.hidden.push(0);
        apply_table_command(view_data, TableCommand::JumpFirstColumn);
        assert_eq!(view_data.view.cursor_col, 1);
        apply_table_command(view_data, TableCommand::JumpLastColumn);
        assert_eq!(view_data.view.cursor_col, 3);
        Ok(())
    }

    #[test]
    fn row_moves_clamp_to_table() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        let view_data = &mut harness.view_data;

        apply_table_command(view_data, TableCommand::MoveHalfPageDown);
        assert_eq!(view_data.view.cursor_row, 2);
        apply_table_command(view_data, TableCommand::MoveRow(-1));
        assert_eq!(view_data.view.cursor_row, 1);
        apply_table_command(view_data, TableCommand::MoveHalfPageUp);
        assert_eq!(view_data.view.cursor_row, 0);
        apply_table_command(view_data, TableCommand::JumpLastRow);
        assert_eq!(view_data.view.cursor_row, 2);
        apply_table_command(view_data, TableCommand::JumpFirstRow);
        assert_eq!(view_data.view.cursor_row, 0);
        Ok(())
    }

    #[test]
    fn sort_cycles_through_asc_desc_and_off() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.view_data.view.cursor_col = 1;

        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.status(), Some("sort Name asc"));
        assert_eq!(harness.ids(), vec![2, 3, 1]);

        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.status(), Some("sort Name desc"));
        assert_eq!(harness.ids(), vec![1, 3, 2]);

        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.status(), Some("sort Name off"));
        assert_eq!(harness.ids(), vec![1, 2, 3]);

        harness.press(key(KeyCode::Char('s')));
        harness.press(shifted('S'));
        assert_eq!(harness.status(), Some("sort cleared"));
        assert!(harness.view_data.view.sorts.is_empty());
        assert_eq!(harness.ids(), vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn cursor_follows_its_row_through_sorting() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.view_data.view.cursor_col = 1;
        harness.press(key(KeyCode::Char('j')));
        let selected = |harness: &Harness| {
            selected_row_meta(&harness.view_data.table, &harness.view_data.view)
                .map(|meta| meta.id.get())
        };
        assert_eq!(selected(&harness), Some(2));

        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.ids(), vec![2, 3, 1]);
        assert_eq!(harness.view_data.view.cursor_row, 0);
        assert_eq!(selected(&harness), Some(2));

        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.view_data.view.cursor_row, 2);
        assert_eq!(selected(&harness), Some(2));

        harness.press(shifted('S'));
        assert_eq!(harness.view_data.view.cursor_row, 1);
        assert_eq!(selected(&harness), Some(2));
        Ok(())
    }

    #[test]
    fn hiding_refuses_the_last_visible_column() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;

        harness.press(key(KeyCode::Char('c')));
        assert_eq!(harness.status(), Some("column hidden: ID"));
        assert_eq!(harness.view_data.view.cursor_col, 1);

        harness.press(key(KeyCode::Char('c')));
        harness.press(key(KeyCode::Char('c')));
        assert_eq!(harness.status(), Some("column hidden: Trade"));
        assert_eq!(harness.view_data.view.cursor_col, 3);

        harness.press(key(KeyCode::Char('c')));
        assert_eq!(harness.status(), Some("keep one column visible"));
        assert_eq!(harness.view_data.view.hidden, vec![0, 1, 2]);

        harness.press(shifted('C'));
        assert_eq!(harness.status(), Some("all columns shown"));
        assert!(harness.view_data.view.hidden.is_empty());
        Ok(())
    }

    #[test]
    fn hiding_an_already_hidden_column_reports_it() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.view_data.view.hidden.push(1);
        harness.view_data.view.cursor_col = 1;

        let event = apply_table_command(&mut harness.view_data, TableCommand::HideCurrentColumn);
        assert_eq!(
            event,
            TableEvent::Status(TableStatus::ColumnAlreadyHidden("Name".to_owned()))
        );
        Ok(())
    }

    #[test]
    fn reopening_the_table_starts_fresh_by_default() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.view_data.view.cursor_col = 1;
        harness.press(key(KeyCode::Char('s')));
        harness.press(key(KeyCode::Char('c')));
        harness.press(key(KeyCode::Char('G')));

        harness.press(shifted('D'));
        assert_eq!(harness.state.mode, ViewMode::Dashboard);
        harness.press(shifted('D'));
        assert_eq!(harness.state.mode, ViewMode::Table);

        assert!(harness.view_data.view.sorts.is_empty());
        assert!(harness.view_data.view.hidden.is_empty());
        assert_eq!(harness.view_data.view.cursor_row, 0);
        assert_eq!(harness.ids(), vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn reopening_the_table_restores_state_when_remembered() -> Result<()> {
        let mut harness = Harness::new(UiOptions {
            remember_view_state: true,
            ..UiOptions::default()
        })?;
        harness.view_data.view.cursor_col = 1;
        harness.press(key(KeyCode::Char('s')));
        harness.press(key(KeyCode::Char('G')));

        harness.press(shifted('D'));
        harness.press(key(KeyCode::Esc));
        assert_eq!(harness.state.mode, ViewMode::Table);

        assert_eq!(harness.view_data.view.sorts, vec![SortEntry::asc(1)]);
        assert_eq!(harness.view_data.view.cursor_row, 2);
        assert_eq!(harness.ids(), vec![2, 3, 1]);
        Ok(())
    }

    #[test]
    fn table_keys_are_ignored_on_the_dashboard() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.press(shifted('D'));
        harness.press(key(KeyCode::Char('j')));
        harness.press(key(KeyCode::Char('s')));
        assert_eq!(harness.view_data.view.cursor_row, 0);
        assert!(harness.view_data.view.sorts.is_empty());
        assert_eq!(harness.status(), None);
        Ok(())
    }

    #[test]
    fn reload_reapplies_the_sort() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.view_data.view.cursor_col = 1;
        harness.press(key(KeyCode::Char('s')));

        harness.runtime.snapshot = vendors(&[&["4", "Aardvark Tile", "Tile", ""]]);
        harness.press(key(KeyCode::Char('r')));

        assert_eq!(harness.status(), Some("reloaded 4 rows"));
        assert_eq!(harness.ids(), vec![4, 2, 3, 1]);
        assert_eq!(harness.view_data.view.sorts, vec![SortEntry::asc(1)]);
        Ok(())
    }

    #[test]
    fn failed_reload_keeps_the_previous_rows() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.runtime.fail = true;
        harness.press(key(KeyCode::Char('r')));

        let status = harness.status().unwrap_or_default();
        assert!(status.starts_with("reload failed"), "{status}");
        assert!(status.contains("data file vanished"), "{status}");
        assert_eq!(harness.view_data.table.row_count(), 3);
        Ok(())
    }

    #[test]
    fn help_overlay_swallows_table_keys() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        harness.press(key(KeyCode::Char('?')));
        assert!(harness.state.help_visible);

        harness.press(key(KeyCode::Char('j')));
        assert_eq!(harness.view_data.view.cursor_row, 0);

        harness.press(key(KeyCode::Esc));
        assert!(!harness.state.help_visible);
        Ok(())
    }

    #[test]
    fn quit_keys_end_the_loop() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        assert!(!harness.press(key(KeyCode::Char('j'))));
        assert!(harness.press(key(KeyCode::Char('q'))));
        assert!(harness.press(ctrl('c')));
        Ok(())
    }

    #[test]
    fn stale_status_clear_is_ignored() -> Result<()> {
        let mut harness = Harness::new(UiOptions::default())?;
        let (tx, rx) = mpsc::channel();

        emit_status(&mut harness.state, &mut harness.view_data, &tx, "first");
        emit_status(&mut harness.state, &mut harness.view_data, &tx, "second");
        let token = harness.view_data.status_token;

        tx.send(InternalEvent::ClearStatus { token: token - 1 })?;
        process_internal_events(&mut harness.state, &harness.view_data, &rx);
        assert_eq!(harness.status(), Some("second"));

        tx.send(InternalEvent::ClearStatus { token })?;
        process_internal_events(&mut harness.state, &harness.view_data, &rx);
        assert_eq!(harness.status(), None);
        Ok(())
    }
}
