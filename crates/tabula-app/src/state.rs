// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::SortEntry;

/// Per-table view state. Owned by the caller and passed into every layout
/// call; layout functions never keep state of their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub cursor_row: usize,
    /// Full column index.
    pub cursor_col: usize,
    /// Leftmost windowed column, counted in visible columns.
    pub scroll_offset: usize,
    /// Sort keys, most significant first.
    pub sorts: Vec<SortEntry>,
    /// Hidden columns in the order they were hidden, oldest first.
    pub hidden: Vec<usize>,
}

impl ViewState {
    pub fn is_hidden(&self, column: usize) -> bool {
        self.hidden.contains(&column)
    }

    /// Zero for a visible column, otherwise its 1-based position in the hide
    /// sequence.
    pub fn hide_order(&self, column: usize) -> usize {
        self.hidden
            .iter()
            .position(|hidden| *hidden == column)
            .map_or(0, |index| index + 1)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn sort_for(&self, column: usize) -> Option<(usize, SortEntry)> {
        self.sorts
            .iter()
            .copied()
            .enumerate()
            .find(|(_, sort)| sort.column == column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: ViewMode,
    pub help_visible: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: ViewMode::Table,
            help_visible: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ShowTable,
    ShowDashboard,
    ToggleDashboard,
    ToggleHelp,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(ViewMode),
    HelpChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ShowTable => self.set_mode(ViewMode::Table),
            AppCommand::ShowDashboard => self.set_mode(ViewMode::Dashboard),
            AppCommand::ToggleDashboard => {
                let next = match self.mode {
                    ViewMode::Table => ViewMode::Dashboard,
                    ViewMode::Dashboard => ViewMode::Table,
                };
                self.set_mode(next)
            }
            AppCommand::ToggleHelp => {
                self.help_visible = !self.help_visible;
                vec![AppEvent::HelpChanged(self.help_visible)]
            }
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_mode(&mut self, mode: ViewMode) -> Vec<AppEvent> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }
}
