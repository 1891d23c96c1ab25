use crossterm::event::KeyCode;
use ratatui::widgets::{ListState, ScrollbarState};

use crate::models::{AppRecord, Classification, Status};

#[derive(Debug, Clone)]
pub struct FormRow {
    pub label: String,
    pub folder: String,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormOutcome {
    Confirmed,
    Dismissed,
}

#[derive(Debug)]
pub struct FormApp {
    pub rows: Vec<FormRow>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub show_help: bool,
    pub outcome: Option<FormOutcome>,
}

impl FormApp {
    pub fn new(apps: &[AppRecord]) -> Self {
        let rows: Vec<FormRow> = apps
            .iter()
            .map(|app| FormRow {
                label: app.display_line(),
                folder: app.folder.clone(),
                status: app.default_status(),
            })
            .collect();

        let mut list_state = ListState::default();
        if !rows.is_empty() {
            list_state.select(Some(0));
        }
        let scroll_state = ScrollbarState::new(rows.len());

        Self {
            rows,
            list_state,
            scroll_state,
            show_help: false,
            outcome: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.rows.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) => self.rows.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.select(i);
    }

    pub fn set_status(&mut self, status: Status) {
        if let Some(row) = self.selected().and_then(|i| self.rows.get_mut(i)) {
            row.status = status;
        }
    }

    pub fn cycle_status(&mut self, forward: bool) {
        if let Some(row) = self.selected().and_then(|i| self.rows.get_mut(i)) {
            row.status = if forward { row.status.next() } else { row.status.previous() };
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.toggle_help();
            }
            return;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.outcome = Some(FormOutcome::Dismissed),
            KeyCode::Enter => self.outcome = Some(FormOutcome::Confirmed),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.cycle_status(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_status(false),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.set_status(Status::ALL[index]);
            }
            _ => {}
        }
    }

    pub fn classification(&self) -> Classification {
        self.rows
            .iter()
            .map(|row| (row.folder.clone(), row.status))
            .collect()
    }

    /// The confirmed choices, or `None` if the form was dismissed.
    pub fn finish(&self) -> Option<Classification> {
        match self.outcome {
            Some(FormOutcome::Confirmed) => Some(self.classification()),
            _ => None,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.rows.iter().filter(|row| row.status == status).count()
    }
}
