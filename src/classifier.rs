use anyhow::Result;

use crate::models::{AppRecord, Classification};
use crate::tui;

/// Turns the loaded application list into the user's choices.
///
/// `Ok(None)` means the user walked away without confirming; nothing should
/// be moved in that case.
pub trait Classifier {
    fn classify(&mut self, apps: &[AppRecord]) -> Result<Option<Classification>>;
}

/// The interactive ratatui form.
#[derive(Debug, Default)]
pub struct TerminalForm;

impl Classifier for TerminalForm {
    fn classify(&mut self, apps: &[AppRecord]) -> Result<Option<Classification>> {
        tui::run_form(apps)
    }
}

/// Confirms every record at the status the form would preselect.
#[derive(Debug, Default)]
pub struct AcceptDefaults;

impl Classifier for AcceptDefaults {
    fn classify(&mut self, apps: &[AppRecord]) -> Result<Option<Classification>> {
        Ok(Some(default_classification(apps)))
    }
}

pub fn default_classification(apps: &[AppRecord]) -> Classification {
    apps.iter()
        .map(|app| (app.folder.clone(), app.default_status()))
        .collect()
}
