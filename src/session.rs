use std::path::Path;

use anyhow::Result;

use crate::classifier::Classifier;
use crate::error::OrganizerError;
use crate::models::ReconcileSummary;
use crate::organizer::Organizer;
use crate::translator::Translate;

/// How a run ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// No changelog entries and no named `.jam` files.
    NothingToClassify,
    /// The form was closed without confirming; nothing was moved.
    Dismissed,
    Reconciled(ReconcileSummary),
}

/// One full pass over `folder`: load or scan, classify, reconcile.
///
/// The translator is only consulted on the first run, when no changelog
/// exists yet.
pub fn run_session<T: Translate, C: Classifier>(
    folder: &Path,
    translator: &mut T,
    classifier: &mut C,
) -> Result<SessionOutcome> {
    if !folder.is_dir() {
        return Err(OrganizerError::InvalidFolder(folder.to_path_buf()).into());
    }

    let organizer = Organizer::new(folder)?;

    let apps = if organizer.has_changelog() {
        println!("Found {}, loading previous run...", organizer.changelog().path().display());
        organizer.load_existing_apps()?
    } else {
        println!("Started Processing Files, please wait... The form will open once ready.");
        organizer.process_all_jams(translator)?
    };

    if apps.is_empty() {
        return Ok(SessionOutcome::NothingToClassify);
    }

    let Some(classification) = classifier.classify(&apps)? else {
        return Ok(SessionOutcome::Dismissed);
    };

    let summary = organizer.apply_classification(&apps, &classification)?;
    Ok(SessionOutcome::Reconciled(summary))
}
