use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::changelog::{Changelog, ChangelogEntry};
use crate::metadata::NameExtractor;
use crate::models::{AppRecord, Classification, ReconcileSummary, Status};
use crate::translator::Translate;

/// Files that travel with a `.jam` descriptor, matched on the shared stem.
pub const BUNDLE_EXTENSIONS: [&str; 3] = ["jam", "jar", "sp"];

/// Status folder written by older versions that moved SKIP apps into `SKIP/`.
pub const LEGACY_SKIP_FOLDER: &str = "SKIP";

/// Maps arbitrary text to a folder name: alphanumerics and ` ._-()[]` are
/// kept, everything else becomes `_`.
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || " ._-()[]".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct Organizer {
    parent: PathBuf,
    changelog: Changelog,
    extractor: NameExtractor,
}

impl Organizer {
    pub fn new<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let parent = parent.as_ref().to_path_buf();
        if !parent.is_dir() {
            return Err(anyhow::anyhow!("Directory does not exist: {:?}", parent));
        }
        let changelog = Changelog::in_dir(&parent)?;
        Ok(Self {
            parent,
            changelog,
            extractor: NameExtractor::new()?,
        })
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn has_changelog(&self) -> bool {
        self.changelog.exists()
    }

    /// Where an application folder with `status` lives.
    pub fn status_path(&self, status: Status, folder: &str) -> PathBuf {
        match status.folder_name() {
            Some(name) => self.parent.join(name).join(folder),
            None => self.parent.join(folder),
        }
    }

    /// Finds the current folder of an application. Real status folders are
    /// probed first, then the legacy `SKIP/` folder, then the parent root.
    pub fn locate_folder(&self, folder: &str) -> Option<(PathBuf, Status)> {
        for status in Status::CLASSIFIED {
            let path = self.status_path(status, folder);
            if path.is_dir() {
                return Some((path, status));
            }
        }

        let legacy = self.parent.join(LEGACY_SKIP_FOLDER).join(folder);
        if legacy.is_dir() {
            return Some((legacy, Status::Skip));
        }

        let root = self.parent.join(folder);
        if root.is_dir() {
            return Some((root, Status::Skip));
        }

        None
    }

    /// Rebuilds the application list from `changelog.txt` and the folder
    /// layout on disk. Status comes from where the folder sits; the changelog
    /// section is only used when the folder is gone, so the entry keeps its
    /// place in the rewritten changelog.
    pub fn load_existing_apps(&self) -> Result<Vec<AppRecord>> {
        let entries = self.changelog.read_entries()?;
        let mut apps = Vec::with_capacity(entries.len());

        for (section, entry) in entries {
            let folder = sanitize_folder_name(&entry.translated);

            let (jam_file, status) = match self.locate_folder(&folder) {
                Some((path, status)) => (find_jam_file(&path)?, status),
                None => {
                    warn!("[WARN] Folder for '{}' not found on disk", folder);
                    (String::new(), section.unwrap_or(Status::Skip))
                }
            };

            apps.push(AppRecord {
                jam_file,
                original_name: entry.original,
                translated_name: entry.translated,
                folder,
                status: Some(status),
            });
        }

        Ok(apps)
    }

    /// First run: every root-level `.jam` gets its name extracted and
    /// translated, its bundle moved into a folder named after the
    /// translation, and a flat changelog line.
    pub fn process_all_jams<T: Translate>(&self, translator: &mut T) -> Result<Vec<AppRecord>> {
        let root_files: Vec<PathBuf> = sorted_entries(&self.parent)?
            .into_iter()
            .filter(|p| p.is_file())
            .collect();
        let jams: Vec<&PathBuf> = root_files.iter().filter(|p| has_extension(p, "jam")).collect();

        let mut apps = Vec::new();
        let total = jams.len();

        for (index, jam_path) in jams.into_iter().enumerate() {
            let jam_file = file_name_of(jam_path);
            println!("[{}/{}] {}", index + 1, total, jam_file);

            let Some(original_name) = self.extractor.extract(jam_path)? else {
                info!("No AppName in {}, skipping", jam_file);
                continue;
            };

            let translated = translator.translate(&original_name);
            let Some((translated_name, folder)) = choose_folder(translated, &original_name) else {
                warn!("No usable folder name for {} ('{}'), skipping", jam_file, original_name);
                continue;
            };
            let dest = self.parent.join(&folder);
            fs::create_dir_all(&dest)
                .with_context(|| format!("Failed to create {}", dest.display()))?;

            let stem = jam_path.file_stem();
            for sibling in root_files.iter().filter(|p| p.file_stem() == stem) {
                if !BUNDLE_EXTENSIONS.iter().any(|ext| has_extension(sibling, ext)) || !sibling.exists() {
                    continue;
                }
                let target = dest.join(file_name_of(sibling));
                fs::rename(sibling, &target).with_context(|| {
                    format!("Failed to move {} to {}", sibling.display(), target.display())
                })?;
            }

            let entry = ChangelogEntry::new(&translated_name, &original_name);
            self.changelog.append(&entry)?;
            info!("{} -> {}/", jam_file, folder);

            apps.push(AppRecord {
                jam_file,
                original_name,
                translated_name,
                folder,
                status: None,
            });
        }

        Ok(apps)
    }

    /// Moves every application folder to match `classification`, then
    /// rewrites the changelog in sectioned form.
    ///
    /// A failed move aborts before the changelog is touched. Statuses are
    /// always re-derived from folder locations on the next run, so the
    /// filesystem stays the source of truth after a partial run.
    pub fn apply_classification(
        &self,
        apps: &[AppRecord],
        classification: &Classification,
    ) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary {
            total: apps.len(),
            ..Default::default()
        };

        for app in apps {
            let target = classification.get(&app.folder).copied().unwrap_or(Status::Skip);

            let Some((src, _current)) = self.locate_folder(&app.folder) else {
                warn!("[WARN] Could not locate {}, skipping.", app.folder);
                summary.missing += 1;
                continue;
            };

            if let Some(status_dir) = target.folder_name() {
                let status_root = self.parent.join(status_dir);
                fs::create_dir_all(&status_root)
                    .with_context(|| format!("Failed to create {}", status_root.display()))?;
            }

            let dst = self.status_path(target, &app.folder);
            if src == dst {
                summary.unchanged += 1;
                continue;
            }

            info!("[MOVE] {} -> {}/", app.folder, target);
            fs::rename(&src, &dst)
                .with_context(|| format!("Failed to move {} to {}", src.display(), dst.display()))?;
            summary.moved += 1;
        }

        let entries: Vec<(Status, ChangelogEntry)> = apps
            .iter()
            .map(|app| {
                let status = classification.get(&app.folder).copied().unwrap_or(Status::Skip);
                (status, ChangelogEntry::new(&app.translated_name, &app.original_name))
            })
            .collect();
        self.changelog.rewrite_sections(&entries)?;

        // Only succeeds once every legacy SKIP app has been moved out.
        let legacy = self.parent.join(LEGACY_SKIP_FOLDER);
        match fs::remove_dir(&legacy) {
            Ok(()) => info!("Removed empty {}/", LEGACY_SKIP_FOLDER),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) => {}
            Err(e) => warn!("Could not remove {}: {}", legacy.display(), e),
        }

        Ok(summary)
    }
}

/// A folder name that stays inside the parent directory and survives a
/// changelog round trip.
fn is_usable_folder(folder: &str) -> bool {
    !folder.trim().is_empty() && folder != "." && folder != ".."
}

/// Picks the (logged name, folder) pair for a freshly translated app. A
/// translation that sanitizes to an unusable folder falls back to the
/// original name for both, so the loader can derive the folder again.
fn choose_folder(translated: String, original: &str) -> Option<(String, String)> {
    let translated = translated.trim().to_string();
    let folder = sanitize_folder_name(&translated);
    if is_usable_folder(&folder) {
        return Some((translated, folder));
    }

    let folder = sanitize_folder_name(original);
    if is_usable_folder(&folder) {
        warn!("Translation '{}' is not a usable folder name, using '{}'", translated, original);
        return Some((original.to_string(), folder));
    }

    None
}

/// Name of the first `.jam` file in `dir`, or an empty string.
fn find_jam_file(dir: &Path) -> Result<String> {
    Ok(sorted_entries(dir)?
        .iter()
        .find(|p| p.is_file() && has_extension(p, "jam"))
        .map(|p| file_name_of(p))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_folder_name() {
        assert_eq!(sanitize_folder_name("Puzzle: Deluxe/2"), "Puzzle_ Deluxe_2");
        assert_eq!(sanitize_folder_name("Game (v1.0) [DX]_-"), "Game (v1.0) [DX]_-");
        assert_eq!(sanitize_folder_name("ゲーム!"), "ゲーム_");
        assert_eq!(sanitize_folder_name(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["A/B\\C", "Tetris?*", "ぷよぷよ～", "Mr. Driller: G", "\t\n"] {
            let once = sanitize_folder_name(name);
            assert_eq!(sanitize_folder_name(&once), once);
            assert!(once.chars().all(|c| c.is_alphanumeric() || " ._-()[]".contains(c)));
        }
    }

    #[test]
    fn test_choose_folder_falls_back_to_original() {
        assert_eq!(
            choose_folder("Game".into(), "ゲーム"),
            Some(("Game".to_string(), "Game".to_string()))
        );
        for bad in ["..", ".", "", "   "] {
            assert_eq!(
                choose_folder(bad.into(), "ゲーム"),
                Some(("ゲーム".to_string(), "ゲーム".to_string())),
                "{:?}",
                bad
            );
        }
        assert_eq!(
            choose_folder("  Game ".into(), "ゲーム"),
            Some(("Game".to_string(), "Game".to_string()))
        );
        assert_eq!(choose_folder("..".into(), ".."), None);
        assert_eq!(choose_folder("".into(), "."), None);
    }

    #[test]
    fn test_has_extension_ignores_case() {
        assert!(has_extension(Path::new("GAME.JAM"), "jam"));
        assert!(has_extension(Path::new("game.Sp"), "sp"));
        assert!(!has_extension(Path::new("game.jamx"), "jam"));
        assert!(!has_extension(Path::new("jam"), "jam"));
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Organizer::new(dir.path().join("nope")).is_err());
    }
}
