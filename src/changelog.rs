//! `changelog.txt`: the only durable state the organizer keeps.
//!
//! Two shapes share one file. Right after the first scan it is a flat list of
//! `Translated (Original)` lines. Once classification has been applied it is
//! rewritten as `[Status]` sections, one per real status, each closed by a
//! blank line.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::Status;

pub const CHANGELOG_FILE: &str = "changelog.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub translated: String,
    pub original: String,
}

impl ChangelogEntry {
    pub fn new(translated: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            translated: translated.into(),
            original: original.into(),
        }
    }
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.translated, self.original)
    }
}

#[derive(Debug)]
pub struct Changelog {
    path: PathBuf,
    entry_pattern: Regex,
}

impl Changelog {
    pub fn in_dir(parent: &Path) -> Result<Self> {
        let entry_pattern = Regex::new(r"^(.*) \((.*)\)$")?;
        Ok(Self {
            path: parent.join(CHANGELOG_FILE),
            entry_pattern,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parses one line; headers, blanks and anything else yield `None`.
    pub fn parse_line(&self, line: &str) -> Option<ChangelogEntry> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let captures = self.entry_pattern.captures(line)?;
        Some(ChangelogEntry::new(&captures[1], &captures[2]))
    }

    /// Parses a `[Status]` section header.
    pub fn parse_header(&self, line: &str) -> Option<Status> {
        let name = line.trim().strip_prefix('[')?.strip_suffix(']')?;
        name.parse().ok()
    }

    /// Every entry in file order, whichever shape the file is in, paired
    /// with the section it was listed under. Flat-form entries have `None`.
    pub fn read_entries(&self) -> Result<Vec<(Option<Status>, ChangelogEntry)>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let mut section = None;
        let mut entries = Vec::new();
        for line in content.lines() {
            if let Some(status) = self.parse_header(line) {
                section = Some(status);
            } else if let Some(entry) = self.parse_line(line) {
                entries.push((section, entry));
            }
        }
        Ok(entries)
    }

    /// Appends one flat-form line, creating the file on first use.
    pub fn append(&self, entry: &ChangelogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }

    /// Replaces the file with the sectioned form. The new content is written
    /// next to the changelog and renamed over it, so readers never see a
    /// half-written file.
    pub fn rewrite_sections(&self, entries: &[(Status, ChangelogEntry)]) -> Result<()> {
        let content = render_sections(entries);
        let tmp_path = self.path.with_extension("txt.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Sectioned changelog text. `Skip` entries are left out.
pub fn render_sections(entries: &[(Status, ChangelogEntry)]) -> String {
    let mut out = String::new();
    for status in Status::CLASSIFIED {
        out.push_str(&format!("[{}]\n", status));
        for (_, entry) in entries.iter().filter(|(s, _)| *s == status) {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
