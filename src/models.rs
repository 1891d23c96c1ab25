use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Classification bucket for an application.
///
/// The first three variants are backed by a subfolder of the same name under
/// the parent directory. `Skip` means the application folder stays at the top
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    FullyWorking,
    NotWorking,
    Duplicate,
    Skip,
}

impl Status {
    /// Every status in declaration order. The form offers them in this order.
    pub const ALL: [Status; 4] = [
        Status::FullyWorking,
        Status::NotWorking,
        Status::Duplicate,
        Status::Skip,
    ];

    /// Statuses that own a subfolder, in the order they are probed and written.
    pub const CLASSIFIED: [Status; 3] = [Status::FullyWorking, Status::NotWorking, Status::Duplicate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::FullyWorking => "Fully-Working",
            Status::NotWorking => "Not-Working",
            Status::Duplicate => "Duplicate",
            Status::Skip => "SKIP",
        }
    }

    /// Name of the subfolder holding applications with this status.
    pub fn folder_name(&self) -> Option<&'static str> {
        match self {
            Status::Skip => None,
            other => Some(other.as_str()),
        }
    }

    pub fn next(&self) -> Status {
        let i = self.index();
        Status::ALL[(i + 1) % Status::ALL.len()]
    }

    pub fn previous(&self) -> Status {
        let i = self.index();
        Status::ALL[(i + Status::ALL.len() - 1) % Status::ALL.len()]
    }

    fn index(&self) -> usize {
        Status::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// One legacy application bundle discovered on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AppRecord {
    /// `.jam` filename shown in the form. Empty when the folder holds none.
    pub jam_file: String,
    pub original_name: String,
    pub translated_name: String,
    /// Sanitized folder name; the record's identity.
    pub folder: String,
    /// `None` until the application has been classified once.
    pub status: Option<Status>,
}

impl AppRecord {
    /// Status the form should preselect for this record.
    pub fn default_status(&self) -> Status {
        self.status.unwrap_or(Status::ALL[0])
    }

    pub fn display_line(&self) -> String {
        format!("{}: {} ({})", self.jam_file, self.translated_name, self.original_name)
    }
}

/// Folder identity -> chosen status, as confirmed in the form.
pub type Classification = HashMap<String, Status>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileSummary {
    pub total: usize,
    pub moved: usize,
    pub unchanged: usize,
    pub missing: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert!("Working".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_cycles() {
        assert_eq!(Status::FullyWorking.next(), Status::NotWorking);
        assert_eq!(Status::Skip.next(), Status::FullyWorking);
        assert_eq!(Status::FullyWorking.previous(), Status::Skip);
    }

    #[test]
    fn test_skip_has_no_folder() {
        assert_eq!(Status::Skip.folder_name(), None);
        assert_eq!(Status::Duplicate.folder_name(), Some("Duplicate"));
    }

    #[test]
    fn test_default_status_falls_back_to_first() {
        let mut record = AppRecord {
            jam_file: "a.jam".into(),
            original_name: "ゲーム".into(),
            translated_name: "Game".into(),
            folder: "Game".into(),
            status: None,
        };
        assert_eq!(record.default_status(), Status::FullyWorking);
        record.status = Some(Status::Skip);
        assert_eq!(record.default_status(), Status::Skip);
        assert_eq!(record.display_line(), "a.jam: Game (ゲーム)");
    }
}
