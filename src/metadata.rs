use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::SHIFT_JIS;
use regex::Regex;

const APP_NAME_MARKER: &str = "AppName";

/// Pulls the declared application name out of a `.jam` descriptor.
#[derive(Debug)]
pub struct NameExtractor {
    app_name_pattern: Regex,
}

impl NameExtractor {
    pub fn new() -> Result<Self> {
        let app_name_pattern = Regex::new(r"AppName\s*=\s*(.*)")?;
        Ok(Self { app_name_pattern })
    }

    /// Returns `None` when no line declares a non-empty name.
    pub fn extract(&self, jam_path: &Path) -> Result<Option<String>> {
        let bytes = fs::read(jam_path)
            .with_context(|| format!("Failed to read {}", jam_path.display()))?;
        Ok(self.extract_from_bytes(&bytes))
    }

    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Option<String> {
        let text = decode_shift_jis(bytes);

        for line in text.lines() {
            if !line.contains(APP_NAME_MARKER) {
                continue;
            }
            if let Some(captures) = self.app_name_pattern.captures(line) {
                let name = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                if name.is_empty() {
                    return None;
                }
                return Some(name.to_string());
            }
        }

        None
    }
}

/// Lenient decode: bytes that are not valid Shift_JIS are dropped.
fn decode_shift_jis(bytes: &[u8]) -> String {
    let (decoded, _had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    decoded.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect()
}
