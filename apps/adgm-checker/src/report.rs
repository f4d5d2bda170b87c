//! Output naming and report persistence

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use shared_types::Report;
use tokio::sync::Mutex;

/// Longest sanitized base name, in chars
pub const MAX_NAME_LEN: usize = 120;

/// Hex chars of the source-path hash appended to a colliding stem
const COLLISION_SUFFIX_LEN: usize = 8;

/// Keep `[A-Za-z0-9_.-]`, replace everything else with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect()
}

fn safe_stem(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_name(&stem)
}

/// `<stem>_<hash of source path>`, still within `MAX_NAME_LEN`
fn disambiguate(stem: &str, source: &Path) -> String {
    let digest = hex::encode(Sha256::digest(source.to_string_lossy().as_bytes()));
    let head: String = stem
        .chars()
        .take(MAX_NAME_LEN - COLLISION_SUFFIX_LEN - 1)
        .collect();
    format!("{}_{}", head, &digest[..COLLISION_SUFFIX_LEN])
}

/// Output base names handed out during one run
///
/// The first source with a given stem keeps the plain stem. A different
/// source with the same stem gets the stem plus a hash of its canonical path,
/// so batch runs never share output or staging files.
#[derive(Debug, Default)]
pub struct OutputNames {
    claimed: Mutex<HashMap<String, PathBuf>>,
}

impl OutputNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn claim(&self, source: &Path) -> String {
        let canonical = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
        let stem = safe_stem(source);

        let mut claimed = self.claimed.lock().await;
        let name = match claimed.get(&stem) {
            Some(owner) if *owner != canonical => disambiguate(&stem, &canonical),
            _ => stem,
        };
        claimed.insert(name.clone(), canonical);
        name
    }
}

/// `annotated_<name>.docx`
pub fn annotated_file_name(name: &str) -> String {
    format!("annotated_{}.docx", name)
}

/// `report_<name>_<UTC timestamp>.json`
pub fn report_file_name(name: &str, at: DateTime<Utc>) -> String {
    format!("report_{}_{}.json", name, at.format("%Y%m%dT%H%M%SZ"))
}

/// Write pretty JSON via a temp file and rename
pub fn write_report(report: &Report, path: &Path) -> io::Result<()> {
    let json = report.to_json().map_err(io::Error::other)?;

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}
