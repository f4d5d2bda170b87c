//! Input discovery for batch runs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use shared_docx::DocxError;
use tracing::info;

/// Office lock files (`~$…`) and hidden files
pub fn is_skipped_name(name: &str) -> bool {
    name.starts_with("~$") || name.starts_with('.')
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `.docx` files directly inside `dir`, sorted, skipping lock and hidden files
pub fn docx_in_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_docx(&path) {
            continue;
        }
        let name = file_name(&path);
        if is_skipped_name(&name) {
            info!(file = %name, "Skipping temporary or hidden file");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Expand directories; explicit file arguments are kept as given
pub fn collect_docx(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(docx_in_dir(input)?);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Result of opening one document in a `check` run
#[derive(Debug)]
pub struct CheckResult {
    pub file_name: String,
    /// Body paragraph count when the document opened
    pub outcome: Result<usize, DocxError>,
}

impl CheckResult {
    pub fn line(&self) -> String {
        match &self.outcome {
            Ok(count) => format!("[OK] {} ({} paragraphs)", self.file_name, count),
            Err(e) => format!("[ERROR] {}: {}", self.file_name, e),
        }
    }
}

/// Try to open every `.docx` in `dir`
pub fn check_dir(dir: &Path) -> io::Result<Vec<CheckResult>> {
    Ok(docx_in_dir(dir)?
        .into_iter()
        .map(|path| CheckResult {
            file_name: file_name(&path),
            outcome: shared_docx::read_document(&path).map(|doc| doc.paragraph_count),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_docx::DocxBuilder;

    #[test]
    fn test_skipped_names() {
        assert!(is_skipped_name("~$Articles.docx"));
        assert!(is_skipped_name(".hidden.docx"));
        assert!(!is_skipped_name("Articles.docx"));
    }

    #[test]
    fn test_collect_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.docx", "a.DOCX", "~$b.docx", ".c.docx", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let explicit = PathBuf::from("/elsewhere/z.docx");

        let files = collect_docx(&[dir.path().to_path_buf(), explicit.clone()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.DOCX", "b.docx", "z.docx"]);
        assert_eq!(files[2], explicit);
    }

    #[test]
    fn test_check_dir_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        DocxBuilder::new()
            .paragraph("Hello")
            .empty_paragraph()
            .write_to(&dir.path().join("good.docx"))
            .unwrap();
        fs::write(dir.path().join("bad.docx"), b"not a zip").unwrap();

        let results = check_dir(dir.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].line().starts_with("[ERROR] bad.docx:"));
        assert_eq!(results[1].line(), "[OK] good.docx (2 paragraphs)");
    }
}
