//! Input file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// File name of the directory listing that accompanies exported tables.
pub const INDEX_FILE: &str = "index.csv";

/// Lists the CSV tables of a directory, sorted by file name.
///
/// The `index.csv` listing is skipped. With `max`, at most that many files
/// are returned.
pub fn list_input_files(dir: &Path, max: Option<usize>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let is_index = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case(INDEX_FILE));
        if is_csv && !is_index {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if let Some(max) = max {
        files.truncate(max);
    }
    Ok(files)
}

/// Output path for `input` inside `out_dir`, keeping the file name.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => out_dir.join(name),
        None => out_dir.join("output.csv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &["thrombosis.csv", "index.csv", "anaemia.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "sab,code,str,cui\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_input_files_sorted_without_index() {
        let dir = create_test_dir();
        let files = list_input_files(dir.path(), None).unwrap();
        assert_eq!(names(&files), vec!["anaemia.CSV", "thrombosis.csv"]);
    }

    #[test]
    fn test_list_input_files_max() {
        let dir = create_test_dir();
        let files = list_input_files(dir.path(), Some(1)).unwrap();
        assert_eq!(names(&files), vec!["anaemia.CSV"]);
    }

    #[test]
    fn test_list_input_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("table.csv");
        std::fs::write(&file_path, "data").unwrap();
        let result = list_input_files(&file_path, None);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_output_path_keeps_name() {
        let out = output_path(Path::new("/in/anaemia.csv"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/anaemia.csv"));
    }
}
