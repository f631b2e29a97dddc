//! # Corpus Loading
//!
//! Reads form definitions and expression lists from disk. A corpus path is
//! either one JSON file (a single form or an array of forms) or a directory
//! of `.json` files, visited in file-name order so repeated runs see the
//! forms in the same sequence.

use form_analysis::logging::{codes, Code};
use form_analysis::{log_info, log_success, FormDefinition};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CORPUS_EXTENSION: &str = "json";

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid form JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No forms found under {}", path.display())]
    EmptyCorpus { path: PathBuf },

    #[error("Failed to walk {}: {message}", path.display())]
    WalkFailed { path: PathBuf, message: String },
}

impl CorpusError {
    pub fn error_code(&self) -> Code {
        match self {
            CorpusError::PathNotFound { .. } => codes::corpus::PATH_NOT_FOUND,
            CorpusError::ReadFailed { .. } => codes::corpus::READ_FAILED,
            CorpusError::InvalidJson { .. } => codes::corpus::INVALID_JSON,
            CorpusError::EmptyCorpus { .. } => codes::corpus::EMPTY_CORPUS,
            CorpusError::WalkFailed { .. } => codes::corpus::WALK_FAILED,
        }
    }
}

/// Either shape accepted in a corpus file
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Many(Vec<FormDefinition>),
    One(FormDefinition),
}

impl CorpusFile {
    fn into_forms(self) -> Vec<FormDefinition> {
        match self {
            CorpusFile::Many(forms) => forms,
            CorpusFile::One(form) => vec![form],
        }
    }
}

/// Load every form under `path`; `recursive` only matters for directories
pub fn load_corpus(path: &Path, recursive: bool) -> Result<Vec<FormDefinition>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let files = if path.is_dir() {
        discover_files(path, recursive)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut forms = Vec::new();
    for file in &files {
        let loaded = load_file(file)?;
        log_info!("Loaded corpus file",
            "file" => file.display(),
            "forms" => loaded.len()
        );
        forms.extend(loaded);
    }

    if forms.is_empty() {
        return Err(CorpusError::EmptyCorpus {
            path: path.to_path_buf(),
        });
    }

    log_success!(
        codes::success::CORPUS_LOADED,
        "Form corpus loaded",
        "path" => path.display(),
        "files" => files.len(),
        "forms" => forms.len()
    );

    Ok(forms)
}

fn discover_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, CorpusError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| CorpusError::WalkFailed {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() && has_corpus_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_corpus_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(CORPUS_EXTENSION))
        .unwrap_or(false)
}

fn load_file(path: &Path) -> Result<Vec<FormDefinition>, CorpusError> {
    let content = fs::read_to_string(path).map_err(|source| CorpusError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: CorpusFile =
        serde_json::from_str(&content).map_err(|source| CorpusError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(parsed.into_forms())
}

/// One expression per line. Blank lines are kept so results line up with
/// the file; they analyze to nothing.
pub fn load_expressions(path: &Path) -> Result<Vec<String>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| CorpusError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    const FORM_A: &str = r#"{
        "name": "FormA",
        "views": [{
            "name": "View1",
            "controls": [
                {"type": "TextField", "name": "first", "label": "First Name"},
                {"type": "TextField", "name": "last", "label": "Last Name"}
            ]
        }]
    }"#;

    fn form_json(name: &str) -> String {
        FORM_A.replace("FormA", name)
    }

    #[test]
    fn test_single_form_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("form.json");
        fs::write(&path, FORM_A).unwrap();

        let forms = load_corpus(&path, true).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].name, "FormA");
        assert_eq!(forms[0].all_controls().len(), 2);
    }

    #[test]
    fn test_form_array_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forms.json");
        fs::write(&path, format!("[{}, {}]", form_json("F1"), form_json("F2"))).unwrap();

        let forms = load_corpus(&path, true).unwrap();
        let names: Vec<&str> = forms.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["F1", "F2"]);
    }

    #[test]
    fn test_directory_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), form_json("Second")).unwrap();
        fs::write(dir.path().join("a.json"), form_json("First")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a form").unwrap();

        let forms = load_corpus(dir.path(), true).unwrap();
        let names: Vec<&str> = forms.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_non_recursive_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("top.json"), form_json("Top")).unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.json"), form_json("Deep")).unwrap();

        assert_eq!(load_corpus(dir.path(), true).unwrap().len(), 2);

        let shallow = load_corpus(dir.path(), false).unwrap();
        assert_eq!(shallow.len(), 1);
        assert_eq!(shallow[0].name, "Top");
    }

    #[test]
    fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = load_corpus(&dir.path().join("absent.json"), true).unwrap_err();
        assert_matches!(err, CorpusError::PathNotFound { .. });
        assert_eq!(err.error_code(), codes::corpus::PATH_NOT_FOUND);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_corpus(&path, true).unwrap_err();
        assert_matches!(err, CorpusError::InvalidJson { .. });
        assert_eq!(err.error_code(), codes::corpus::INVALID_JSON);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert_matches!(
            load_corpus(dir.path(), true),
            Err(CorpusError::EmptyCorpus { .. })
        );
    }

    #[test]
    fn test_expression_lines_keep_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expressions.txt");
        fs::write(&path, "my:A = 1\n\ntoday()\n").unwrap();

        let expressions = load_expressions(&path).unwrap();
        assert_eq!(expressions, vec!["my:A = 1", "", "today()"]);
    }
}
