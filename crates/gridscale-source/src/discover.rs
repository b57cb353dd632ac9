//! Policy file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{SourceError, SourceResult};

/// Collect the policy files under `dir`.
///
/// Only `.toml` files count. With `recursive` false, only the directory's
/// own entries are considered. Results are sorted so repeated discovery of
/// an unchanged directory yields the same list.
pub fn discover(dir: &Path, recursive: bool) -> SourceResult<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| SourceError::Walk {
            path: dir.display().to_string(),
            source: e,
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "toml")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_only_toml_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = discover(dir.path(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.toml", "b.toml"]);
    }

    #[test]
    fn recursion_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.toml"), "").unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.toml"), "").unwrap();

        let flat = discover(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = discover(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = discover(Path::new("/definitely/not/here"), false).unwrap_err();
        assert!(matches!(err, SourceError::Walk { .. }));
    }
}
