//! `gridscale validate` — decode policy files and report problems.

use std::path::PathBuf;

use anyhow::bail;
use tracing::debug;

use gridscale_source::{discover, load_file};

pub fn validate(paths: &[PathBuf], recursive: bool) -> anyhow::Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(discover(path, recursive)?);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        bail!("no policy files found");
    }
    debug!(count = files.len(), "validating policy files");

    let mut failures = 0usize;
    for file in &files {
        match load_file(file) {
            Ok(policies) => {
                println!("✓ {} ({} policies)", file.display(), policies.len());
            }
            Err(e) => {
                // The decoder's error text already names the file and the
                // failing block/attribute.
                eprintln!("✗ {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} policy files failed validation", files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GOOD: &str = r#"
[scaling.web]
min = 1
max = 5

[[scaling.web.check]]
name = "cpu"
source = "prometheus"
query = "avg_cpu"

[scaling.web.check.strategy.target-value]
target = 70

[scaling.web.target.nomad]
"#;

    #[test]
    fn valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.toml");
        fs::write(&path, GOOD).unwrap();

        assert!(validate(&[path], false).is_ok());
    }

    #[test]
    fn broken_file_fails_with_count() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad = dir.path().join("bad.toml");
        fs::write(&good, GOOD).unwrap();
        fs::write(&bad, "[scaling.bad]\nmin = 1\n").unwrap();

        let err = validate(&[dir.path().to_path_buf()], false).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate(&[dir.path().to_path_buf()], false).is_err());
    }
}
