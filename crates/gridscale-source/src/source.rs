//! Loading decoded policies from disk and assigning their IDs.
//!
//! The decoder leaves every policy's `id` empty; this module is the
//! collaborator that fills it. An ID is derived from the file path and the
//! policy name, so it is stable across reloads of an unchanged file and
//! distinct for same-named policies in different files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use gridscale_policy::{decode_file, ScalingPolicy};

use crate::discover::discover;
use crate::error::SourceResult;

/// One decoded policy together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedPolicy {
    /// The policy's map key within its file.
    pub name: String,
    /// The file the policy was declared in.
    pub path: PathBuf,
    /// The decoded record, with `id` assigned.
    pub policy: ScalingPolicy,
}

/// Derive the stable ID for a policy: the first 16 hex characters of
/// `sha256("<path>/<name>")`.
pub fn policy_id(path: &Path, name: &str) -> String {
    let digest = Sha256::digest(format!("{}/{}", path.display(), name));
    hex::encode(&digest[..8])
}

/// Decode one policy file and assign IDs. Results are sorted by policy
/// name for determinism.
pub fn load_file(path: &Path) -> SourceResult<Vec<LoadedPolicy>> {
    let decoded = decode_file(path)?;
    let mut loaded: Vec<LoadedPolicy> = decoded
        .into_iter()
        .map(|(name, mut policy)| {
            policy.id = policy_id(path, &name);
            LoadedPolicy {
                name,
                path: path.to_path_buf(),
                policy,
            }
        })
        .collect();
    loaded.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(loaded)
}

/// Decode every policy file under `dir`.
///
/// Policies keep their source path; same-named policies in different
/// files are both returned (nothing is merged or deduplicated here).
pub fn load_dir(dir: &Path, recursive: bool) -> SourceResult<Vec<LoadedPolicy>> {
    let mut all = Vec::new();
    for path in discover(dir, recursive)? {
        all.extend(load_file(&path)?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const POLICY: &str = r#"
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
    fn policy_id_is_stable_and_16_hex_chars() {
        let a = policy_id(Path::new("/etc/policies/web.toml"), "web");
        let b = policy_id(Path::new("/etc/policies/web.toml"), "web");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn policy_id_varies_with_path_and_name() {
        let base = policy_id(Path::new("/p/a.toml"), "web");
        assert_ne!(base, policy_id(Path::new("/p/b.toml"), "web"));
        assert_ne!(base, policy_id(Path::new("/p/a.toml"), "db"));
    }

    #[test]
    fn load_file_assigns_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.toml");
        fs::write(&path, POLICY).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "web");
        assert_eq!(loaded[0].policy.id, policy_id(&path, "web"));
        assert_eq!(loaded[0].path, path);
    }

    #[test]
    fn load_dir_collects_all_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.toml"), POLICY).unwrap();
        fs::write(
            dir.path().join("b.toml"),
            POLICY.replace("scaling.web", "scaling.api"),
        )
        .unwrap();

        let loaded = load_dir(dir.path(), false).unwrap();
        // Files load in discovery order: a.toml ("web") before b.toml ("api").
        let names: Vec<&str> = loaded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["web", "api"]);
    }

    #[test]
    fn load_dir_same_name_in_two_files_keeps_both() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.toml"), POLICY).unwrap();
        fs::write(dir.path().join("b.toml"), POLICY).unwrap();

        let loaded = load_dir(dir.path(), false).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_ne!(loaded[0].policy.id, loaded[1].policy.id);
    }

    #[test]
    fn load_file_propagates_decode_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[scaling.broken]\nmin = 1\n").unwrap();

        assert!(load_file(&path).is_err());
    }
}
