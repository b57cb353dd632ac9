//! `gridscale show` — decode and render policies.

use std::path::Path;

use anyhow::bail;

use gridscale_source::{load_dir, load_file, LoadedPolicy};

pub fn show(path: &Path, format: &str, recursive: bool) -> anyhow::Result<()> {
    let loaded = if path.is_dir() {
        load_dir(path, recursive)?
    } else {
        load_file(path)?
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&loaded)?),
        "text" => print_text(&loaded),
        other => bail!("unknown format \"{other}\" (expected text or json)"),
    }
    Ok(())
}

fn print_text(loaded: &[LoadedPolicy]) {
    for entry in loaded {
        let policy = &entry.policy;
        println!(
            "{} ({}) id={} file={}",
            entry.name,
            policy.policy_type.as_str(),
            policy.id,
            entry.path.display()
        );
        println!(
            "  enabled={} min={} max={} cooldown={:?} evaluation_interval={:?}",
            policy.enabled, policy.min, policy.max, policy.cooldown, policy.evaluation_interval
        );
        for check in &policy.checks {
            println!(
                "  check \"{}\" source={} query={:?} strategy={}",
                check.name, check.source, check.query, check.strategy.name
            );
        }
        println!(
            "  target {} ({} config keys)",
            policy.target.name,
            policy.target.config.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.toml");
        fs::write(
            &path,
            r#"
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
"#,
        )
        .unwrap();

        assert!(show(&path, "yaml", false).is_err());
        assert!(show(&path, "json", false).is_ok());
        assert!(show(&path, "text", false).is_ok());
    }
}
