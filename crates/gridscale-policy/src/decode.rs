//! Policy document decoding.
//!
//! A policy file is a TOML document in one of two shapes: a top-level
//! `scaling` table of named cluster policies, or a `job` table whose
//! groups embed a `scaling` block (a horizontal policy). The TOML parser
//! produces the generic table tree; everything here walks that tree
//! explicitly, field by field, so the required/optional/default rule for
//! every attribute is visible in one place.
//!
//! Decoding never stops at the first problem. Field-level findings are
//! pushed into an ordered collector and joined into one
//! [`PolicyError::Invalid`] at the end, so a broken file reports every
//! issue in a single pass. Only a TOML syntax error short-circuits.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use toml::value::Table;
use toml::Value;

use crate::duration::parse_duration;
use crate::error::{Issue, PolicyError, PolicyResult};
use crate::policy::{
    PolicyType, ScalingPolicy, ScalingPolicyCheck, ScalingPolicyStrategy, ScalingPolicyTarget,
};

/// Decode one policy file into a map of policy name → policy.
///
/// A file with no policy blocks decodes to an empty map; whether that is
/// acceptable is the caller's call.
pub fn decode_file(path: &Path) -> PolicyResult<HashMap<String, ScalingPolicy>> {
    let src = fs::read_to_string(path).map_err(|e| PolicyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    decode_str(&src, &path.display().to_string())
}

/// Decode a policy document from a string. `origin` names the document in
/// errors (usually the file path).
pub fn decode_str(src: &str, origin: &str) -> PolicyResult<HashMap<String, ScalingPolicy>> {
    let root: Table = toml::from_str(src).map_err(|e| PolicyError::Syntax {
        origin: origin.to_string(),
        source: Box::new(e),
    })?;

    let mut issues = Vec::new();
    let mut policies = HashMap::new();

    // The two legal document shapes get their own entry points; the policy
    // kind comes from which shape the block sat in, never from its fields.
    if let Some(scaling) = root.get("scaling") {
        decode_cluster_policies(scaling, &mut policies, &mut issues);
    }
    if let Some(job) = root.get("job") {
        decode_job_policies(job, &mut policies, &mut issues);
    }

    if issues.is_empty() {
        Ok(policies)
    } else {
        Err(PolicyError::Invalid {
            origin: origin.to_string(),
            issues,
        })
    }
}

/// Walk `[scaling.<name>]` entries: each is a cluster policy keyed by its
/// label.
fn decode_cluster_policies(
    value: &Value,
    policies: &mut HashMap<String, ScalingPolicy>,
    issues: &mut Vec<Issue>,
) {
    let Some(entries) = expect_table(value, "scaling", issues) else {
        return;
    };
    for (name, body) in entries {
        let scope = format!("scaling \"{name}\"");
        let Some(body) = expect_table(body, &scope, issues) else {
            continue;
        };
        let policy = decode_policy_body(&scope, body, PolicyType::Cluster, issues);
        insert_policy(name.clone(), policy, policies, issues);
    }
}

/// Walk `[job.<job>.group.<group>.scaling]` blocks: each is a horizontal
/// policy. The map key is the block's `name` attribute when present,
/// otherwise `"<job>/<group>"`.
fn decode_job_policies(
    value: &Value,
    policies: &mut HashMap<String, ScalingPolicy>,
    issues: &mut Vec<Issue>,
) {
    let Some(jobs) = expect_table(value, "job", issues) else {
        return;
    };
    for (job_name, job_body) in jobs {
        let job_scope = format!("job \"{job_name}\"");
        let Some(job_body) = expect_table(job_body, &job_scope, issues) else {
            continue;
        };
        let Some(groups) = job_body.get("group") else {
            continue;
        };
        let groups_scope = format!("{job_scope}: group");
        let Some(groups) = expect_table(groups, &groups_scope, issues) else {
            continue;
        };
        for (group_name, group_body) in groups {
            let group_scope = format!("{job_scope}: group \"{group_name}\"");
            let Some(group_body) = expect_table(group_body, &group_scope, issues) else {
                continue;
            };
            let Some(scaling) = group_body.get("scaling") else {
                continue;
            };
            let scope = format!("{group_scope}: scaling");
            let Some(body) = expect_table(scaling, &scope, issues) else {
                continue;
            };
            let policy = decode_policy_body(&scope, body, PolicyType::Horizontal, issues);
            let key = match body.get("name") {
                Some(Value::String(name)) if !name.is_empty() => name.clone(),
                Some(Value::String(_)) | None => format!("{job_name}/{group_name}"),
                Some(other) => {
                    issues.push(Issue::WrongType {
                        block: scope.clone(),
                        attribute: "name".to_string(),
                        expected: "a string",
                        found: other.type_str(),
                    });
                    format!("{job_name}/{group_name}")
                }
            };
            insert_policy(key, policy, policies, issues);
        }
    }
}

fn insert_policy(
    name: String,
    policy: ScalingPolicy,
    policies: &mut HashMap<String, ScalingPolicy>,
    issues: &mut Vec<Issue>,
) {
    if policies.contains_key(&name) {
        issues.push(Issue::DuplicatePolicyName { name });
        return;
    }
    policies.insert(name, policy);
}

/// Decode the body shared by both policy shapes. Always returns a record;
/// when fields are broken the collector carries the findings and the
/// overall decode fails, so a partially-built policy never escapes.
fn decode_policy_body(
    scope: &str,
    body: &Table,
    policy_type: PolicyType,
    issues: &mut Vec<Issue>,
) -> ScalingPolicy {
    let enabled = bool_attr(body, "enabled", scope, issues).unwrap_or(true);
    let min = int_attr(body, "min", scope, issues).unwrap_or(0);
    let max = int_attr(body, "max", scope, issues).unwrap_or(0);
    let cooldown = duration_attr(body, "cooldown", scope, issues).unwrap_or(Duration::ZERO);
    let evaluation_interval =
        duration_attr(body, "evaluation_interval", scope, issues).unwrap_or(Duration::ZERO);
    let on_check_error = str_attr(body, "on_check_error", scope, issues).unwrap_or_default();

    let checks = decode_checks(scope, body, issues);
    let target = match decode_named_block(scope, body, "target", issues) {
        Some((name, config)) => ScalingPolicyTarget { name, config },
        None => ScalingPolicyTarget::default(),
    };

    ScalingPolicy {
        id: String::new(),
        policy_type,
        enabled,
        min,
        max,
        cooldown,
        evaluation_interval,
        on_check_error,
        checks,
        target,
    }
}

/// Decode the `check` blocks in document order. A policy with no checks
/// is a validation error.
fn decode_checks(scope: &str, body: &Table, issues: &mut Vec<Issue>) -> Vec<ScalingPolicyCheck> {
    let entries: Vec<&Table> = match body.get("check") {
        None => {
            issues.push(Issue::NoChecks {
                block: scope.to_string(),
            });
            return Vec::new();
        }
        Some(Value::Array(items)) => {
            let mut tables = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let block = format!("{scope}: check #{}", idx + 1);
                if let Some(table) = expect_table(item, &block, issues) {
                    tables.push(table);
                }
            }
            tables
        }
        // A single `[...check]` table is one check.
        Some(Value::Table(table)) => vec![table],
        Some(other) => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: "check".to_string(),
                expected: "a block or list of blocks",
                found: other.type_str(),
            });
            return Vec::new();
        }
    };

    if entries.is_empty() {
        issues.push(Issue::NoChecks {
            block: scope.to_string(),
        });
        return Vec::new();
    }

    let mut checks: Vec<ScalingPolicyCheck> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let check_scope = match entry.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {
                format!("{scope}: check \"{name}\"")
            }
            _ => format!("{scope}: check #{}", idx + 1),
        };
        let check = decode_check(&check_scope, entry, issues);
        if !check.name.is_empty() && checks.iter().any(|c| c.name == check.name) {
            issues.push(Issue::DuplicateCheckName {
                block: scope.to_string(),
                name: check.name.clone(),
            });
        }
        checks.push(check);
    }
    checks
}

fn decode_check(scope: &str, entry: &Table, issues: &mut Vec<Issue>) -> ScalingPolicyCheck {
    let name = required_str(entry, "name", scope, issues);
    let group = str_attr(entry, "group", scope, issues).unwrap_or_default();
    let source = required_str(entry, "source", scope, issues);
    let query = required_str(entry, "query", scope, issues);
    let query_window = duration_attr(entry, "query_window", scope, issues).unwrap_or(Duration::ZERO);
    let on_error = str_attr(entry, "on_error", scope, issues).unwrap_or_default();
    let strategy = match decode_named_block(scope, entry, "strategy", issues) {
        Some((name, config)) => ScalingPolicyStrategy { name, config },
        None => ScalingPolicyStrategy::default(),
    };

    ScalingPolicyCheck {
        name,
        group,
        source,
        query,
        query_window,
        on_error,
        strategy,
    }
}

/// Decode a labelled single block (`strategy` or `target`): a table with
/// exactly one key — the block's name — whose value is the config map.
/// Zero or multiple labels is a cardinality error reporting the count.
fn decode_named_block(
    scope: &str,
    body: &Table,
    key: &'static str,
    issues: &mut Vec<Issue>,
) -> Option<(String, HashMap<String, String>)> {
    let value = match body.get(key) {
        None => {
            issues.push(Issue::MissingBlock {
                block: scope.to_string(),
                name: key,
            });
            return None;
        }
        Some(value) => value,
    };
    let labels = match value {
        Value::Table(table) => table,
        // Repeated `[[...strategy]]` blocks parse as an array.
        Value::Array(items) => {
            issues.push(Issue::BlockCount {
                block: scope.to_string(),
                name: key,
                count: items.len(),
            });
            return None;
        }
        other => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "a table",
                found: other.type_str(),
            });
            return None;
        }
    };
    if labels.len() != 1 {
        issues.push(Issue::BlockCount {
            block: scope.to_string(),
            name: key,
            count: labels.len(),
        });
        return None;
    }

    // Sole entry: label → config map.
    let (name, config) = labels.iter().next()?;
    if name.is_empty() {
        issues.push(Issue::EmptyAttribute {
            block: format!("{scope}: {key}"),
            attribute: "name",
        });
        return None;
    }
    let block = format!("{scope}: {key} \"{name}\"");
    let Some(config) = expect_table(config, &block, issues) else {
        return None;
    };
    Some((name.clone(), decode_config(&block, config, issues)))
}

/// Decode a config map. Values of any scalar kind are kept as their string
/// representation (`80` → `"80"`, `true` → `"true"`).
fn decode_config(
    scope: &str,
    table: &Table,
    issues: &mut Vec<Issue>,
) -> HashMap<String, String> {
    let mut config = HashMap::with_capacity(table.len());
    for (key, value) in table {
        match stringify(value) {
            Some(text) => {
                config.insert(key.clone(), text);
            }
            None => {
                issues.push(Issue::WrongType {
                    block: scope.to_string(),
                    attribute: key.clone(),
                    expected: "a string, number, or boolean",
                    found: value.type_str(),
                });
            }
        }
    }
    config
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

// ── Scalar attribute helpers ───────────────────────────────────────

fn expect_table<'a>(value: &'a Value, block: &str, issues: &mut Vec<Issue>) -> Option<&'a Table> {
    match value {
        Value::Table(table) => Some(table),
        other => {
            issues.push(Issue::NotATable {
                block: block.to_string(),
                found: other.type_str(),
            });
            None
        }
    }
}

fn str_attr(table: &Table, key: &str, scope: &str, issues: &mut Vec<Issue>) -> Option<String> {
    match table.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "a string",
                found: other.type_str(),
            });
            None
        }
    }
}

/// Like [`str_attr`] but absence or an empty value is a finding. Returns
/// `""` on failure so decoding can continue.
fn required_str(
    table: &Table,
    key: &'static str,
    scope: &str,
    issues: &mut Vec<Issue>,
) -> String {
    match table.get(key) {
        None => {
            issues.push(Issue::MissingAttribute {
                block: scope.to_string(),
                attribute: key,
            });
            String::new()
        }
        Some(Value::String(s)) if s.is_empty() => {
            issues.push(Issue::EmptyAttribute {
                block: scope.to_string(),
                attribute: key,
            });
            String::new()
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "a string",
                found: other.type_str(),
            });
            String::new()
        }
    }
}

fn int_attr(table: &Table, key: &str, scope: &str, issues: &mut Vec<Issue>) -> Option<i64> {
    match table.get(key)? {
        Value::Integer(i) => Some(*i),
        other => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "an integer",
                found: other.type_str(),
            });
            None
        }
    }
}

fn bool_attr(table: &Table, key: &str, scope: &str, issues: &mut Vec<Issue>) -> Option<bool> {
    match table.get(key)? {
        Value::Boolean(b) => Some(*b),
        other => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "a boolean",
                found: other.type_str(),
            });
            None
        }
    }
}

fn duration_attr(
    table: &Table,
    key: &'static str,
    scope: &str,
    issues: &mut Vec<Issue>,
) -> Option<Duration> {
    match table.get(key)? {
        Value::String(literal) => match parse_duration(literal) {
            Ok(duration) => Some(duration),
            Err(reason) => {
                issues.push(Issue::BadDuration {
                    block: scope.to_string(),
                    attribute: key,
                    value: literal.clone(),
                    reason: reason.to_string(),
                });
                None
            }
        },
        other => {
            issues.push(Issue::WrongType {
                block: scope.to_string(),
                attribute: key.to_string(),
                expected: "a duration string",
                found: other.type_str(),
            });
            None
        }
    }
}
