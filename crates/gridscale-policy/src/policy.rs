//! Scaling-policy domain types.
//!
//! These are the records the decoder produces and the evaluation loop
//! consumes. They are plain values: created fresh per decode call, never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Where a policy was declared, which decides how it is evaluated.
///
/// The kind is fixed by the document shape the policy block sat in — a
/// standalone cluster-scaling document or a job/group scaling block — and
/// is never derived from field contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// Scales a whole cluster (node pool, autoscaling group, ...).
    Cluster,
    /// Scales a workload group horizontally (instance count).
    Horizontal,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Cluster => "cluster",
            PolicyType::Horizontal => "horizontal",
        }
    }
}

/// A named rule set describing when and how to scale one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    /// Assigned by the policy source after decode; always `""` straight
    /// out of the decoder.
    pub id: String,
    /// Declaration context of the policy block.
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Whether the policy participates in evaluation. Defaults to true.
    pub enabled: bool,
    /// Lower bound for the scalable resource.
    pub min: i64,
    /// Upper bound for the scalable resource.
    pub max: i64,
    /// Wait after a scaling action before acting again. Zero when the
    /// document omits it; the evaluation loop applies its own default.
    pub cooldown: Duration,
    /// How often the policy is evaluated. Zero when omitted.
    pub evaluation_interval: Duration,
    /// Policy-level behavior when a check errors ("fail", "ignore", ...).
    /// Empty when unset; per-check `on_error` overrides it.
    pub on_check_error: String,
    /// Metric checks, in document order. Order is significant for
    /// reproducible evaluation.
    pub checks: Vec<ScalingPolicyCheck>,
    /// The adapter the scaling decision is applied to.
    pub target: ScalingPolicyTarget,
}

/// One metric-based condition within a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicyCheck {
    /// Check name, unique within the policy.
    pub name: String,
    /// Optional sub-grouping (e.g. metric family).
    pub group: String,
    /// Metric backend the query runs against ("nomad_apm", "prometheus").
    pub source: String,
    /// Backend-specific query expression.
    pub query: String,
    /// Time window the query covers. Zero when omitted.
    pub query_window: Duration,
    /// Per-check override of `on_check_error`. Empty when unset.
    pub on_error: String,
    /// How the metric value turns into a scaling decision.
    pub strategy: ScalingPolicyStrategy,
}

/// The algorithm (plus parameters) that turns a check's metric value into
/// a scaling decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicyStrategy {
    /// Strategy algorithm name (e.g. "target-value").
    pub name: String,
    /// Strategy-specific parameters. Values are always raw strings; the
    /// decoder stringifies numbers and booleans.
    pub config: HashMap<String, String>,
}

/// The adapter and parameters identifying what a policy scales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicyTarget {
    /// Target adapter name (e.g. "aws-asg", "nomad").
    pub name: String,
    /// Adapter-specific parameters, stringified like strategy config.
    pub config: HashMap<String, String>,
}
