//! gridscale-policy — scaling-policy model and policy file decoder.
//!
//! Policy files are TOML documents describing when and how to scale a
//! cluster or a workload group: target bounds, evaluation cadence, one or
//! more metric checks, and the target the decision is applied to. This
//! crate turns one such document into a map of policy name →
//! [`ScalingPolicy`], or a single combined error listing everything wrong
//! with the file.
//!
//! Decoding is pure and synchronous: same document in, same map out. The
//! decoder never logs and never returns a partial map — a file either
//! decodes completely or fails with every finding attached.

pub mod decode;
pub mod duration;
pub mod error;
pub mod policy;

pub use decode::{decode_file, decode_str};
pub use duration::parse_duration;
pub use error::{Issue, PolicyError, PolicyResult};
pub use policy::*;
