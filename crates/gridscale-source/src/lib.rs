//! gridscale-source — file-based policy source.
//!
//! Sits between the filesystem and the policy decoder: discovers policy
//! files in a directory, decodes them via [`gridscale_policy`], assigns
//! each decoded policy its stable ID, and (optionally) monitors the
//! directory for changes so the evaluation loop can reload.
//!
//! The decoder itself stays pure; everything filesystem-shaped lives here.

pub mod discover;
pub mod error;
pub mod monitor;
pub mod source;

pub use discover::discover;
pub use error::{SourceError, SourceResult};
pub use monitor::Monitor;
pub use source::{load_dir, load_file, policy_id, LoadedPolicy};
