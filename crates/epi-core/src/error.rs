//! Workspace error type.
//!
//! Sub-crates define their own error enums and either convert into `EpiError`
//! via `From` impls or wrap it as one variant.  Both patterns are acceptable;
//! prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `epi-core` and a common base for sub-crates.
///
/// `Config` and `Schedule` are construction-time invariant violations: a
/// malformed disease schedule corrupts all downstream statistics, so callers
/// must abort the run rather than clamp values.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("disease schedule invariant violated: {0}")]
    Schedule(String),
}

/// Shorthand result type for all `epi-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
