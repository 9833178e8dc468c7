/*!
 * Error Types
 * Policy resolution and launcher errors with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Policy operation result
///
/// # Must Use
/// A failed policy must never be silently turned into a launch
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors raised while resolving a permission policy or preparing a launch.
///
/// None of these are transient: they describe a malformed policy or a host
/// that cannot enforce one, so nothing in this crate retries.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PolicyError {
    #[error("Permission source not found: {0}")]
    #[diagnostic(
        code(policy::source_not_found),
        help("Check the declaration path, or add a [Required Permissions] entry to the bundle.")
    )]
    SourceNotFound(String),

    #[error("Malformed declaration at line {line}: {reason}")]
    #[diagnostic(
        code(policy::parse_failure),
        help("Declarations use desktop-entry syntax: `[Group]` headers and `Key=Value` lines.")
    )]
    ParseFailure { line: usize, reason: String },

    #[error(
        "Invalid permissions level {} (must be 0-3)",
        .value.as_deref().unwrap_or("<missing>")
    )]
    #[diagnostic(
        code(policy::invalid_level),
        help("Set `Level` under [Required Permissions] to an integer between 0 and 3.")
    )]
    InvalidLevel { value: Option<String> },

    #[error("Entry contains no permissions")]
    #[diagnostic(
        code(policy::empty_grant_set),
        help("Declare at least one of `Files`, `Devices`, `Sockets` or `Share`.")
    )]
    EmptyGrantSet,

    #[error("Sandbox launcher unavailable: {0}")]
    #[diagnostic(
        code(policy::launcher_unavailable),
        help("Install bubblewrap (`bwrap`) or point SANDBOX_LAUNCHER at it. Nothing is run unsandboxed.")
    )]
    LauncherUnavailable(String),

    #[error("Failed to read {path}: {reason}")]
    #[diagnostic(code(policy::io))]
    Io { path: String, reason: String },
}

impl PolicyError {
    /// Level error for a raw `Level` value
    pub fn invalid_level(raw: impl Into<String>) -> Self {
        PolicyError::InvalidLevel {
            value: Some(raw.into()),
        }
    }

    /// Level error for a declaration with no `Level` key
    pub fn missing_level() -> Self {
        PolicyError::InvalidLevel { value: None }
    }

    pub(crate) fn io(path: &Path, err: &std::io::Error) -> Self {
        PolicyError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Short machine-readable name, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PolicyError::SourceNotFound(_) => "source_not_found",
            PolicyError::ParseFailure { .. } => "parse_failure",
            PolicyError::InvalidLevel { .. } => "invalid_level",
            PolicyError::EmptyGrantSet => "empty_grant_set",
            PolicyError::LauncherUnavailable(_) => "launcher_unavailable",
            PolicyError::Io { .. } => "io",
        }
    }
}
