/*!
 * Security Traits
 * Seams between the compiler stages and the host launcher
 */

use super::sandbox::config::SandboxContext;
use super::types::SandboxDirective;
use crate::core::errors::PolicyResult;
use crate::permissions::types::PermissionModel;
use std::path::PathBuf;

/// One stage of directive compilation.
///
/// Stages append to a shared list and must emit in a deterministic order;
/// the compiler runs them in a fixed sequence.
pub trait DirectiveStage: Send + Sync {
    /// Stage name for logs
    fn name(&self) -> &'static str;

    /// Append this stage's directives
    fn emit(&self, model: &PermissionModel, ctx: &SandboxContext, out: &mut Vec<SandboxDirective>);
}

/// Finds the external namespace launcher
pub trait LauncherLocator: Send + Sync {
    /// Absolute path of the launcher, or `LauncherUnavailable`
    fn locate(&self) -> PolicyResult<PathBuf>;
}
