/*!
 * Bundle Sandbox Library
 * Permission resolution and sandbox directive compilation for application bundles
 */

pub mod core;
pub mod monitoring;
pub mod permissions;
pub mod security;

// Re-exports
pub use crate::core::errors::{PolicyError, PolicyResult};
pub use monitoring::{init_tracing, LaunchSpan};
pub use permissions::{
    DesktopEntry, FileGrant, PermissionModel, PermissionResolver, ProfileRegistry, Rejection,
    Resolution, ResolveRequest, SourceKind, TrustLevel,
};
pub use security::sandbox::{DirectiveCompiler, HostSnapshot, SandboxContext, SandboxIdentity};
pub use security::{
    render_args, LaunchId, LaunchPlan, LauncherLocator, Namespace, SandboxDirective,
    SystemLauncher,
};
