/*!
 * Security Module
 * Sandbox directive compilation and launcher command rendering
 */

pub mod launcher;
pub mod sandbox;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use launcher::{LaunchId, LaunchPlan, SystemLauncher};
pub use sandbox::{DirectiveCompiler, SandboxContext};
pub use traits::*;
pub use types::*;
