/*!
 * Permissions Module
 * Permission model, declaration parsing and source resolution
 *
 * ## Usage
 * ```ignore
 * use bundle_sandbox::permissions::{PermissionResolver, ResolveRequest};
 *
 * let request = ResolveRequest::new("krita").with_declaration_file(path);
 * match PermissionResolver::new().resolve(&request) {
 *     Ok(resolution) => compile(&resolution.model),
 *     Err(rejection) => eprintln!("rejected: {}", rejection.error),
 * }
 * ```
 */

pub mod entry;
pub mod profiles;
pub mod resolver;
pub mod sources;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use entry::{split_list, DesktopEntry};
pub use profiles::{CuratedProfile, ProfileRegistry};
pub use resolver::{PermissionResolver, Resolution, ResolveRequest};
pub use sources::{model_from_entry, PERMISSIONS_GROUP};
pub use traits::{PermissionSource, SourceKind};
pub use types::{AccessMode, FileGrant, PermissionModel, Rejection, TrustLevel};
