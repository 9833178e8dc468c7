/*!
 * Permission Traits
 * Abstraction over the places a permission model can come from
 */

use super::types::{PermissionModel, Rejection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Curated,
    DeclarationFile,
    Embedded,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Curated => "curated",
            SourceKind::DeclarationFile => "declaration_file",
            SourceKind::Embedded => "embedded",
        })
    }
}

/// One candidate source of permissions
pub trait PermissionSource {
    fn kind(&self) -> SourceKind;

    /// Load the model for `app_name`.
    ///
    /// `None` means this source has nothing to say about the application and
    /// the next source should be consulted. `Some(Err(_))` is final.
    fn load(&self, app_name: &str) -> Option<Result<PermissionModel, Rejection>>;
}
