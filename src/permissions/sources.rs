/*!
 * Permission Sources
 * Curated profiles, standalone declaration files and embedded declarations
 */

use super::entry::DesktopEntry;
use super::profiles::ProfileRegistry;
use super::traits::{PermissionSource, SourceKind};
use super::types::{PermissionModel, Rejection, TrustLevel};
use crate::core::errors::PolicyError;
use std::path::Path;
use tracing::debug;

/// Group holding the permission keys
pub const PERMISSIONS_GROUP: &str = "Required Permissions";

/// Build a model from the `[Required Permissions]` group of an entry.
///
/// Every grant that parses is kept even when validation fails, so the
/// rejection can still be inspected.
pub fn model_from_entry(entry: &DesktopEntry) -> Result<PermissionModel, Rejection> {
    let (level, level_error) = match entry.get(PERMISSIONS_GROUP, "Level") {
        Some(raw) if !raw.trim().is_empty() => match TrustLevel::parse(raw) {
            Ok(level) => (level, None),
            Err(err) => (TrustLevel::INVALID, Some(err)),
        },
        _ => (TrustLevel::INVALID, Some(PolicyError::missing_level())),
    };

    let model = PermissionModel::new(level)
        .with_files(entry.get_list(PERMISSIONS_GROUP, "Files"))
        .with_devices(entry.get_list(PERMISSIONS_GROUP, "Devices"))
        .with_sockets(entry.get_list(PERMISSIONS_GROUP, "Sockets"))
        .with_share(entry.get_list(PERMISSIONS_GROUP, "Share"));

    if !model.has_grants() {
        return Err(Rejection::new(model, PolicyError::EmptyGrantSet));
    }
    if let Some(err) = level_error {
        return Err(Rejection::new(model, err));
    }
    model.validate()
}

/// Builtin profile lookup
#[derive(Debug, Clone, Copy)]
pub struct CuratedSource {
    registry: ProfileRegistry,
}

impl CuratedSource {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self { registry }
    }
}

impl PermissionSource for CuratedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Curated
    }

    fn load(&self, app_name: &str) -> Option<Result<PermissionModel, Rejection>> {
        let profile = self.registry.lookup(app_name)?;
        debug!(app = app_name, profile = profile.name, "curated profile matched");
        Some(profile.to_model().validate())
    }
}

/// Standalone declaration file on disk
#[derive(Debug, Clone, Copy)]
pub struct DeclarationFile<'a> {
    path: &'a Path,
}

impl<'a> DeclarationFile<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }
}

impl PermissionSource for DeclarationFile<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::DeclarationFile
    }

    fn load(&self, _app_name: &str) -> Option<Result<PermissionModel, Rejection>> {
        let result = DesktopEntry::load(self.path)
            .map_err(Rejection::empty)
            .and_then(|entry| model_from_entry(&entry));
        Some(result)
    }
}

/// Declaration embedded in the bundle, already parsed by the caller
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedDeclaration<'a> {
    entry: &'a DesktopEntry,
}

impl<'a> EmbeddedDeclaration<'a> {
    pub fn new(entry: &'a DesktopEntry) -> Self {
        Self { entry }
    }
}

impl PermissionSource for EmbeddedDeclaration<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::Embedded
    }

    fn load(&self, _app_name: &str) -> Option<Result<PermissionModel, Rejection>> {
        Some(model_from_entry(self.entry))
    }
}
