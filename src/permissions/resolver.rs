/*!
 * Permission Resolver
 * Picks exactly one permission source per launch, by fixed precedence
 *
 * Precedence, highest first:
 * 1. curated builtin profile (case-insensitive name match)
 * 2. standalone declaration file
 * 3. declaration embedded in the bundle
 */

use super::entry::DesktopEntry;
use super::profiles::ProfileRegistry;
use super::sources::{CuratedSource, DeclarationFile, EmbeddedDeclaration};
use super::traits::{PermissionSource, SourceKind};
use super::types::{PermissionModel, Rejection};
use crate::core::errors::PolicyError;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Inputs for one resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub app_name: &'a str,
    pub declaration_file: Option<&'a Path>,
    pub embedded: Option<&'a DesktopEntry>,
}

impl<'a> ResolveRequest<'a> {
    pub fn new(app_name: &'a str) -> Self {
        Self {
            app_name,
            declaration_file: None,
            embedded: None,
        }
    }

    #[must_use]
    pub fn with_declaration_file(mut self, path: &'a Path) -> Self {
        self.declaration_file = Some(path);
        self
    }

    #[must_use]
    pub fn with_embedded(mut self, entry: &'a DesktopEntry) -> Self {
        self.embedded = Some(entry);
        self
    }
}

/// A model that passed validation, and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub model: PermissionModel,
    pub source: SourceKind,
}

/// Resolves the permission model for an application
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionResolver {
    registry: ProfileRegistry,
}

impl PermissionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: ProfileRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the model for a request.
    ///
    /// The first source with an opinion decides; a rejection from that
    /// source is returned as-is and lower sources are not consulted.
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution, Rejection> {
        let curated = CuratedSource::new(self.registry);
        let file = request.declaration_file.map(DeclarationFile::new);
        let embedded = request.embedded.map(EmbeddedDeclaration::new);

        let mut sources: Vec<&dyn PermissionSource> = vec![&curated];
        if let Some(file) = &file {
            sources.push(file);
        }
        if let Some(embedded) = &embedded {
            sources.push(embedded);
        }

        for source in sources {
            let Some(result) = source.load(request.app_name) else {
                continue;
            };
            return match result {
                Ok(model) => {
                    info!(
                        app = request.app_name,
                        source = %source.kind(),
                        level = %model.level,
                        files = model.files.len(),
                        devices = model.devices.len(),
                        sockets = model.sockets.len(),
                        share = model.share.len(),
                        "permissions resolved"
                    );
                    Ok(Resolution {
                        model,
                        source: source.kind(),
                    })
                }
                Err(rejection) => {
                    warn!(
                        app = request.app_name,
                        source = %source.kind(),
                        error = %rejection.error,
                        kind = rejection.error.kind(),
                        "permissions rejected"
                    );
                    Err(rejection)
                }
            };
        }

        warn!(app = request.app_name, "no permission source available");
        Err(Rejection::empty(PolicyError::SourceNotFound(format!(
            "no permission declaration available for {}",
            request.app_name
        ))))
    }
}
