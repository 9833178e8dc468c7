/*!
 * Permission Resolver Tests
 * Source precedence, declaration parsing and rejection handling
 */

use bundle_sandbox::permissions::SourceKind;
use bundle_sandbox::{
    DesktopEntry, PermissionResolver, PolicyError, ResolveRequest, TrustLevel,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn declaration(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[Desktop Entry]\nName=Demo\n\n[Required Permissions]\n{body}").unwrap();
    file
}

#[test]
fn test_declaration_file_resolves() {
    let file = declaration("Level=1\nFiles=xdg-documents;/srv/shared:rw\nSockets=pulseaudio\n");
    let request = ResolveRequest::new("demo-app").with_declaration_file(file.path());
    let resolution = PermissionResolver::new().resolve(&request).unwrap();

    assert_eq!(resolution.source, SourceKind::DeclarationFile);
    assert_eq!(resolution.model.level, TrustLevel::new(1).unwrap());
    let files: Vec<String> = resolution.model.files.iter().map(|f| f.to_string()).collect();
    assert_eq!(files, vec!["xdg-documents:ro", "/srv/shared:rw"]);
    assert!(resolution.model.sockets.contains("pulseaudio"));
}

#[test]
fn test_curated_short_circuits_declarations() {
    let file = declaration("Level=0\nFiles=/:rw\nShare=ipc\n");
    let embedded = DesktopEntry::parse("[Required Permissions]\nLevel=3\nDevices=mem\n").unwrap();
    let request = ResolveRequest::new("Krita")
        .with_declaration_file(file.path())
        .with_embedded(&embedded);
    let resolution = PermissionResolver::new().resolve(&request).unwrap();

    assert_eq!(resolution.source, SourceKind::Curated);
    assert_eq!(resolution.model.level, TrustLevel::new(2).unwrap());
    assert!(resolution.model.files.iter().all(|f| f.target() != "/"));
    assert!(!resolution.model.devices.contains("mem"));
}

#[test]
fn test_missing_declaration_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.desktop");
    let request = ResolveRequest::new("demo-app").with_declaration_file(&missing);
    let rejection = PermissionResolver::new().resolve(&request).unwrap_err();

    assert!(matches!(rejection.error, PolicyError::SourceNotFound(_)));
    assert!(!rejection.model.level.is_valid());
}

#[test]
fn test_declaration_file_takes_precedence_over_embedded() {
    let file = declaration("Level=2\nDevices=dri\n");
    let embedded = DesktopEntry::parse("[Required Permissions]\nLevel=1\nSockets=x11\n").unwrap();
    let request = ResolveRequest::new("demo-app")
        .with_declaration_file(file.path())
        .with_embedded(&embedded);
    let resolution = PermissionResolver::new().resolve(&request).unwrap();

    assert_eq!(resolution.source, SourceKind::DeclarationFile);
    assert!(resolution.model.sockets.is_empty());
}

#[test]
fn test_embedded_only() {
    let embedded = DesktopEntry::parse(
        "[Desktop Entry]\nExec=demo\n[Required Permissions]\nLevel=3\nShare=network\n",
    )
    .unwrap();
    let request = ResolveRequest::new("demo-app").with_embedded(&embedded);
    let resolution = PermissionResolver::new().resolve(&request).unwrap();
    assert_eq!(resolution.source, SourceKind::Embedded);
    assert!(resolution.model.share.contains("network"));
}

#[test]
fn test_empty_grants_reported_before_bad_level() {
    let file = declaration("Level=9\n");
    let request = ResolveRequest::new("demo-app").with_declaration_file(file.path());
    let rejection = PermissionResolver::new().resolve(&request).unwrap_err();
    assert_eq!(rejection.error, PolicyError::EmptyGrantSet);
    assert_eq!(rejection.model.level, TrustLevel::INVALID);
}

#[test]
fn test_bad_level_keeps_grants_for_inspection() {
    let file = declaration("Level=abc\nDevices=dri\n");
    let request = ResolveRequest::new("demo-app").with_declaration_file(file.path());
    let rejection = PermissionResolver::new().resolve(&request).unwrap_err();
    assert!(matches!(rejection.error, PolicyError::InvalidLevel { .. }));
    assert_eq!(rejection.model.level, TrustLevel::INVALID);
    assert!(rejection.model.devices.contains("dri"));
}

#[test]
fn test_semicolons_survive_in_values() {
    let file = declaration("Level=2\nFiles=/data/a\\;b:rw;/data/c\n");
    let request = ResolveRequest::new("demo-app").with_declaration_file(file.path());
    let model = PermissionResolver::new().resolve(&request).unwrap().model;
    let targets: Vec<&str> = model.files.iter().map(|f| f.target()).collect();
    assert_eq!(targets, vec!["/data/a;b", "/data/c"]);
}

#[test]
fn test_malformed_declaration() {
    let file = declaration("Level=2\nthis line has no separator\n");
    let request = ResolveRequest::new("demo-app").with_declaration_file(file.path());
    let rejection = PermissionResolver::new().resolve(&request).unwrap_err();
    assert!(matches!(rejection.error, PolicyError::ParseFailure { line: 6, .. }));
}

#[test]
fn test_no_source() {
    let request = ResolveRequest::new("demo-app");
    let rejection = PermissionResolver::new().resolve(&request).unwrap_err();
    assert!(matches!(rejection.error, PolicyError::SourceNotFound(_)));
}
