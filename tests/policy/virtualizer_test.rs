/*!
 * Path Virtualizer Tests
 * Symbolic tokens, literal anonymization and mode handling
 */

use crate::common::host;
use bundle_sandbox::permissions::AccessMode;
use bundle_sandbox::security::sandbox::{PathToken, PathVirtualizer, XdgDir, XdgDirs};
use bundle_sandbox::FileGrant;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

#[test]
fn test_documents_subpath_rw() {
    let host = host();
    let virtualizer = PathVirtualizer::new(&host.xdg, Path::new("/home/ai"));
    let resolved = virtualizer.resolve(&FileGrant::parse("xdg-documents/reports:rw"));

    assert_eq!(resolved.source, PathBuf::from("/home/alice/Dokumente/reports"));
    assert_eq!(resolved.dest, PathBuf::from("/home/ai/Documents/reports"));
    assert_eq!(resolved.mode, AccessMode::ReadWrite);
}

#[test]
fn test_every_token_maps_under_synthetic_home() {
    let real = XdgDirs::from_home(Path::new("/home/alice"));
    let virtualizer = PathVirtualizer::new(&real, Path::new("/home/ai"));
    for dir in XdgDir::ALL {
        let resolved = virtualizer.resolve(&FileGrant::parse(dir.token()));
        assert!(resolved.dest.starts_with("/home/ai"), "{}", dir.token());
        assert!(resolved.source.starts_with("/home/alice"), "{}", dir.token());
    }
}

#[test]
fn test_literal_paths() {
    let host = host();
    let virtualizer = PathVirtualizer::new(&host.xdg, Path::new("/home/ai"));
    let grants = [
        FileGrant::parse("/home/alice/projects/app:rw"),
        FileGrant::parse("/home/alice"),
        FileGrant::parse("/home/alicex/notes"),
        FileGrant::parse("/mnt/media"),
    ];
    let dests: Vec<PathBuf> = virtualizer
        .resolve_all(&grants)
        .into_iter()
        .map(|v| v.dest)
        .collect();
    assert_eq!(
        dests,
        vec![
            PathBuf::from("/home/ai/projects/app"),
            PathBuf::from("/home/ai"),
            PathBuf::from("/home/alicex/notes"),
            PathBuf::from("/mnt/media"),
        ]
    );
}

#[test]
fn test_root_home_is_not_rewritten() {
    let real = XdgDirs::from_home(Path::new("/"));
    let virtualizer = PathVirtualizer::new(&real, Path::new("/home/ai"));
    let resolved = virtualizer.resolve(&FileGrant::parse("/etc/hosts"));
    assert_eq!(resolved.dest, PathBuf::from("/etc/hosts"));
}

#[test]
fn test_non_mode_colon_is_part_of_path() {
    let grant = FileGrant::parse("/data/archive:2024");
    assert_eq!(grant.target(), "/data/archive:2024");
    assert_eq!(grant.to_string(), "/data/archive:2024:ro");
    assert!(matches!(
        PathToken::classify(&grant),
        PathToken::Literal { path: "/data/archive:2024", mode: AccessMode::ReadOnly }
    ));
}

#[test]
fn test_parent_components_never_stay_in_synthetic_home() {
    let host = host();
    let virtualizer = PathVirtualizer::new(&host.xdg, Path::new("/home/ai"));
    let grants = [
        FileGrant::parse("/home/alice/../bob/.ssh:rw"),
        FileGrant::parse("xdg-documents/../../bob/.gnupg"),
    ];
    for resolved in virtualizer.resolve_all(&grants) {
        assert!(
            !resolved.dest.components().any(|c| c.as_os_str() == ".."),
            "{}",
            resolved.dest.display()
        );
        assert!(!resolved.dest.starts_with("/home/ai"), "{}", resolved.dest.display());
    }
    let first = virtualizer.resolve(&grants[0]);
    assert_eq!(first.source, PathBuf::from("/home/alice/../bob/.ssh"));
    assert_eq!(first.dest, PathBuf::from("/home/bob/.ssh"));
}
