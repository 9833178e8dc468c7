/*!
 * Property Tests
 * Invariants of grant normalization, validation and compilation
 */

use crate::common::ctx;
use bundle_sandbox::permissions::AccessMode;
use bundle_sandbox::{
    DirectiveCompiler, FileGrant, Namespace, PermissionModel, PolicyError, SandboxDirective,
    TrustLevel,
};
use proptest::prelude::*;

const CATEGORIES: [&str; 6] = ["user", "ipc", "pid", "network", "uts", "cgroup"];

fn path_strategy() -> impl Strategy<Value = String> {
    "(/[a-z0-9._-]{1,8}){1,4}"
}

fn share_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(CATEGORIES.to_vec(), 0..=CATEGORIES.len())
}

proptest! {
    #[test]
    fn prop_missing_mode_becomes_ro(path in path_strategy()) {
        let grant = FileGrant::parse(&path);
        prop_assert_eq!(grant.mode(), AccessMode::ReadOnly);
        prop_assert!(grant.to_string().ends_with(":ro"));
        prop_assert_eq!(grant.target(), path.as_str());
    }

    #[test]
    fn prop_mode_selects_bind_kind(path in path_strategy(), rw in any::<bool>()) {
        let path = format!("/srv{path}");
        let token = format!("{path}:{}", if rw { "rw" } else { "ro" });
        let model = PermissionModel::new(TrustLevel::new(0).unwrap()).with_files([token]);
        let out = DirectiveCompiler::new(&ctx()).compile(&model).unwrap();
        let expected = if rw {
            SandboxDirective::rw_bind_try(&path, &path)
        } else {
            SandboxDirective::ro_bind_try(&path, &path)
        };
        prop_assert!(out.contains(&expected));
    }

    #[test]
    fn prop_bad_level_is_invalid(raw in "[a-z]{1,4}|-[1-9][0-9]{0,2}|[4-9][0-9]{0,2}") {
        let err = TrustLevel::parse(&raw).unwrap_err();
        let is_invalid_level = matches!(err, PolicyError::InvalidLevel { .. });
        prop_assert!(is_invalid_level);
    }

    #[test]
    fn prop_empty_grants_always_rejected(level in -1i8..=5) {
        let level = TrustLevel::try_from(level).unwrap_or(TrustLevel::INVALID);
        let rejection = PermissionModel::new(level).validate().unwrap_err();
        prop_assert_eq!(rejection.error, PolicyError::EmptyGrantSet);
        prop_assert_eq!(rejection.model.level, TrustLevel::INVALID);
    }

    #[test]
    fn prop_namespace_sharing(share in share_strategy(), level in 0u8..=3) {
        let model = PermissionModel::new(TrustLevel::new(level).unwrap())
            .with_devices(["dri"])
            .with_share(share.iter().copied());
        let out = DirectiveCompiler::new(&ctx()).compile(&model).unwrap();

        for ns in Namespace::ALL {
            let unshares = out
                .iter()
                .filter(|d| **d == SandboxDirective::unshare(ns))
                .count();
            let shared = share.contains(&ns.name());
            if ns.is_mandatory() || !shared {
                prop_assert_eq!(unshares, 1, "{}", ns);
            } else {
                prop_assert_eq!(unshares, 0, "{}", ns);
            }
        }

        let network = share.contains(&"network");
        prop_assert_eq!(out.contains(&SandboxDirective::ShareNet), network);
        prop_assert_eq!(
            out.contains(&SandboxDirective::ro_same("/etc/resolv.conf")),
            network
        );
    }

    #[test]
    fn prop_compile_is_deterministic(
        files in proptest::collection::vec(path_strategy(), 0..4),
        devices in proptest::collection::vec("[a-z]{1,6}[0-9]?", 0..4),
        share in share_strategy(),
        level in 0u8..=3,
    ) {
        let model = PermissionModel::new(TrustLevel::new(level).unwrap())
            .with_files(files)
            .with_devices(devices)
            .with_sockets(["x11", "pulseaudio"])
            .with_share(share);
        let ctx = ctx();
        let compiler = DirectiveCompiler::new(&ctx);
        let first = compiler.compile(&model).unwrap();
        let second = compiler.compile(&model).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            bundle_sandbox::render_args(&first),
            bundle_sandbox::render_args(&second)
        );
    }
}
