/*!
 * Directive Compiler Tests
 * Baselines, grants, sockets and namespace emission against a fixed host
 */

use crate::common::ctx;
use bundle_sandbox::security::sandbox::baseline::UniversalBaseline;
use bundle_sandbox::security::DirectiveStage;
use bundle_sandbox::{
    render_args, DirectiveCompiler, Namespace, PermissionModel, PolicyError, SandboxDirective,
    TrustLevel,
};
use pretty_assertions::assert_eq;

fn level(n: u8) -> PermissionModel {
    PermissionModel::new(TrustLevel::new(n).unwrap())
}

fn compile(model: &PermissionModel) -> Vec<SandboxDirective> {
    let ctx = ctx();
    DirectiveCompiler::new(&ctx).compile(model).unwrap()
}

#[test]
fn test_output_starts_with_universal_baseline() {
    let ctx = ctx();
    let mut baseline = Vec::new();
    for n in 0..=3 {
        let model = level(n).with_devices(["dri"]);
        baseline.clear();
        UniversalBaseline.emit(&model, &ctx, &mut baseline);
        let out = DirectiveCompiler::new(&ctx).compile(&model).unwrap();
        assert_eq!(&out[..baseline.len()], baseline.as_slice(), "level {n}");
    }
}

#[test]
fn test_firefox_like_policy() {
    let model = level(2)
        .with_files(["xdg-download:rw"])
        .with_devices(["dri"])
        .with_sockets(["x11", "pulseaudio"])
        .with_share(["network"]);
    let out = compile(&model);

    assert!(out.contains(&SandboxDirective::rw_bind_try(
        "/home/alice/Downloads",
        "/home/ai/Downloads"
    )));
    assert!(out.contains(&SandboxDirective::ro_bind_try(
        "/run/user/1000/gdm/Xauthority",
        "/home/ai/.Xauthority"
    )));
    assert!(out.contains(&SandboxDirective::ro_bind_try(
        "/run/user/1000/pulse",
        "/run/user/1000/pulse"
    )));
    assert!(out.contains(&SandboxDirective::ShareNet));
    assert!(!out.contains(&SandboxDirective::unshare(Namespace::Network)));
    assert_eq!(out.last(), Some(&SandboxDirective::unshare(Namespace::Cgroup)));
}

#[test]
fn test_rendered_flags() {
    let out = compile(&level(0).with_share(["ipc", "uts", "cgroup", "network"]));
    let args: Vec<String> = render_args(&out)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let joined = args.join(" ");
    assert!(joined.contains("--uid 256000"));
    assert!(joined.contains("--unshare-pid"));
    assert!(joined.contains("--unshare-user-try"));
    assert!(joined.contains("--share-net --ro-bind /etc/resolv.conf /etc/resolv.conf"));
    assert!(!joined.contains("--unshare-ipc"));
    assert!(!joined.contains("--unshare-net"));
}

#[test]
fn test_grants_follow_level_baseline() {
    // Level 1 binds the whole of /dev; an explicit device grant must come later
    let out = compile(&level(1).with_devices(["video0"]));
    let dev = out
        .iter()
        .position(|d| *d == SandboxDirective::dev_bind(false, "/dev", "/dev"))
        .unwrap();
    let video = out
        .iter()
        .position(|d| *d == SandboxDirective::dev_bind(true, "/dev/video0", "/dev/video0"))
        .unwrap();
    assert!(dev < video);
}

#[test]
fn test_rejected_model_cannot_compile() {
    let model = PermissionModel::new(TrustLevel::INVALID).with_sockets(["x11"]);
    let ctx = ctx();
    let err = DirectiveCompiler::new(&ctx).compile(&model).unwrap_err();
    assert_eq!(
        err,
        PolicyError::InvalidLevel {
            value: Some("-1".into())
        }
    );
}

#[test]
fn test_json_serialization() {
    let out = compile(&level(3).with_share(["network"]));
    let json = serde_json::to_value(&out).unwrap();
    let first = &json[0];
    assert_eq!(first["directive"], "set_env");
    assert_eq!(first["key"], "TMPDIR");
}
