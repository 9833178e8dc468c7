/*!
 * Launcher Tests
 * Command rendering and launcher availability
 */

use crate::common::ctx;
use bundle_sandbox::{
    DirectiveCompiler, LaunchId, LaunchPlan, LaunchSpan, LauncherLocator, PermissionModel,
    PolicyError, PolicyResult, SystemLauncher, TrustLevel,
};
use std::ffi::OsStr;
use std::path::PathBuf;

struct NotInstalled;

impl LauncherLocator for NotInstalled {
    fn locate(&self) -> PolicyResult<PathBuf> {
        Err(PolicyError::LauncherUnavailable("bwrap not on PATH".into()))
    }
}

struct Installed;

impl LauncherLocator for Installed {
    fn locate(&self) -> PolicyResult<PathBuf> {
        Ok(PathBuf::from("/usr/bin/bwrap"))
    }
}

fn directives() -> Vec<bundle_sandbox::SandboxDirective> {
    let model = PermissionModel::new(TrustLevel::new(2).unwrap()).with_sockets(["x11"]);
    DirectiveCompiler::new(&ctx()).compile(&model).unwrap()
}

#[test]
fn test_no_command_without_launcher() {
    let plan = LaunchPlan::new("/var/lib/sandbox/demo", "/app/bin/demo");
    let err = plan.command(&NotInstalled, &ctx(), &directives()).unwrap_err();
    assert!(matches!(err, PolicyError::LauncherUnavailable(_)));
}

#[test]
fn test_command_wraps_entrypoint() {
    let plan = LaunchPlan::new("/var/lib/sandbox/demo", "/app/bin/demo")
        .with_temp_dir("/var/tmp/demo")
        .with_args(["--safe-mode", "file.txt"]);
    let cmd = plan.command(&Installed, &ctx(), &directives()).unwrap();

    let args: Vec<&OsStr> = cmd.get_args().collect();
    assert_eq!(&args[..6], ["--bind", "/var/lib/sandbox/demo", "/home/ai", "--bind", "/var/tmp/demo", "/tmp"]);
    let sep = args.iter().position(|a| *a == "--").unwrap();
    assert_eq!(&args[sep + 1..], ["/app/bin/demo", "--safe-mode", "file.txt"]);
}

#[test]
fn test_command_under_launch_span() {
    let id = LaunchId::new();
    let launch = LaunchSpan::new("demo", id);
    let _entered = launch.enter();

    let plan = LaunchPlan::for_launch(id, "/var/lib/sandbox/demo", "/app/bin/demo");
    let cmd = plan.command(&Installed, &ctx(), &directives()).unwrap();
    assert_eq!(plan.id, id);
    let temp = format!("/.sandbox-{id}");
    assert!(cmd
        .get_args()
        .any(|a| a.to_string_lossy().ends_with(&temp)));
}

#[test]
fn test_system_launcher_override() {
    let launcher = SystemLauncher::new("sh");
    assert_eq!(launcher.program(), "sh");
    // sh is present on any host that can run these tests
    let path = launcher.locate().unwrap();
    assert!(path.is_absolute());
}
