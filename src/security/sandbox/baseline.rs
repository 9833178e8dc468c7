/*!
 * Baseline Policy
 * Directives emitted for every launch, plus the level-dependent ambient grants
 */

use super::config::SandboxContext;
use super::path::{XdgDir, XdgDirs};
use crate::permissions::types::PermissionModel;
use crate::security::traits::DirectiveStage;
use crate::security::types::{Namespace, SandboxDirective};
use std::path::Path;

/// Executable and library paths every application needs
const REQUIRED_RO: &[&str] = &["/opt", "/bin", "/lib"];
const OPTIONAL_RO: &[&str] = &["/lib32", "/lib64"];
const REQUIRED_USR_RO: &[&str] = &["/usr/bin", "/usr/lib"];
const OPTIONAL_USR_RO: &[&str] = &[
    "/usr/lib32",
    "/usr/lib64",
    "/usr/share/fonts",
    "/usr/share/icons",
    "/usr/share/themes",
];

/// Level 2 system configuration
const LEVEL2_SYSTEM_RO: &[&str] = &[
    "/etc/fonts",
    "/etc/ssl",
    "/usr/share/fontconfig",
    "/usr/share/applications",
    "/usr/share/mime",
    "/usr/share/libdrm",
    "/usr/share/glvnd",
    "/usr/share/glib-2.0",
];

/// Directives independent of level and grants
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalBaseline;

impl DirectiveStage for UniversalBaseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn emit(&self, _model: &PermissionModel, ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        let identity = &ctx.identity;

        out.push(SandboxDirective::setenv("TMPDIR", "/tmp"));
        out.push(SandboxDirective::setenv_path("HOME", &identity.home));
        let synthetic = XdgDirs::from_home(&identity.home);
        for dir in XdgDir::ALL {
            if let Some(var) = dir.env_var() {
                out.push(SandboxDirective::setenv_path(var, synthetic.get(dir)));
            }
        }
        out.push(SandboxDirective::setenv("LOGNAME", identity.user.as_str()));
        out.push(SandboxDirective::setenv("USER", identity.user.as_str()));

        out.push(SandboxDirective::Uid { uid: identity.uid });
        out.push(SandboxDirective::unshare(Namespace::Pid));
        out.push(SandboxDirective::unshare(Namespace::User));
        out.push(SandboxDirective::DieWithParent);
        out.push(SandboxDirective::NewSession);
        out.push(SandboxDirective::Dev { dest: "/dev".into() });
        out.push(SandboxDirective::Proc {
            dest: "/proc".into(),
        });

        out.extend(REQUIRED_RO.iter().map(|p| SandboxDirective::ro_same(p)));
        out.extend(OPTIONAL_RO.iter().map(|p| SandboxDirective::ro_same_try(p)));
        out.extend(REQUIRED_USR_RO.iter().map(|p| SandboxDirective::ro_same(p)));
        out.extend(OPTIONAL_USR_RO.iter().map(|p| SandboxDirective::ro_same_try(p)));
    }
}

/// Ambient grants selected by the trust level.
///
/// Levels 0 and 3 add nothing beyond the universal baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelBaseline;

impl LevelBaseline {
    fn level1(ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        out.push(SandboxDirective::dev_bind(false, "/dev", "/dev"));
        out.push(SandboxDirective::ro_same("/sys"));
        out.push(SandboxDirective::ro_same("/usr"));
        out.push(SandboxDirective::ro_same_try("/etc"));
        user_fonts(ctx, out);
        let (real_config, home) = (ctx.host.xdg.get(XdgDir::Config), ctx.synthetic_home());
        for file in ["gtk-3.0/gtk.css", "gtk-3.0/settings.ini"] {
            out.push(SandboxDirective::ro_bind_try(
                real_config.join(file),
                home.join(".config").join(file),
            ));
        }
    }

    fn level2(ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        out.extend(LEVEL2_SYSTEM_RO.iter().map(|p| SandboxDirective::ro_same_try(p)));
        user_fonts(ctx, out);
        out.push(SandboxDirective::ro_bind_try(
            ctx.host.xdg.get(XdgDir::Config).join("gtk-3.0"),
            ctx.synthetic_home().join(".config/gtk-3.0"),
        ));
    }
}

/// The user's font directories, bound read-only into the synthetic home
fn user_fonts(ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
    let home: &Path = ctx.synthetic_home();
    out.push(SandboxDirective::ro_bind_try(
        ctx.real_home().join(".fonts"),
        home.join(".fonts"),
    ));
    out.push(SandboxDirective::ro_bind_try(
        ctx.host.xdg.get(XdgDir::Config).join("fontconfig"),
        home.join(".config/fontconfig"),
    ));
}

impl DirectiveStage for LevelBaseline {
    fn name(&self) -> &'static str {
        "level"
    }

    fn emit(&self, model: &PermissionModel, ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        match model.level.get() {
            Some(1) => Self::level1(ctx, out),
            Some(2) => Self::level2(ctx, out),
            _ => {}
        }
    }
}
