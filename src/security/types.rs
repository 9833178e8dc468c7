/*!
 * Security Types
 * Launcher directives and namespace categories
 */

use crate::permissions::types::AccessMode;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Namespace categories, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    User,
    Ipc,
    Pid,
    Network,
    Uts,
    Cgroup,
}

impl Namespace {
    /// Fixed emission order
    pub const ALL: [Namespace; 6] = [
        Namespace::User,
        Namespace::Ipc,
        Namespace::Pid,
        Namespace::Network,
        Namespace::Uts,
        Namespace::Cgroup,
    ];

    /// Name used in the `Share` grant list
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Namespace::User => "user",
            Namespace::Ipc => "ipc",
            Namespace::Pid => "pid",
            Namespace::Network => "network",
            Namespace::Uts => "uts",
            Namespace::Cgroup => "cgroup",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.name() == name)
    }

    /// Launcher flag that unshares this namespace
    #[must_use]
    pub fn unshare_flag(self) -> &'static str {
        match self {
            Namespace::User => "--unshare-user-try",
            Namespace::Ipc => "--unshare-ipc",
            Namespace::Pid => "--unshare-pid",
            Namespace::Network => "--unshare-net",
            Namespace::Uts => "--unshare-uts",
            Namespace::Cgroup => "--unshare-cgroup-try",
        }
    }

    /// Isolated by the universal baseline no matter what is shared
    #[must_use]
    pub fn is_mandatory(self) -> bool {
        matches!(self, Namespace::User | Namespace::Pid)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One instruction for the namespace launcher.
///
/// Order matters only through the launcher's last-wins handling of binds
/// onto the same destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "directive")]
pub enum SandboxDirective {
    /// Bind `source` onto `dest`; `optional` binds are skipped when the source is missing
    Bind {
        mode: AccessMode,
        optional: bool,
        source: PathBuf,
        dest: PathBuf,
    },
    /// Expose a device node (or the whole device tree)
    DevBind {
        optional: bool,
        source: PathBuf,
        dest: PathBuf,
    },
    /// Fresh minimal devtmpfs
    Dev { dest: PathBuf },
    /// Fresh procfs
    Proc { dest: PathBuf },
    SetEnv { key: String, value: String },
    Uid { uid: u32 },
    Unshare { namespace: Namespace },
    /// Keep the host network namespace
    ShareNet,
    DieWithParent,
    NewSession,
}

impl SandboxDirective {
    pub fn ro_bind(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::bind(AccessMode::ReadOnly, false, source, dest)
    }

    pub fn ro_bind_try(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::bind(AccessMode::ReadOnly, true, source, dest)
    }

    pub fn rw_bind(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::bind(AccessMode::ReadWrite, false, source, dest)
    }

    pub fn rw_bind_try(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self::bind(AccessMode::ReadWrite, true, source, dest)
    }

    /// Read-only bind of a host path onto the same path
    pub fn ro_same(path: &str) -> Self {
        Self::ro_bind(path, path)
    }

    /// Optional read-only bind of a host path onto the same path
    pub fn ro_same_try(path: &str) -> Self {
        Self::ro_bind_try(path, path)
    }

    pub fn bind(
        mode: AccessMode,
        optional: bool,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        SandboxDirective::Bind {
            mode,
            optional,
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn dev_bind(optional: bool, source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        SandboxDirective::DevBind {
            optional,
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn setenv(key: impl Into<String>, value: impl Into<String>) -> Self {
        SandboxDirective::SetEnv {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn setenv_path(key: impl Into<String>, value: &Path) -> Self {
        Self::setenv(key, value.to_string_lossy())
    }

    pub fn unshare(namespace: Namespace) -> Self {
        SandboxDirective::Unshare { namespace }
    }

    /// Launcher flag for this directive
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            SandboxDirective::Bind { mode, optional, .. } => match (mode, optional) {
                (AccessMode::ReadWrite, false) => "--bind",
                (AccessMode::ReadWrite, true) => "--bind-try",
                (AccessMode::ReadOnly, false) => "--ro-bind",
                (AccessMode::ReadOnly, true) => "--ro-bind-try",
            },
            SandboxDirective::DevBind { optional: false, .. } => "--dev-bind",
            SandboxDirective::DevBind { optional: true, .. } => "--dev-bind-try",
            SandboxDirective::Dev { .. } => "--dev",
            SandboxDirective::Proc { .. } => "--proc",
            SandboxDirective::SetEnv { .. } => "--setenv",
            SandboxDirective::Uid { .. } => "--uid",
            SandboxDirective::Unshare { namespace } => namespace.unshare_flag(),
            SandboxDirective::ShareNet => "--share-net",
            SandboxDirective::DieWithParent => "--die-with-parent",
            SandboxDirective::NewSession => "--new-session",
        }
    }

    /// Append the flag and its operands to a launcher argv
    pub fn push_args(&self, argv: &mut Vec<OsString>) {
        argv.push(self.flag().into());
        match self {
            SandboxDirective::Bind { source, dest, .. }
            | SandboxDirective::DevBind { source, dest, .. } => {
                argv.push(source.clone().into_os_string());
                argv.push(dest.clone().into_os_string());
            }
            SandboxDirective::Dev { dest } | SandboxDirective::Proc { dest } => {
                argv.push(dest.clone().into_os_string());
            }
            SandboxDirective::SetEnv { key, value } => {
                argv.push(key.into());
                argv.push(value.into());
            }
            SandboxDirective::Uid { uid } => argv.push(uid.to_string().into()),
            SandboxDirective::Unshare { .. }
            | SandboxDirective::ShareNet
            | SandboxDirective::DieWithParent
            | SandboxDirective::NewSession => {}
        }
    }

    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(3);
        self.push_args(&mut argv);
        argv
    }
}

impl fmt::Display for SandboxDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let args = self.to_args();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Flatten a directive list into launcher arguments
#[must_use]
pub fn render_args(directives: &[SandboxDirective]) -> Vec<OsString> {
    let mut argv = Vec::with_capacity(directives.len() * 3);
    for directive in directives {
        directive.push_args(&mut argv);
    }
    argv
}
