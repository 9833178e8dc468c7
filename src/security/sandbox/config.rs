/*!
 * Sandbox Context
 * Per-launch synthetic identity and the host facts the compiler depends on
 */

use super::path::XdgDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default user name seen inside the sandbox
pub const SYNTHETIC_USER: &str = "ai";
/// Default uid seen inside the sandbox
pub const SYNTHETIC_UID: u32 = 256_000;

/// Identity the sandboxed application observes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxIdentity {
    pub user: String,
    pub uid: u32,
    pub home: PathBuf,
}

impl SandboxIdentity {
    /// Identity with home at `/home/<user>`
    pub fn new(user: impl Into<String>, uid: u32) -> Self {
        let user = user.into();
        let home = PathBuf::from("/home").join(&user);
        Self { user, uid, home }
    }
}

impl Default for SandboxIdentity {
    fn default() -> Self {
        Self::new(SYNTHETIC_USER, SYNTHETIC_UID)
    }
}

/// Read-only facts about the host, captured once per launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Real uid of the invoking user
    pub uid: u32,
    /// Raw `DISPLAY` value
    pub display: Option<String>,
    /// X authority file, if `XAUTHORITY` is set
    pub xauthority: Option<PathBuf>,
    /// The user's real directory layout
    pub xdg: XdgDirs,
}

impl HostSnapshot {
    /// Capture from the current process environment
    pub fn capture() -> Self {
        let snapshot = Self {
            uid: nix::unistd::getuid().as_raw(),
            display: std::env::var("DISPLAY").ok().filter(|d| !d.is_empty()),
            xauthority: std::env::var_os("XAUTHORITY")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            xdg: XdgDirs::capture(),
        };
        debug!(
            uid = snapshot.uid,
            display = ?snapshot.display,
            home = %snapshot.xdg.home().display(),
            "host snapshot captured"
        );
        snapshot
    }

    /// Display number parsed from `DISPLAY` (`:0`, `host:1.0`, `:12`)
    pub fn display_number(&self) -> Option<u32> {
        let display = self.display.as_deref()?;
        let (_, rest) = display.rsplit_once(':')?;
        let number = rest.split('.').next()?;
        number.parse().ok()
    }

    /// Authority file, falling back to `~/.Xauthority`
    pub fn xauthority_path(&self) -> PathBuf {
        self.xauthority
            .clone()
            .unwrap_or_else(|| self.xdg.home().join(".Xauthority"))
    }
}

/// Everything the compiler needs besides the permission model.
///
/// Built once per launch and passed by reference; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxContext {
    pub identity: SandboxIdentity,
    pub host: HostSnapshot,
}

impl SandboxContext {
    pub fn new(identity: SandboxIdentity, host: HostSnapshot) -> Self {
        Self { identity, host }
    }

    /// Default synthetic identity over a freshly captured host
    pub fn capture() -> Self {
        Self::new(SandboxIdentity::default(), HostSnapshot::capture())
    }

    #[inline]
    pub fn synthetic_home(&self) -> &Path {
        &self.identity.home
    }

    #[inline]
    pub fn real_home(&self) -> &Path {
        self.host.xdg.home()
    }
}
