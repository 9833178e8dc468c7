/*!
 * Launcher
 * Locates the namespace launcher and renders a complete launch command
 */

use super::sandbox::config::SandboxContext;
use super::traits::LauncherLocator;
use super::types::{render_args, SandboxDirective};
use crate::core::errors::{PolicyError, PolicyResult};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

/// Launcher program looked up on `PATH` by default
pub const DEFAULT_LAUNCHER: &str = "bwrap";
/// Overrides the launcher program name or path
pub const LAUNCHER_ENV: &str = "SANDBOX_LAUNCHER";

/// Resolves the launcher with `which`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemLauncher {
    program: OsString,
}

impl SystemLauncher {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `SANDBOX_LAUNCHER` if set and non-empty, otherwise `bwrap`
    pub fn from_env() -> Self {
        match std::env::var_os(LAUNCHER_ENV).filter(|v| !v.is_empty()) {
            Some(program) => Self::new(program),
            None => Self::new(DEFAULT_LAUNCHER),
        }
    }

    pub fn program(&self) -> &std::ffi::OsStr {
        &self.program
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_LAUNCHER)
    }
}

impl LauncherLocator for SystemLauncher {
    fn locate(&self) -> PolicyResult<PathBuf> {
        let path = which::which(&self.program).map_err(|e| {
            PolicyError::LauncherUnavailable(format!(
                "{}: {}",
                self.program.to_string_lossy(),
                e
            ))
        })?;
        debug!(launcher = %path.display(), "launcher located");
        Ok(path)
    }
}

/// Unique id of one launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchId(Uuid);

impl LaunchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LaunchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-launch directories and the program to run inside the sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub id: LaunchId,
    /// Host directory mounted as the synthetic home
    pub data_dir: PathBuf,
    /// Host directory mounted as `/tmp`
    pub temp_dir: PathBuf,
    pub entrypoint: PathBuf,
    pub args: Vec<OsString>,
}

impl LaunchPlan {
    /// Plan with a fresh id and a temp dir unique to it
    pub fn new(data_dir: impl Into<PathBuf>, entrypoint: impl Into<PathBuf>) -> Self {
        Self::for_launch(LaunchId::new(), data_dir, entrypoint)
    }

    /// Plan for an id the caller already logs under
    pub fn for_launch(
        id: LaunchId,
        data_dir: impl Into<PathBuf>,
        entrypoint: impl Into<PathBuf>,
    ) -> Self {
        let temp_dir = std::env::temp_dir().join(format!(".sandbox-{id}"));
        Self {
            id,
            data_dir: data_dir.into(),
            temp_dir,
            entrypoint: entrypoint.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Launcher arguments, without the launcher program itself
    pub fn argv(&self, ctx: &SandboxContext, directives: &[SandboxDirective]) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(directives.len() * 3 + self.args.len() + 8);
        SandboxDirective::rw_bind(&self.data_dir, ctx.synthetic_home()).push_args(&mut argv);
        SandboxDirective::rw_bind(&self.temp_dir, Path::new("/tmp")).push_args(&mut argv);
        argv.extend(render_args(directives));
        argv.push("--".into());
        argv.push(self.entrypoint.clone().into_os_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Full command for `launcher`. The launcher is located first; nothing
    /// is rendered if it is missing.
    pub fn command(
        &self,
        launcher: &dyn LauncherLocator,
        ctx: &SandboxContext,
        directives: &[SandboxDirective],
    ) -> PolicyResult<Command> {
        let program = launcher.locate()?;
        let mut cmd = Command::new(&program);
        cmd.args(self.argv(ctx, directives));
        info!(
            launch_id = %self.id,
            launcher = %program.display(),
            entrypoint = %self.entrypoint.display(),
            directives = directives.len(),
            "launch command rendered"
        );
        Ok(cmd)
    }
}
