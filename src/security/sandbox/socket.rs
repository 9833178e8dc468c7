/*!
 * Socket Registry
 * Named display/audio services and the directives that expose them
 */

use super::config::SandboxContext;
use crate::permissions::types::PermissionModel;
use crate::security::traits::DirectiveStage;
use crate::security::types::SandboxDirective;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Services that can be granted through `Sockets`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketService {
    X11,
    PulseAudio,
}

impl SocketService {
    /// Fixed emission order
    pub const ALL: [SocketService; 2] = [SocketService::X11, SocketService::PulseAudio];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SocketService::X11 => "x11",
            SocketService::PulseAudio => "pulseaudio",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Directives exposing this service
    pub fn directives(self, ctx: &SandboxContext) -> Vec<SandboxDirective> {
        match self {
            SocketService::X11 => x11(ctx),
            SocketService::PulseAudio => {
                let dir = format!("/run/user/{}/pulse", ctx.host.uid);
                vec![SandboxDirective::ro_bind_try(&dir, &dir)]
            }
        }
    }
}

fn x11(ctx: &SandboxContext) -> Vec<SandboxDirective> {
    let Some(display) = ctx.host.display_number() else {
        warn!(display = ?ctx.host.display, "x11 granted but no X display is known, skipping");
        return Vec::new();
    };

    let authority = ctx.synthetic_home().join(".Xauthority");
    let socket = PathBuf::from(format!("/tmp/.X11-unix/X{display}"));
    vec![
        SandboxDirective::ro_bind_try(ctx.host.xauthority_path(), &authority),
        SandboxDirective::ro_bind(&socket, &socket),
        SandboxDirective::ro_same_try("/usr/share/X11"),
        SandboxDirective::setenv_path("XAUTHORITY", &authority),
        SandboxDirective::setenv("DISPLAY", format!(":{display}")),
    ]
}

/// Emits registered services present in the grant set
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketStage;

impl DirectiveStage for SocketStage {
    fn name(&self) -> &'static str {
        "sockets"
    }

    fn emit(&self, model: &PermissionModel, ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        for name in &model.sockets {
            if SocketService::from_name(name).is_none() {
                debug!(socket = %name, "unknown socket ignored");
            }
        }
        for service in SocketService::ALL {
            if model.sockets.contains(service.name()) {
                out.extend(service.directives(ctx));
            }
        }
    }
}
