/*!
 * Grant Stages
 * Device and file grants rendered as binds
 */

use super::config::SandboxContext;
use super::path::PathVirtualizer;
use crate::permissions::types::{AccessMode, PermissionModel};
use crate::security::traits::DirectiveStage;
use crate::security::types::SandboxDirective;
use std::path::{Component, Path};
use tracing::warn;

/// Device nodes under `/dev`, in sorted order
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStage;

impl DeviceStage {
    /// A device name must name a node strictly below `/dev`
    fn is_contained(name: &str) -> bool {
        let mut components = Path::new(name).components().peekable();
        components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
    }
}

impl DirectiveStage for DeviceStage {
    fn name(&self) -> &'static str {
        "devices"
    }

    fn emit(&self, model: &PermissionModel, _ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        let dev = Path::new("/dev");
        for name in &model.devices {
            if !Self::is_contained(name) {
                warn!(device = %name, "device name escapes /dev, skipping");
                continue;
            }
            let node = dev.join(name);
            out.push(SandboxDirective::dev_bind(true, &node, &node));
        }
    }
}

/// File grants in declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStage;

impl DirectiveStage for FileStage {
    fn name(&self) -> &'static str {
        "files"
    }

    fn emit(&self, model: &PermissionModel, ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        let virtualizer = PathVirtualizer::new(&ctx.host.xdg, ctx.synthetic_home());
        for path in virtualizer.resolve_all(&model.files) {
            out.push(match path.mode {
                AccessMode::ReadWrite => SandboxDirective::rw_bind_try(path.source, path.dest),
                AccessMode::ReadOnly => SandboxDirective::ro_bind_try(path.source, path.dest),
            });
        }
    }
}
