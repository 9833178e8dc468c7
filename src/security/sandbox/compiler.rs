/*!
 * Directive Compiler
 * Turns a validated permission model into an ordered launcher directive list
 */

use super::baseline::{LevelBaseline, UniversalBaseline};
use super::config::SandboxContext;
use super::grants::{DeviceStage, FileStage};
use super::namespace::NamespaceStage;
use super::socket::SocketStage;
use crate::core::errors::{PolicyError, PolicyResult};
use crate::monitoring::CompileSpan;
use crate::permissions::types::PermissionModel;
use crate::security::traits::DirectiveStage;
use crate::security::types::SandboxDirective;
use tracing::{debug, info};

/// Stages in emission order. Later binds override earlier ones, so grants
/// come after the ambient baselines.
const STAGES: &[&dyn DirectiveStage] = &[
    &UniversalBaseline,
    &LevelBaseline,
    &DeviceStage,
    &FileStage,
    &SocketStage,
    &NamespaceStage,
];

/// Compiles permission models against one launch context
#[derive(Debug, Clone, Copy)]
pub struct DirectiveCompiler<'a> {
    ctx: &'a SandboxContext,
}

impl<'a> DirectiveCompiler<'a> {
    pub fn new(ctx: &'a SandboxContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SandboxContext {
        self.ctx
    }

    /// Compile `model` into directives.
    ///
    /// Output depends only on the model and the context; a model carrying the
    /// invalid level sentinel is refused.
    pub fn compile(&self, model: &PermissionModel) -> PolicyResult<Vec<SandboxDirective>> {
        let span = CompileSpan::new(model.level);
        let _entered = span.enter();

        if !model.level.is_valid() {
            let err = PolicyError::invalid_level(model.level.to_string());
            span.record_error(&err.to_string());
            return Err(err);
        }

        let mut directives = Vec::new();
        for stage in STAGES {
            let before = directives.len();
            stage.emit(model, self.ctx, &mut directives);
            debug!(stage = stage.name(), emitted = directives.len() - before, "stage complete");
        }

        span.record_directives(directives.len());
        info!(level = %model.level, directives = directives.len(), "sandbox policy compiled");
        Ok(directives)
    }
}
