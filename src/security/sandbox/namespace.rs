/*!
 * Namespace Sharing
 * Default-deny namespace isolation driven by the `Share` grants
 */

use super::config::SandboxContext;
use crate::permissions::types::PermissionModel;
use crate::security::traits::DirectiveStage;
use crate::security::types::{Namespace, SandboxDirective};
use tracing::{debug, warn};

/// Resolver configuration bound whenever the network is shared
pub const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Unshares every namespace not listed in `share`
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceStage;

impl DirectiveStage for NamespaceStage {
    fn name(&self) -> &'static str {
        "namespaces"
    }

    fn emit(&self, model: &PermissionModel, _ctx: &SandboxContext, out: &mut Vec<SandboxDirective>) {
        for name in &model.share {
            if Namespace::from_name(name).is_none() {
                debug!(namespace = %name, "unknown namespace in share list ignored");
            }
        }

        for ns in Namespace::ALL {
            let shared = model.share.contains(ns.name());
            match (shared, ns) {
                (true, Namespace::Network) => {
                    out.push(SandboxDirective::ShareNet);
                    out.push(SandboxDirective::ro_same(RESOLV_CONF));
                }
                // Already unshared by the universal baseline
                (true, ns) if ns.is_mandatory() => {
                    warn!(namespace = %ns, "namespace is always isolated, share request ignored");
                }
                (true, _) => {}
                (false, ns) if ns.is_mandatory() => {}
                (false, ns) => out.push(SandboxDirective::unshare(ns)),
            }
        }
    }
}
