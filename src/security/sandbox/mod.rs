/*!
 * Sandbox Policy Compiler
 *
 * Builds launcher directives from a permission model:
 * - Synthetic identity and host snapshot (`config`)
 * - XDG path virtualization (`path`)
 * - Ordered emission stages (`baseline`, `grants`, `socket`, `namespace`)
 */

pub mod baseline;
pub mod compiler;
pub mod config;
pub mod grants;
pub mod namespace;
pub mod path;
pub mod socket;

pub use compiler::DirectiveCompiler;
pub use config::{HostSnapshot, SandboxContext, SandboxIdentity};
pub use path::{PathToken, PathVirtualizer, VirtualPath, XdgDir, XdgDirs};
pub use socket::SocketService;
