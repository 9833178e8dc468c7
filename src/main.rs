/*!
 * sandbox-plan
 *
 * Resolves the permission policy for an application and prints:
 * - the compiled directive list (text or JSON)
 * - or the complete launcher command line
 */

use anyhow::{bail, Context, Result};
use bundle_sandbox::{
    init_tracing, DesktopEntry, DirectiveCompiler, LaunchId, LaunchPlan, LaunchSpan,
    LauncherLocator, PermissionResolver, PolicyError, ResolveRequest, SandboxContext,
    SystemLauncher,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One directive per line
    Text,
    /// Resolution and directives as JSON
    Json,
    /// Full launcher command line
    Argv,
}

/// Compile the sandbox policy for an application bundle
#[derive(Parser, Debug)]
#[command(name = "sandbox-plan", author, version, about)]
struct Cli {
    /// Application name (case-insensitive for curated profiles)
    app_name: String,

    /// Standalone permission declaration file
    #[arg(long, value_name = "FILE")]
    declaration: Option<PathBuf>,

    /// Desktop entry embedded in the bundle
    #[arg(long, value_name = "FILE")]
    embedded: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Program to run inside the sandbox (required for argv output)
    #[arg(long, value_name = "PATH")]
    entrypoint: Option<PathBuf>,

    /// Host directory mounted as the sandbox home
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Host directory mounted as /tmp
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Fail unless the launcher is installed
    #[arg(long, default_value_t = false)]
    check_launcher: bool,

    /// Arguments passed to the entrypoint
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    app: &'a str,
    resolution: &'a bundle_sandbox::Resolution,
    directives: &'a [bundle_sandbox::SandboxDirective],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let launch_id = LaunchId::new();
    let launch = LaunchSpan::new(&cli.app_name, launch_id);
    let _entered = launch.enter();

    let launcher = SystemLauncher::from_env();
    if cli.check_launcher {
        let path = launcher.locate().context("launcher check failed")?;
        info!(launcher = %path.display(), "launcher available");
    }

    let embedded = cli
        .embedded
        .as_deref()
        .map(DesktopEntry::load)
        .transpose()
        .context("failed to read embedded desktop entry")?;

    let mut request = ResolveRequest::new(&cli.app_name);
    if let Some(path) = cli.declaration.as_deref() {
        request = request.with_declaration_file(path);
    }
    if let Some(entry) = embedded.as_ref() {
        request = request.with_embedded(entry);
    }

    let resolution = PermissionResolver::new()
        .resolve(&request)
        .map_err(PolicyError::from)
        .with_context(|| format!("no usable permission policy for {}", cli.app_name))?;

    let ctx = SandboxContext::capture();
    let directives = DirectiveCompiler::new(&ctx)
        .compile(&resolution.model)
        .context("failed to compile sandbox policy")?;

    match cli.format {
        Format::Text => {
            for directive in &directives {
                println!("{directive}");
            }
        }
        Format::Json => {
            let report = Report {
                app: &cli.app_name,
                resolution: &resolution,
                directives: &directives,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Argv => {
            let Some(entrypoint) = cli.entrypoint else {
                bail!("--entrypoint is required for argv output");
            };
            let data_dir = match cli.data_dir {
                Some(dir) => dir,
                None => dirs::data_dir()
                    .context("no data directory for this user, pass --data-dir")?
                    .join("bundle-sandbox")
                    .join(cli.app_name.to_lowercase()),
            };
            let mut plan =
                LaunchPlan::for_launch(launch_id, data_dir, entrypoint).with_args(cli.args);
            if let Some(temp_dir) = cli.temp_dir {
                plan = plan.with_temp_dir(temp_dir);
            }
            let cmd = plan.command(&launcher, &ctx, &directives)?;
            let line: Vec<String> = std::iter::once(cmd.get_program())
                .chain(cmd.get_args())
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            println!("{}", line.join(" "));
        }
    }
    Ok(())
}
