//! Command-line interface for gonav.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::{self, WorkspaceConfig};
use crate::report;
use crate::server;
use crate::workspace::{NavRequest, WorkspaceResolver};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural navigator for Go workspaces.
///
/// Lists the folders, packages and programs of a workspace, the
/// declarations of a Go source file, or the methods bound to a type.
#[derive(Parser)]
#[command(name = "gonav")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a directory or the declarations of a Go file
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Serve the navigator over HTTP
    Serve(ServeArgs),
}

/// Arguments for the list command.
#[derive(Parser)]
pub struct ListArgs {
    /// Path relative to the workspace root (default: the root itself)
    pub target: Option<String>,

    /// Receiver type whose methods should be listed
    #[arg(short, long)]
    pub name: Option<String>,

    /// Workspace root (default: $GOPATH/src, then $HOME/go/src)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output format: json or pretty
    #[arg(short, long, default_value = "json")]
    pub format: String,
}

/// Arguments for the serve command.
#[derive(Parser)]
pub struct ServeArgs {
    /// Listen address (default: $GONAV_ADDR, then 127.0.0.1:8080)
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Workspace root (default: $GOPATH/src, then $HOME/go/src)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

/// Run the list command.
pub fn run_list(args: &ListArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "json" && args.format != "pretty" {
        eprintln!(
            "Error: invalid format {:?}, must be 'json' or 'pretty'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match WorkspaceConfig::resolve(args.root.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let resolver = WorkspaceResolver::new(config.root);
    let request = NavRequest::new(args.target.clone(), args.name.clone());
    debug!(?request, root = %resolver.root().display(), "list");

    let nodes = match resolver.resolve(&request) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let stdout = io::stdout().lock();
    match args.format.as_str() {
        "pretty" => {
            let target = request.target.as_deref().unwrap_or(".");
            report::write_pretty(stdout, target, &nodes)?;
        }
        _ => report::write_json(stdout, &nodes)?,
    }

    Ok(EXIT_SUCCESS)
}

/// Run the serve command.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<i32> {
    let config = match WorkspaceConfig::resolve(args.root.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let addr = config::server_addr(args.addr.as_deref());
    let resolver = Arc::new(WorkspaceResolver::new(config.root));

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(server::serve(&addr, resolver)) {
        eprintln!("Error: {:#}", e);
        return Ok(EXIT_ERROR);
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::parse_from(["gonav", "ls", "app/main.go", "--name", "Server", "-f", "pretty"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.target.as_deref(), Some("app/main.go"));
                assert_eq!(args.name.as_deref(), Some("Server"));
                assert_eq!(args.format, "pretty");
                assert!(args.root.is_none());
            }
            Commands::Serve(_) => panic!("expected list"),
        }
    }

    #[test]
    fn test_invalid_format_is_an_error_exit() {
        let args = ListArgs {
            target: None,
            name: None,
            root: None,
            format: "xml".to_string(),
        };
        assert_eq!(run_list(&args).unwrap(), EXIT_ERROR);
    }
}
