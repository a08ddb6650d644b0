//! gonav - structural navigator for Go workspaces.
//!
//! Given a workspace root and a path below it, gonav produces a flat,
//! ordered list of typed nodes: the folders, packages, programs and source
//! files of a directory, the package-level declarations and imports of a Go
//! file, or the methods bound to a named type. It is the backend of an
//! interactive workspace visualizer.
//!
//! # Architecture
//!
//! - `workspace`: request entry point, sandboxing, directory listing and
//!   package recognition
//! - `analysis`: tree-sitter parsing of Go files and the declaration walks
//! - `node`: the output record shared by every request
//! - `report`: output formatting (JSON, pretty)
//! - `config`: workspace root and listen address resolution
//! - `server`: HTTP transport (`/gopath`)
//! - `cli`: command-line transport

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod node;
pub mod report;
pub mod server;
pub mod workspace;

pub use analysis::{GoAnalyzer, SourceFileAnalyzer};
pub use config::WorkspaceConfig;
pub use error::NavError;
pub use node::{DeclKind, FileContext, Node, NodeType};
pub use workspace::{
    DirectoryLister, GoPackage, NavRequest, PackageResolver, SourcePackageResolver,
    WorkspaceResolver,
};
