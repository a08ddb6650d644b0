//! Workspace root and server address resolution.
//!
//! Only the application layer reads the environment; the navigator core is
//! always handed an explicit root.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Environment variable holding the server listen address.
pub const ADDR_ENV: &str = "GONAV_ADDR";

/// Listen address used when neither `--addr` nor `GONAV_ADDR` is set.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Where requests are resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Absolute, canonical workspace root.
    pub root: PathBuf,
}

impl WorkspaceConfig {
    /// Resolve the root from an explicit flag or the Go environment.
    ///
    /// Order: `explicit`, the first entry of `$GOPATH` + `/src`,
    /// `$HOME/go/src`.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = root_candidate(explicit, env::var_os("GOPATH"), env::var_os("HOME"))?;
        let root = candidate
            .canonicalize()
            .with_context(|| format!("workspace root {} is not accessible", candidate.display()))?;
        if !root.is_dir() {
            anyhow::bail!("workspace root {} is not a directory", root.display());
        }
        Ok(Self { root })
    }
}

/// Pick the root without touching the filesystem.
fn root_candidate(
    explicit: Option<&Path>,
    gopath: Option<OsString>,
    home: Option<OsString>,
) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(first) = gopath
        .as_deref()
        .and_then(|list| env::split_paths(list).find(|p| !p.as_os_str().is_empty()))
    {
        return Ok(first.join("src"));
    }
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join("go").join("src")),
        _ => anyhow::bail!("cannot determine workspace root: pass --root or set GOPATH or HOME"),
    }
}

/// Server listen address: `explicit`, else `GONAV_ADDR`, else the default.
pub fn server_addr(explicit: Option<&str>) -> String {
    addr_from(explicit, env::var(ADDR_ENV).ok())
}

fn addr_from(explicit: Option<&str>, from_env: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(from_env.filter(|a| !a.is_empty()))
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}
