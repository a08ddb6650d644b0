use std::fs;
use std::path::Path;

use tracing::debug;

use crate::analysis::{extract_symbols, resolve_receivers, GoAnalyzer};
use crate::error::NavError;
use crate::node::{FileContext, Node};

/// Reads, parses and walks one Go source file.
#[derive(Clone, Default)]
pub struct SourceFileAnalyzer {
    analyzer: GoAnalyzer,
}

impl SourceFileAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: GoAnalyzer::new(),
        }
    }

    /// Analyse `path`, a file under `root`.
    ///
    /// Without `receiver` the package scope and imports are listed; with
    /// one, the methods bound to that type. A file that does not parse
    /// cleanly yields no nodes at all.
    pub fn analyze(
        &self,
        root: &Path,
        path: &Path,
        receiver: Option<&str>,
    ) -> Result<Vec<Node>, NavError> {
        let source = fs::read(path).map_err(|source| NavError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |message: String| NavError::ParseError {
            path: path.to_path_buf(),
            message,
        };

        let parsed = self
            .analyzer
            .parse(path, &source)
            .map_err(|e| parse_error(e.to_string()))?;
        if let Some(err) = self.analyzer.first_syntax_error(&parsed) {
            return Err(parse_error(err.to_string()));
        }
        let file = self
            .analyzer
            .lower(&parsed)
            .map_err(|err| parse_error(err.to_string()))?;

        let ctx = FileContext {
            dir: path.to_string_lossy().to_string(),
            loc: relative_loc(root, path),
        };
        debug!(
            file = %ctx.loc,
            package = %file.package.name,
            decls = file.decls.len(),
            "analysing source file"
        );

        Ok(match receiver {
            Some(name) => resolve_receivers(&file, name, &ctx),
            None => extract_symbols(&file, &ctx),
        })
    }
}

/// Path of `path` relative to `root`, or `path` itself when it is not below it.
pub(crate) fn relative_loc(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
