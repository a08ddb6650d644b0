//! Go syntax analysis using tree-sitter.
//!
//! Parses Go source and lowers the concrete syntax tree into the
//! declaration tree of [`crate::analysis::facts`]:
//! - Function declarations (including methods with receivers)
//! - Type declarations (struct, interface, everything else)
//! - Var and const declarations
//! - Imports
//! - Declarations nested in function bodies

use std::path::Path;

use once_cell::sync::Lazy;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    Decl, DeclCategory, FunctionDecl, Ident, ImportDecl, InterfaceDecl, InterfaceMember,
    OtherDecl, ReceiverType, SourceFile, Span, StructDecl,
};

/// File extension of Go source files (without dot).
pub const GO_EXTENSION: &str = "go";

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

static GO_LANGUAGE: Lazy<Language> = Lazy::new(|| tree_sitter_go::LANGUAGE.into());

/// Holds a parsed tree-sitter tree and associated metadata.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// Source bytes the tree was parsed from.
    pub source: Vec<u8>,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// First structural error found in a parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

/// Go language analyzer.
#[derive(Clone)]
pub struct GoAnalyzer {
    language: Language,
}

impl GoAnalyzer {
    /// Create a new Go analyzer.
    pub fn new() -> Self {
        Self {
            language: GO_LANGUAGE.clone(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Syntax errors still produce a tree with ERROR nodes; see
    /// [`GoAnalyzer::first_syntax_error`].
    pub fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Go source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
        })
    }

    /// Extract the package name from a parsed file.
    pub fn package_name(&self, parsed: &ParsedFile) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }

    /// Locate the first ERROR or MISSING node in source order.
    pub fn first_syntax_error(&self, parsed: &ParsedFile) -> Option<SyntaxError> {
        let root = parsed.tree.root_node();
        if !root.has_error() {
            return None;
        }
        find_error(parsed, root).or_else(|| {
            Some(SyntaxError {
                span: Span::from_node(root),
                message: "syntax error".to_string(),
            })
        })
    }

    /// Lower a parsed file into its declaration tree.
    ///
    /// The grammar accepts more than Go does at the top level, so the file
    /// layout is checked here: one leading `package` clause, then imports,
    /// then declarations only.
    pub fn lower(&self, parsed: &ParsedFile) -> Result<SourceFile, SyntaxError> {
        let root = parsed.tree.root_node();
        let children: Vec<Node> = root
            .named_children(&mut root.walk())
            .filter(|n| n.kind() != "comment")
            .collect();
        let mut children = children.into_iter();

        let package = match children.next() {
            Some(clause) if clause.kind() == "package_clause" => clause
                .named_children(&mut clause.walk())
                .find(|n| n.kind() == "package_identifier")
                .map(|n| ident(parsed, n))
                .ok_or_else(|| syntax_error(clause, "expected 'package'"))?,
            Some(other) => return Err(syntax_error(other, "expected 'package'")),
            None => return Err(syntax_error(root, "expected 'package'")),
        };

        let mut decls = Vec::new();
        let mut past_imports = false;
        for child in children {
            match child.kind() {
                "import_declaration" if past_imports => {
                    return Err(syntax_error(
                        child,
                        "syntax error: imports must appear before other declarations",
                    ));
                }
                "import_declaration" => lower_declaration(parsed, child, &mut decls),
                "function_declaration" | "method_declaration" => {
                    past_imports = true;
                    if let Some(func) = lower_function(parsed, child) {
                        decls.push(Decl::Function(func));
                    }
                }
                "type_declaration" | "var_declaration" | "const_declaration" => {
                    past_imports = true;
                    lower_declaration(parsed, child, &mut decls);
                }
                "package_clause" => {
                    return Err(syntax_error(
                        child,
                        "syntax error: package statement must be first",
                    ));
                }
                _ => {
                    return Err(syntax_error(
                        child,
                        "syntax error: non-declaration statement outside function body",
                    ));
                }
            }
        }

        Ok(SourceFile { package, decls })
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn syntax_error(node: Node, message: &str) -> SyntaxError {
    SyntaxError {
        span: Span::from_node(node),
        message: message.to_string(),
    }
}

fn ident(parsed: &ParsedFile, node: Node) -> Ident {
    Ident {
        name: parsed.node_text(node).to_string(),
        span: Span::from_node(node),
    }
}

fn find_error(parsed: &ParsedFile, node: Node) -> Option<SyntaxError> {
    if node.is_missing() {
        return Some(SyntaxError {
            span: Span::from_node(node),
            message: format!("syntax error: missing {:?}", node.kind()),
        });
    }
    if node.is_error() {
        let text = parsed.node_text(node);
        let snippet: String = text.lines().next().unwrap_or("").chars().take(24).collect();
        return Some(SyntaxError {
            span: Span::from_node(node),
            message: format!("syntax error: unexpected {:?}", snippet.trim()),
        });
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(|child| find_error(parsed, child));
    found
}

/// Lower a `function_declaration` or `method_declaration`.
fn lower_function(parsed: &ParsedFile, node: Node) -> Option<FunctionDecl> {
    let name = node.child_by_field_name("name")?;
    let receiver = node
        .child_by_field_name("receiver")
        .map(|params| receiver_types(parsed, params));

    let mut locals = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_locals(parsed, body, &mut locals);
    }

    Some(FunctionDecl {
        name: ident(parsed, name),
        span: Span::from_node(node),
        receiver,
        locals,
    })
}

fn receiver_types(parsed: &ParsedFile, params: Node) -> Vec<ReceiverType> {
    params
        .named_children(&mut params.walk())
        .filter(|p| {
            matches!(
                p.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .filter_map(|p| p.child_by_field_name("type"))
        .map(|ty| receiver_type(parsed, ty))
        .collect()
}

fn receiver_type(parsed: &ParsedFile, ty: Node) -> ReceiverType {
    match ty.kind() {
        "type_identifier" => ReceiverType::Named(parsed.node_text(ty).to_string()),
        "pointer_type" => match ty.named_child(0) {
            Some(inner) if inner.kind() == "type_identifier" => {
                ReceiverType::Named(parsed.node_text(inner).to_string())
            }
            _ => ReceiverType::Complex(parsed.node_text(ty).to_string()),
        },
        _ => ReceiverType::Complex(parsed.node_text(ty).to_string()),
    }
}

/// Collect `type`, `var` and `const` declarations nested anywhere below
/// `node`, in depth-first order.
///
/// Declarations found inside a nested `var` initializer are attached to
/// that var rather than collected here.
fn collect_locals(parsed: &ParsedFile, node: Node, out: &mut Vec<Decl>) {
    for child in node.named_children(&mut node.walk()) {
        if matches!(
            child.kind(),
            "type_declaration" | "var_declaration" | "const_declaration"
        ) {
            lower_declaration(parsed, child, out);
        } else {
            collect_locals(parsed, child, out);
        }
    }
}

/// Lower a non-function declaration node; other node kinds are ignored.
fn lower_declaration(parsed: &ParsedFile, node: Node, out: &mut Vec<Decl>) {
    match node.kind() {
        "import_declaration" => {
            for spec in specs(node, &["import_spec"]) {
                if let Some(import) = lower_import(parsed, spec) {
                    out.push(Decl::Import(import));
                }
            }
        }
        "type_declaration" => {
            for spec in specs(node, &["type_spec", "type_alias"]) {
                if let Some(decl) = lower_type_spec(parsed, spec) {
                    out.push(decl);
                }
            }
        }
        "var_declaration" => lower_value_specs(parsed, node, "var_spec", DeclCategory::Var, out),
        "const_declaration" => {
            lower_value_specs(parsed, node, "const_spec", DeclCategory::Const, out)
        }
        _ => {}
    }
}

/// Spec nodes of the given kinds directly below a declaration or inside its
/// parenthesized `*_spec_list`, in source order.
fn specs<'a>(node: Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    for child in node.named_children(&mut node.walk()) {
        if kinds.contains(&child.kind()) {
            found.push(child);
        } else if child.kind().ends_with("_spec_list") {
            found.extend(specs(child, kinds));
        }
    }
    found
}

fn lower_import(parsed: &ParsedFile, spec: Node) -> Option<ImportDecl> {
    let path = spec.child_by_field_name("path")?;
    Some(ImportDecl {
        path: unquote(parsed.node_text(path)),
    })
}

/// Strip the quotes of an interpreted or raw string literal.
fn unquote(literal: &str) -> String {
    let trimmed = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')));
    trimmed.unwrap_or(literal).to_string()
}

fn lower_type_spec(parsed: &ParsedFile, spec: Node) -> Option<Decl> {
    let name = ident(parsed, spec.child_by_field_name("name")?);
    let body = spec.child_by_field_name("type");

    let decl = match body.map(|b| b.kind()) {
        Some("struct_type") => Decl::Struct(StructDecl { name }),
        Some("interface_type") => Decl::Interface(InterfaceDecl {
            name,
            members: body.map(|b| interface_members(parsed, b)).unwrap_or_default(),
        }),
        _ => Decl::Other(OtherDecl {
            name,
            category: DeclCategory::TypeAlias,
            locals: Vec::new(),
        }),
    };
    Some(decl)
}

fn interface_members(parsed: &ParsedFile, body: Node) -> Vec<InterfaceMember> {
    body.named_children(&mut body.walk())
        .filter(|n| n.kind() != "comment")
        .map(|member| match member.kind() {
            "method_elem" | "method_spec" => match member.child_by_field_name("name") {
                Some(name) => InterfaceMember::Method(ident(parsed, name)),
                None => InterfaceMember::Embedded(parsed.node_text(member).to_string()),
            },
            _ => InterfaceMember::Embedded(parsed.node_text(member).to_string()),
        })
        .collect()
}

fn lower_value_specs(
    parsed: &ParsedFile,
    node: Node,
    spec_kind: &str,
    category: DeclCategory,
    out: &mut Vec<Decl>,
) {
    for spec in specs(node, &[spec_kind]) {
        let mut cursor = spec.walk();
        let mut names: Vec<OtherDecl> = spec
            .children_by_field_name("name", &mut cursor)
            .map(|name| OtherDecl {
                name: ident(parsed, name),
                category,
                locals: Vec::new(),
            })
            .collect();

        if let (Some(value), Some(last)) = (spec.child_by_field_name("value"), names.last_mut()) {
            collect_locals(parsed, value, &mut last.locals);
        }
        out.extend(names.into_iter().map(Decl::Other));
    }
}
