//! Declaration tree lowered from a Go syntax tree.

use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            start_byte: node.start_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A declared name and where it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    /// The blank identifier never enters a scope.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// Generic category of a declaration that is neither a function, a struct,
/// an interface nor an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclCategory {
    Var,
    Const,
    /// `type X int`, `type X = Y`, `type X *T`, ...
    TypeAlias,
}

/// Declared type of a receiver parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverType {
    /// `T` or `*T`, by bare type name.
    Named(String),
    /// Anything else (`*List[T]`, `**T`, parenthesized forms), kept as text.
    Complex(String),
}

impl ReceiverType {
    /// Bare type name after dereferencing at most one pointer.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            ReceiverType::Named(name) => Some(name),
            ReceiverType::Complex(_) => None,
        }
    }
}

/// `func` declaration, with or without receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: Ident,
    /// Span of the whole declaration, starting at the `func` keyword.
    pub span: Span,
    /// `None` for plain functions, the receiver list for methods.
    pub receiver: Option<Vec<ReceiverType>>,
    /// Declarations nested in the body, depth-first.
    pub locals: Vec<Decl>,
}

impl FunctionDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Named type whose underlying type is a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Ident,
}

/// Member of an interface's method set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceMember {
    /// Explicitly named method.
    Method(Ident),
    /// Embedded interface or type constraint, kept as text and never expanded.
    Embedded(String),
}

/// Named type whose underlying type is an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub members: Vec<InterfaceMember>,
}

impl InterfaceDecl {
    /// Explicitly named members, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Ident> {
        self.members.iter().filter_map(|m| match m {
            InterfaceMember::Method(ident) => Some(ident),
            InterfaceMember::Embedded(_) => None,
        })
    }
}

/// One import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Unquoted import path.
    pub path: String,
}

/// Var, const, or a named type that is neither struct nor interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDecl {
    pub name: Ident,
    pub category: DeclCategory,
    /// Declarations inside function literals of the initializer, attached to
    /// the last name of their spec.
    pub locals: Vec<Decl>,
}

/// Closed set of declarations the navigator reasons about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Function(FunctionDecl),
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Import(ImportDecl),
    Other(OtherDecl),
}

impl Decl {
    /// The declared name (import path for imports).
    pub fn name(&self) -> &str {
        match self {
            Decl::Function(f) => &f.name.name,
            Decl::Struct(s) => &s.name.name,
            Decl::Interface(i) => &i.name.name,
            Decl::Import(i) => &i.path,
            Decl::Other(o) => &o.name.name,
        }
    }
}

/// A parsed Go file: its package clause and its top-level declarations in
/// source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: Ident,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Import specs in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Import(import) => Some(import),
            _ => None,
        })
    }

    /// Every declaration of the file, depth-first: each top-level
    /// declaration followed by the declarations nested in it.
    pub fn walk(&self) -> Vec<&Decl> {
        let mut out = Vec::new();
        visit(&self.decls, &mut out);
        out
    }
}

fn visit<'a>(decls: &'a [Decl], out: &mut Vec<&'a Decl>) {
    for decl in decls {
        out.push(decl);
        match decl {
            Decl::Function(func) => visit(&func.locals, out),
            Decl::Other(other) => visit(&other.locals, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, start_byte: usize) -> Ident {
        Ident {
            name: name.to_string(),
            span: Span {
                start_byte,
                start_line: 1,
                start_col: start_byte + 1,
            },
        }
    }

    #[test]
    fn test_walk_is_depth_first() {
        let local = Decl::Interface(InterfaceDecl {
            name: ident("Local", 30),
            members: vec![],
        });
        let file = SourceFile {
            package: ident("main", 8),
            decls: vec![
                Decl::Function(FunctionDecl {
                    name: ident("run", 18),
                    span: ident("run", 13).span,
                    receiver: None,
                    locals: vec![local],
                }),
                Decl::Struct(StructDecl {
                    name: ident("After", 60),
                }),
            ],
        };

        let names: Vec<_> = file.walk().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["run", "Local", "After"]);
    }

    #[test]
    fn test_walk_visits_initializer_locals() {
        let file = SourceFile {
            package: ident("main", 8),
            decls: vec![Decl::Other(OtherDecl {
                name: ident("handler", 18),
                category: DeclCategory::Var,
                locals: vec![Decl::Interface(InterfaceDecl {
                    name: ident("R", 40),
                    members: vec![],
                })],
            })],
        };

        let names: Vec<_> = file.walk().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["handler", "R"]);
    }

    #[test]
    fn test_interface_methods_skip_embedded() {
        let iface = InterfaceDecl {
            name: ident("Shape", 5),
            members: vec![
                InterfaceMember::Embedded("fmt.Stringer".to_string()),
                InterfaceMember::Method(ident("Area", 20)),
            ],
        };
        let names: Vec<_> = iface.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Area"]);
    }

    #[test]
    fn test_receiver_base_name() {
        let named = ReceiverType::Named("Config".to_string());
        assert_eq!(named.base_name(), Some("Config"));
        assert_eq!(ReceiverType::Complex("*List[T]".to_string()).base_name(), None);
    }
}
