//! Syntax-tree analysis of a single Go source file.
//!
//! A file is parsed once with tree-sitter and lowered into a small
//! declaration tree. Two independent walks consume that tree:
//! - `symbols`: the package-level scope followed by the import list
//! - `receivers`: every method bound to, or declared by, a named type
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────┐
//! │ .go file    │────▶│ GoAnalyzer │────▶│ SourceFile   │
//! └─────────────┘     │ (parse +   │     │ (Decl tree)  │
//!                     │  lower)    │     └──────────────┘
//!                     └────────────┘            │
//!                                      ┌────────┴────────┐
//!                                      ▼                 ▼
//!                              extract_symbols   resolve_receivers
//! ```
//!
//! [`SourceFileAnalyzer`] ties the steps together and maps every failure
//! into [`crate::error::NavError`].

mod facts;
mod go;
mod receivers;
mod source;
mod symbols;

pub use facts::{
    Decl, DeclCategory, FunctionDecl, Ident, ImportDecl, InterfaceDecl, InterfaceMember,
    OtherDecl, ReceiverType, SourceFile, Span, StructDecl,
};
pub use go::{GoAnalyzer, ParsedFile, SyntaxError, GO_EXTENSION};
pub use receivers::resolve_receivers;
pub(crate) use source::relative_loc;
pub use source::SourceFileAnalyzer;
pub use symbols::extract_symbols;
