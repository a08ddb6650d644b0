//! Methods bound to, or declared by, a named type.

use crate::analysis::{Decl, FunctionDecl, InterfaceDecl, SourceFile};
use crate::node::{DeclKind, FileContext, Node};

/// Scan every declaration of `file`, depth-first, for methods of `receiver`.
///
/// Two independent rules apply:
/// - a function whose receiver type is `receiver` or `*receiver`;
/// - an interface named `receiver`, whose explicitly named members are
///   emitted (embedded members are skipped, not expanded).
///
/// No match yields an empty list.
pub fn resolve_receivers(file: &SourceFile, receiver: &str, ctx: &FileContext) -> Vec<Node> {
    file.walk()
        .into_iter()
        .flat_map(|decl| method_nodes(decl, receiver, ctx))
        .collect()
}

/// Nodes contributed by a single declaration.
fn method_nodes(decl: &Decl, receiver: &str, ctx: &FileContext) -> Vec<Node> {
    match decl {
        Decl::Function(func) => bound_method(func, receiver, ctx).into_iter().collect(),
        Decl::Interface(iface) if iface.name.name == receiver => interface_methods(iface, ctx),
        _ => Vec::new(),
    }
}

fn bound_method(func: &FunctionDecl, receiver: &str, ctx: &FileContext) -> Option<Node> {
    let params = func.receiver.as_ref()?;
    params
        .iter()
        .any(|param| param.base_name() == Some(receiver))
        .then(|| Node::declaration(DeclKind::Method, &func.name.name, func.span.start_byte, ctx))
}

fn interface_methods(iface: &InterfaceDecl, ctx: &FileContext) -> Vec<Node> {
    iface
        .methods()
        .map(|member| Node::interface_method(&member.name, member.span.start_byte, ctx))
        .collect()
}
