//! Integration tests for Go source file analysis.
//!
//! These tests validate declaration listing and receiver resolution
//! against the fixtures under `testdata/workspace`.

use std::path::PathBuf;

use gonav::{DeclKind, NavError, NavRequest, Node, NodeType, WorkspaceResolver};

fn resolver() -> WorkspaceResolver {
    WorkspaceResolver::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/workspace"))
}

fn resolve(target: &str, receiver: Option<&str>) -> Result<Vec<Node>, NavError> {
    resolver().resolve(&NavRequest::new(
        Some(target.to_string()),
        receiver.map(str::to_string),
    ))
}

fn labels(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

// =============================================================================
// Package scope
// =============================================================================

#[test]
fn test_hello_declarations() {
    let nodes = resolve("hello/main.go", None).unwrap();

    assert_eq!(
        labels(&nodes),
        vec!["func\nFoo", "struct\nBar", "func\nmain", "fmt"]
    );
    let source = std::fs::read_to_string(resolver().root().join("hello/main.go")).unwrap();
    assert_eq!(nodes[0].id, source.find("Foo").unwrap().to_string());
    assert_eq!(nodes[3].kind, Some(DeclKind::Import));
    assert_eq!(nodes[3].id, "fmt");

    let file = resolver().root().join("hello/main.go");
    for node in &nodes {
        assert_eq!(node.node_type, NodeType::Declaration);
        assert_eq!(node.loc, "hello/main.go");
        assert_eq!(node.dir, file.to_string_lossy());
    }
}

#[test]
fn test_shapes_package_scope() {
    let nodes = resolve("shapes/shapes.go", None).unwrap();

    assert_eq!(
        labels(&nodes),
        vec![
            "const\nVersion",
            "var\nregistry",
            "interface\nShape",
            "struct\nCircle",
            "type-alias\nUnit",
            "func\nRegister",
            "fmt",
            "math",
        ]
    );
}

#[test]
fn test_ids_are_unique_per_response() {
    let nodes = resolve("shapes/shapes.go", None).unwrap();
    let mut ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), nodes.len());
}

// =============================================================================
// Receivers
// =============================================================================

#[test]
fn test_struct_receiver_methods() {
    let nodes = resolve("shapes/shapes.go", Some("Circle")).unwrap();
    assert_eq!(
        labels(&nodes),
        vec!["method\nArea", "method\nPerimeter", "method\nString"]
    );

    let source = std::fs::read_to_string(resolver().root().join("shapes/shapes.go")).unwrap();
    let func_offset = source.find("func (c *Circle) Area").unwrap();
    assert_eq!(nodes[0].id, func_offset.to_string());
}

#[test]
fn test_interface_method_set() {
    let nodes = resolve("shapes/shapes.go", Some("Shape")).unwrap();
    assert_eq!(
        labels(&nodes),
        vec!["interface-method\nArea", "interface-method\nPerimeter"]
    );
    assert!(nodes.iter().all(|n| n.kind == Some(DeclKind::Method)));
}

#[test]
fn test_local_interface_inside_function() {
    let nodes = resolve("shapes/shapes.go", Some("Named")).unwrap();
    assert_eq!(labels(&nodes), vec!["interface-method\nName"]);
}

#[test]
fn test_unknown_receiver_is_empty() {
    assert!(resolve("shapes/shapes.go", Some("Square")).unwrap().is_empty());
}

#[test]
fn test_empty_receiver_means_package_scope() {
    let with_empty = resolver()
        .resolve(&NavRequest::new(
            Some("hello/main.go".to_string()),
            Some(String::new()),
        ))
        .unwrap();
    assert_eq!(with_empty, resolve("hello/main.go", None).unwrap());
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_syntax_error_yields_no_nodes() {
    let err = resolve("broken/broken.go", None).unwrap_err();
    assert!(matches!(err, NavError::ParseError { .. }));

    let message = err.to_string();
    assert!(message.contains("broken.go:"), "{message}");
    assert!(message.contains("syntax error"), "{message}");
}

#[test]
fn test_syntax_error_in_receiver_mode() {
    let err = resolve("broken/broken.go", Some("Good")).unwrap_err();
    assert_eq!(err.as_str(), "parse-error");
}

#[test]
fn test_misplaced_top_level_code_fails_whole_file() {
    let root = tempfile::TempDir::new().unwrap();
    let cases = [
        ("stmt.go", "package main\n\nfmt.Println(\"hi\")\n\nfunc Kept() {}\n"),
        ("late_import.go", "package main\n\nfunc Kept() {}\n\nimport \"fmt\"\n"),
        ("two_packages.go", "package main\n\npackage other\n\nfunc Kept() {}\n"),
    ];
    for (name, source) in cases {
        std::fs::write(root.path().join(name), source).unwrap();
    }
    let resolver = WorkspaceResolver::new(root.path());

    for (name, _) in cases {
        let err = resolver
            .resolve(&NavRequest::new(Some(name.to_string()), None))
            .unwrap_err();
        assert!(matches!(err, NavError::ParseError { .. }), "{name}: {err}");
        assert!(err.to_string().contains("syntax error"), "{name}: {err}");
    }
}
