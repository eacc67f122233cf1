//! Template mode: render, write, format.

mod helpers;

use std::fs;

use helpers::{demo_tree, InMemoryTransform};
use vecmat_codegen::{CodegenError, TemplateRenderer, GENERATED_BY_COMMENT};

fn render_demo(template: &str) -> String {
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("generated.rs");
    let transform = InMemoryTransform::textual();

    TemplateRenderer::new()
        .render_file(&demo_tree().join(template), &output, &transform)
        .unwrap();

    // Formatter only: no rules, no import fix.
    let calls = transform.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].rules.is_empty());
    assert!(!calls[0].fix_imports);

    fs::read_to_string(output).unwrap()
}

#[test]
fn vector_template() {
    let out = render_demo("vector.rs.hbs");

    assert_eq!(out.lines().next(), Some(format!("// {GENERATED_BY_COMMENT}").as_str()));
    assert!(out.contains("pub struct Vec2(pub [f32; 2]);"));
    assert!(out.contains("pub struct Vec4(pub [f32; 4]);"));
    assert!(out.contains("pub const fn new(e0: f32, e1: f32, e2: f32) -> Self {"));
    assert!(out.contains("/// The W component."));
    assert!(out.contains("pub fn w(&self) -> f32 {"));
    assert!(out.contains(
        "self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2]"
    ));
    assert!(out.contains("Self([-self.0[0], -self.0[1]])"));
    assert!(!out.contains("Vec5"));
}

#[test]
fn matrix_template_is_column_major() {
    let out = render_demo("matrix.rs.hbs");

    assert!(out.contains("pub struct Mat2(pub [f32; 4]);"));
    assert!(out.contains("pub struct Mat2x3(pub [f32; 6]);"));
    assert!(out.contains("pub struct Mat4x3(pub [f32; 12]);"));
    assert!(out.contains("pub struct Mat4(pub [f32; 16]);"));
    assert!(out.contains(
        "pub const fn new(m00: f32, m10: f32, m01: f32, m11: f32, m02: f32, m12: f32) -> Self {"
    ));
    assert!(out.contains("pub fn col(&self, col: usize) -> Vec2 {"));
    assert!(out.contains("Vec2([self.0[col * 2 + 0], self.0[col * 2 + 1]])"));
    assert!(out.contains("pub fn row(&self, row: usize) -> Vec3 {"));
    assert!(out.contains(
        "Mat3x2::new(self.at(0, 0), self.at(0, 1), self.at(0, 2), self.at(1, 0), self.at(1, 1), self.at(1, 2))"
    ));
}

#[test]
fn failed_render_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("bad.rs.hbs");
    let output = dir.path().join("bad.rs");
    fs::write(&template, "pub struct {{typename 5 5}};\nconst W: &str = \"{{elementname 4}}\";\n")
        .unwrap();

    let transform = InMemoryTransform::textual();
    let err = TemplateRenderer::new()
        .render_file(&template, &output, &transform)
        .unwrap_err();

    assert!(err.is_template_error());
    assert!(matches!(err, CodegenError::TemplateRender { ref name, .. } if name == "bad.rs.hbs"));
    assert!(!output.exists());
    assert!(transform.calls.borrow().is_empty());
}

#[test]
fn formatter_failure_is_fatal_but_output_kept() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("vec.rs.hbs");
    let output = dir.path().join("vec.rs");
    fs::write(&template, "pub struct {{typename 1 2}}(pub [f32; 2])\n").unwrap();

    let transform = InMemoryTransform::textual().failing_on("vec.rs");
    let err = TemplateRenderer::new()
        .render_file(&template, &output, &transform)
        .unwrap_err();

    match err {
        CodegenError::ToolFailed { output: tool_output, .. } => {
            assert!(tool_output.contains("expected item"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "pub struct Vec2(pub [f32; 2])\n"
    );
}

#[test]
fn missing_template_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let transform = InMemoryTransform::textual();
    let err = TemplateRenderer::new()
        .render_file(
            &dir.path().join("absent.rs.hbs"),
            &dir.path().join("absent.rs"),
            &transform,
        )
        .unwrap_err();
    assert!(matches!(err, CodegenError::Io { .. }));
}
