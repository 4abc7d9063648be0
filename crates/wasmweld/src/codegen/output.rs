//! Output assembly
//!
//! Owns the per-package buffers, the cosmetic blank-line normalization and
//! the syntax-aware formatting pass, and drives emission over every in-use
//! element of the store. The result is an in-memory path -> content map;
//! writing it anywhere is the caller's business.

use crate::codegen::callback::write_callback;
use crate::codegen::dictionary::write_dictionary;
use crate::codegen::enumeration::write_enum;
use crate::codegen::interface::write_interface;
use crate::codegen::plan::PlanError;
use crate::diag::{Diagnostics, SourceRef};
use crate::ir::SchemaStore;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Hard failures of the emission phase.
///
/// Rule problems and formatting failures are diagnostics, not errors;
/// only a malformed signature or an unserializable manifest aborts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid signature: {0}")]
    Plan(#[from] PlanError),

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Everything the emission phase hands back to the caller
#[derive(Debug)]
pub struct RenderOutput {
    /// Output path -> generated content
    pub files: BTreeMap<String, String>,
    /// Formatting problems and other non-fatal findings
    pub diagnostics: Diagnostics,
}

/// Per-package output buffers, created lazily and seeded once with the
/// package preamble
#[derive(Debug, Default)]
pub struct PackageBuffers {
    buffers: IndexMap<String, String>,
}

impl PackageBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for `package`, seeding the preamble on first reference
    pub fn buffer(&mut self, package: &str) -> &mut String {
        self.buffers
            .entry(package.to_string())
            .or_insert_with(|| preamble(package))
    }

    /// Hand the buffers over, in first-reference order
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.buffers
    }
}

/// Package preamble: module doc, imports, and the aggregate-release helper
/// for host-resource-owning values
fn preamble(package: &str) -> String {
    format!(
        r#"//! Package {package} - WASM bindings generated by wasmweld.
//! Do not edit manually.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Owner of host-side resources that must be released explicitly once the
/// native side is done with them.
pub trait ReleasableResource {{
    fn release(&mut self);
}}

pub(crate) struct ReleasableResourceList(pub(crate) Vec<Box<dyn ReleasableResource>>);

impl ReleasableResourceList {{
    pub(crate) fn release(&mut self) {{
        for resource in self.0.iter_mut() {{
            resource.release();
        }}
    }}
}}

"#
    )
}

/// Line prefixes treated as declaration starters by the normalization pass
const DECL_PREFIXES: &[&str] = &[
    "//", "#[", "pub", "impl", "fn", "use", "type", "struct", "enum", "trait", "const", "static",
];

/// Collapse blank lines so that each top-level declaration is preceded by
/// exactly one blank line and nothing else is.
///
/// Applying this twice yields the same output as applying it once: every
/// blank line it emits is one it would remove and re-insert at the same
/// position on the next run.
pub fn normalize_blank_lines(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut in_decl_run = false;
    for line in code.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let starts_decl = DECL_PREFIXES.iter().any(|p| line.starts_with(p));
        if starts_decl {
            if !in_decl_run {
                out.push('\n');
            }
            in_decl_run = true;
        } else {
            in_decl_run = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Syntax-aware formatting of a generated source buffer
fn format_source(code: &str) -> Result<String, syn::Error> {
    let file = syn::parse_file(code)?;
    Ok(prettyplease::unparse(&file))
}

/// Normalize and format one package buffer.
///
/// A formatting failure is recovered locally: the normalized but
/// unformatted text is kept and a diagnostic is surfaced, so the caller
/// always receives inspectable output.
fn finalize(path: &str, code: String, diags: &mut Diagnostics) -> String {
    let normalized = normalize_blank_lines(&code);
    match format_source(&normalized) {
        Ok(formatted) => formatted,
        Err(err) => {
            diags.report(
                SourceRef::new(path, 0),
                format!("unable to format output source code: {}", err),
            );
            normalized
        }
    }
}

/// Generate source files for every in-use element of the store.
///
/// Returns the path -> content map plus accumulated diagnostics. The store
/// must already be transformed; it is only read here.
pub fn render(store: &SchemaStore) -> Result<RenderOutput, RenderError> {
    let mut buffers = PackageBuffers::new();

    for e in store.enums.values().filter(|e| e.in_use) {
        write_enum(buffers.buffer(&e.package), e);
    }
    for c in store.callbacks.values().filter(|c| c.in_use) {
        write_callback(buffers.buffer(&c.package), c)?;
    }
    for d in store.dictionaries.values().filter(|d| d.in_use) {
        write_dictionary(buffers.buffer(&d.package), d);
    }
    for i in store.interfaces.values().filter(|i| i.in_use) {
        write_interface(buffers.buffer(&i.package), i)?;
    }

    let mut diags = Diagnostics::new();
    let mut files = BTreeMap::new();
    for (package, code) in buffers.into_inner() {
        let low = package.to_lowercase();
        let path = format!("{}/{}.rs", low, low);
        let content = finalize(&path, code, &mut diags);
        files.insert(path, content);
    }

    files.insert(
        "bindings.json".to_string(),
        serde_json::to_string_pretty(&store.manifest())?,
    );

    debug!(
        files = files.len(),
        diagnostics = diags.len(),
        "render complete"
    );
    Ok(RenderOutput {
        files,
        diagnostics: diags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Callback, EnumVariant, Enumeration, IdlType, Interface, Param};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buffer_seeded_once() {
        let mut buffers = PackageBuffers::new();
        buffers.buffer("dom").push_str("pub fn a() {}\n");
        buffers.buffer("dom").push_str("pub fn b() {}\n");

        let inner = buffers.into_inner();
        assert_eq!(inner.len(), 1);
        let code = &inner["dom"];
        // preamble seeded exactly once: one trait, one list struct, one impl
        assert_eq!(code.matches("pub trait ReleasableResource").count(), 1);
        assert_eq!(code.matches("impl ReleasableResourceList").count(), 1);
        assert!(code.contains("//! Package dom"));
        assert!(code.contains("pub fn a() {}\npub fn b() {}\n"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = "pub fn a() {}\n\n\n\npub fn b() {\n    1\n}\n\n#[derive(Debug)]\npub struct S;\n";
        let once = normalize_blank_lines(input);
        let twice = normalize_blank_lines(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_one_blank_before_declarations() {
        let input = "pub fn a() {\n    x();\n}\n\n\n\npub fn b() {}\nuse c;\n";
        let out = normalize_blank_lines(input);
        // one blank before each declaration run; consecutive declaration
        // lines stay together
        assert_eq!(out, "\npub fn a() {\n    x();\n}\n\npub fn b() {}\nuse c;\n");
    }

    #[test]
    fn test_format_failure_keeps_text_and_reports() {
        let mut diags = Diagnostics::new();
        let broken = "pub fn broken( {\n".to_string();
        let kept = finalize("dom/dom.rs", broken, &mut diags);

        assert!(kept.contains("pub fn broken("));
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.source.file, "dom/dom.rs");
        assert!(diag.message.contains("unable to format output source code"));
    }

    #[test]
    fn test_render_groups_by_package() {
        let store = SchemaStore::new()
            .enumeration(
                Enumeration::new("ScrollBehavior", "dom").variant(EnumVariant::new("smooth")),
            )
            .callback(
                Callback::new("TimerHandler", "dom")
                    .param(Param::new("t", IdlType::double()))
                    .returns(IdlType::long()),
            )
            .interface(Interface::new("HTMLDivElement", "html"));

        let output = render(&store).unwrap();

        assert!(output.diagnostics.is_empty());
        assert!(output.files.contains_key("dom/dom.rs"));
        assert!(output.files.contains_key("html/html.rs"));
        assert!(output.files.contains_key("bindings.json"));

        let dom = &output.files["dom/dom.rs"];
        assert!(dom.contains("pub enum ScrollBehavior"));
        assert!(dom.contains("pub type TimerHandler"));
        assert!(!dom.contains("HTMLDivElement"));
    }

    #[test]
    fn test_render_skips_unused() {
        let store = SchemaStore::new()
            .interface(Interface::new("HTMLDivElement", "html"))
            .interface(Interface::new("SVGElement", "svg").unused());

        let output = render(&store).unwrap();

        assert!(output.files.contains_key("html/html.rs"));
        assert!(!output.files.contains_key("svg/svg.rs"));
    }

    #[test]
    fn test_rendered_output_is_formatted() {
        let store = SchemaStore::new().callback(
            Callback::new("OnLoad", "dom").param(Param::new("ok", IdlType::bool())),
        );

        let output = render(&store).unwrap();

        // the syntax-aware pass succeeded, so no diagnostics and the
        // buffer parses as Rust
        assert!(output.diagnostics.is_empty());
        assert!(syn::parse_file(&output.files["dom/dom.rs"]).is_ok());
    }

    #[test]
    fn test_manifest_lists_definitions() {
        let store = SchemaStore::new()
            .callback(Callback::new("TimerHandler", "dom"))
            .interface(Interface::new("SVGElement", "svg").unused());

        let output = render(&store).unwrap();
        let manifest = &output.files["bindings.json"];

        assert!(manifest.contains("TimerHandler"));
        assert!(!manifest.contains("SVGElement"));
    }
}
