//! Wasmweld: WebIDL binding generator for Rust WASM targets
//!
//! This crate turns a finalized WebIDL schema (interfaces, callbacks,
//! dictionaries, enumerations) into Rust glue code that marshals values
//! across the WASM <-> browser boundary via `wasm_bindgen`/`js_sys`.
//!
//! # Architecture
//!
//! - `ir`: the resolved type system and the schema element graph
//! - `transform`: the rule engine that mutates element properties and
//!   member names in place, accumulating diagnostics
//! - `codegen`: the marshalling planner and the per-kind backends that
//!   render into per-package buffers
//!
//! # Usage
//!
//! ```rust,ignore
//! use wasmweld::{generate, SchemaStore};
//!
//! let store: SchemaStore = front_end.finalize();
//! let rules = rule_source.rules();
//! let output = generate(&rules, store)?;
//! for (path, content) in &output.files {
//!     sink.write(path, content)?;
//! }
//! ```

pub mod codegen;
pub mod diag;
pub mod ir;
pub mod transform;

// Re-export commonly used types
pub use codegen::{
    plan, render, ConversionPlan, PlanError, RenderError, RenderOutput,
};
pub use diag::{Diagnostic, Diagnostics, SourceRef};
pub use ir::{
    Attribute, Callback, DictField, Dictionary, ElementKind, ElementName, EnumVariant,
    Enumeration, IdlPrimitive, IdlType, Interface, MarshalKind, MemberName, Method, Param,
    SchemaStore,
};
pub use transform::{apply, Action, Matcher, Rule, Selector};

/// Run the whole pipeline: transform the store, then render every in-use
/// element. The transform completes fully before emission begins; rule
/// diagnostics and formatting diagnostics come back merged, in order.
pub fn generate(rules: &[Rule], mut store: SchemaStore) -> Result<RenderOutput, RenderError> {
    let mut diags = apply(rules, &mut store);
    let mut output = render(&store)?;
    diags.extend(output.diagnostics);
    output.diagnostics = diags;
    Ok(output)
}
