//! Code generation for WASM bindings
//!
//! This module provides:
//! - the marshalling planner (per-signature conversion recipes)
//! - one backend per element kind, with the callback backend carrying the
//!   full staged Start/Pack/Invoke/Unpack/End machinery
//! - output assembly: per-package buffers, blank-line normalization and
//!   the syntax-aware formatting pass

pub mod callback;
pub mod convert;
pub mod dictionary;
pub mod enumeration;
pub mod interface;
pub mod output;
pub mod plan;

pub use callback::{write_callback, CallbackWriter};
pub use dictionary::write_dictionary;
pub use enumeration::write_enum;
pub use interface::write_interface;
pub use output::{normalize_blank_lines, render, PackageBuffers, RenderError, RenderOutput};
pub use plan::{plan, ArgSlot, ConversionPlan, ConversionStep, PlanError, ReturnConversion};
