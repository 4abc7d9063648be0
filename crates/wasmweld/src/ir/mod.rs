//! Intermediate representation for wasmweld
//!
//! This module provides the resolved type system and the schema element
//! graph the transform engine mutates and the code generators consume.

pub mod element;
pub mod store;
pub mod types;

pub use element::*;
pub use store::*;
pub use types::*;
