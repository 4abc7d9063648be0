//! Schema transform engine
//!
//! Rules select elements by exact name or pattern within one element kind
//! and mutate their properties or member names in place. The engine runs
//! exactly once, after the front end finalizes the store and before any
//! code generation.

pub mod engine;
pub mod properties;
pub mod rule;

pub use engine::apply;
pub use rule::{Action, Matcher, Rule, Selector};
