//! Type system for wasmweld
//!
//! This module provides the resolved WebIDL type representation and its
//! canonical Rust binding. The front end resolves every type reference
//! before the store reaches this crate, so lookups here are pure.
//!
//! # Type Mapping Overview
//!
//! | WebIDL Type | Rust Type | Notes |
//! |-------------|-----------|-------|
//! | `byte`, `short`, `long` | `i8`, `i16`, `i32` | Signed integers |
//! | `octet`, `unsigned short`, `unsigned long` | `u8`, `u16`, `u32` | Unsigned integers |
//! | `long long`, `unsigned long long` | `i64`, `u64` | Marshalled through f64 |
//! | `float`, `double` | `f32`, `f64` | IEEE 754 |
//! | `boolean` | `bool` | Direct mapping |
//! | `DOMString`, `USVString` | `String` | Host string constructor |
//! | `undefined` (void) | `()` | Return position only |
//! | `any` | `wasm_bindgen::JsValue` | Passed through untouched |
//! | `sequence<T>` | `Vec<T>` | Element-wise conversion |
//! | interface `I` | wrapper struct `I` | Identity-preserving handle |
//! | dictionary `D` | struct `D` | Field-wise conversion |
//! | enum `E` | Rust enum `E` | Host-string conversion |
//! | callback `C` | boxed closure `C` | Wrapped both directions |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive WebIDL types with a direct Rust equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdlPrimitive {
    Bool,
    Byte,
    Octet,
    Short,
    UnsignedShort,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    DomString,
    /// `undefined` in return position
    Void,
}

impl IdlPrimitive {
    /// Canonical Rust type for this primitive
    pub fn to_rust(&self) -> &'static str {
        match self {
            IdlPrimitive::Bool => "bool",
            IdlPrimitive::Byte => "i8",
            IdlPrimitive::Octet => "u8",
            IdlPrimitive::Short => "i16",
            IdlPrimitive::UnsignedShort => "u16",
            IdlPrimitive::Long => "i32",
            IdlPrimitive::UnsignedLong => "u32",
            IdlPrimitive::LongLong => "i64",
            IdlPrimitive::UnsignedLongLong => "u64",
            IdlPrimitive::Float => "f32",
            IdlPrimitive::Double => "f64",
            IdlPrimitive::DomString => "String",
            IdlPrimitive::Void => "()",
        }
    }
}

impl fmt::Display for IdlPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rust())
    }
}

/// Semantic conversion category used by the marshalling planner.
///
/// Every parameter and return value is routed to its conversion routine
/// through this tag alone; the emitter never re-inspects the full type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarshalKind {
    /// Direct numeric wrap (`JsValue::from`)
    Number,
    /// Direct boolean wrap
    Boolean,
    /// Host string constructor
    String,
    /// Underlying host handle passed through, identity preserved
    ObjectRef,
    /// Field-wise recursion through the dictionary's own conversion
    Dictionary,
    /// Host-string conversion through the enum's own conversion
    Enum,
    /// Closure wrapped into a host function
    Callback,
    /// Untouched `JsValue`
    Any,
    /// Element-wise conversion into a host array
    Sequence,
}

/// Resolved WebIDL type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdlType {
    Primitive(IdlPrimitive),

    /// `any` -> JsValue passed through
    Any,

    /// `sequence<T>` -> Vec<T>
    Sequence(Box<IdlType>),

    /// Reference to an interface definition (by output name)
    Interface(String),

    /// Reference to a dictionary definition
    Dictionary(String),

    /// Reference to an enum definition
    Enum(String),

    /// Reference to a callback definition
    Callback(String),
}

impl IdlType {
    /// Canonical Rust type text for generated declarations.
    ///
    /// This is the read-only type-info lookup: the name it returns is the
    /// definition name the front end resolved, never recomputed here.
    pub fn to_rust(&self) -> String {
        match self {
            IdlType::Primitive(p) => p.to_rust().to_string(),
            IdlType::Any => "wasm_bindgen::JsValue".to_string(),
            IdlType::Sequence(inner) => format!("Vec<{}>", inner.to_rust()),
            IdlType::Interface(name)
            | IdlType::Dictionary(name)
            | IdlType::Enum(name)
            | IdlType::Callback(name) => name.clone(),
        }
    }

    /// Conversion category for the planner
    pub fn marshal(&self) -> MarshalKind {
        match self {
            IdlType::Primitive(IdlPrimitive::Bool) => MarshalKind::Boolean,
            IdlType::Primitive(IdlPrimitive::DomString) => MarshalKind::String,
            IdlType::Primitive(_) => MarshalKind::Number,
            IdlType::Any => MarshalKind::Any,
            IdlType::Sequence(_) => MarshalKind::Sequence,
            IdlType::Interface(_) => MarshalKind::ObjectRef,
            IdlType::Dictionary(_) => MarshalKind::Dictionary,
            IdlType::Enum(_) => MarshalKind::Enum,
            IdlType::Callback(_) => MarshalKind::Callback,
        }
    }

    /// Whether this is the void return type
    pub fn is_void(&self) -> bool {
        matches!(self, IdlType::Primitive(IdlPrimitive::Void))
    }

    /// Create a boolean type
    pub fn bool() -> Self {
        IdlType::Primitive(IdlPrimitive::Bool)
    }

    /// Create a `long` (i32) type
    pub fn long() -> Self {
        IdlType::Primitive(IdlPrimitive::Long)
    }

    /// Create a `double` (f64) type
    pub fn double() -> Self {
        IdlType::Primitive(IdlPrimitive::Double)
    }

    /// Create a string type
    pub fn string() -> Self {
        IdlType::Primitive(IdlPrimitive::DomString)
    }

    /// Create the void return type
    pub fn void() -> Self {
        IdlType::Primitive(IdlPrimitive::Void)
    }

    /// Create a `sequence<T>` type
    pub fn sequence(inner: IdlType) -> Self {
        IdlType::Sequence(Box::new(inner))
    }

    /// Create an interface reference
    pub fn interface_ref(name: impl Into<String>) -> Self {
        IdlType::Interface(name.into())
    }

    /// Create a dictionary reference
    pub fn dictionary_ref(name: impl Into<String>) -> Self {
        IdlType::Dictionary(name.into())
    }
}

impl fmt::Display for IdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rust())
    }
}
