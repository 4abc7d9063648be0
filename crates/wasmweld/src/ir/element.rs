//! Schema elements
//!
//! The four WebIDL constructs the pipeline operates on: interfaces,
//! callbacks, dictionaries and enumerations. Every element keeps both its
//! original IDL name and the output definition name; transform rules
//! mutate the latter in place and never touch the former.

use crate::ir::IdlType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The four element kinds; fixed and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Interface,
    Callback,
    Dictionary,
    Enum,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Interface => "interface",
            ElementKind::Callback => "callback",
            ElementKind::Dictionary => "dictionary",
            ElementKind::Enum => "enum",
        };
        write!(f, "{}", name)
    }
}

/// Name record for a top-level element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementName {
    /// Original schema name
    pub idl: String,
    /// Output definition name
    pub def: String,
}

impl ElementName {
    /// Create a name record; the definition name starts equal to the IDL name
    pub fn new(idl: impl Into<String>) -> Self {
        let idl = idl.into();
        let def = idl.clone();
        Self { idl, def }
    }
}

/// Mutable name record for a renameable member (method, attribute, variant).
///
/// Rename actions reach these through a per-element index and overwrite
/// `def` only; `idl` stays what the schema declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberName {
    pub idl: String,
    pub def: String,
}

impl MemberName {
    pub fn new(idl: impl Into<String>) -> Self {
        let idl = idl.into();
        let def = idl.clone();
        Self { idl, def }
    }
}

/// One parameter of a callback or interface method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: IdlType,
    /// A variadic parameter is always the final one and consumes a
    /// contiguous run of host argument slots.
    pub variadic: bool,
}

impl Param {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: IdlType) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
        }
    }

    /// Mark as variadic
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// Interface method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: MemberName,
    pub params: Vec<Param>,
    pub returns: IdlType,
}

impl Method {
    /// Create a method with a void return
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: MemberName::new(name),
            params: Vec::new(),
            returns: IdlType::void(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type
    pub fn returns(mut self, ty: IdlType) -> Self {
        self.returns = ty;
        self
    }
}

/// Interface attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: MemberName,
    pub ty: IdlType,
    pub readonly: bool,
}

impl Attribute {
    /// Create an attribute
    pub fn new(name: impl Into<String>, ty: IdlType) -> Self {
        Self {
            name: MemberName::new(name),
            ty,
            readonly: false,
        }
    }

    /// Mark as readonly
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// Index into an interface's members, used by the rename machinery.
///
/// Name records stay inside their owning element; the index stores member
/// positions, never shared references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSlot {
    Method(usize),
    Attribute(usize),
    Variant(usize),
}

/// WebIDL interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: ElementName,
    pub package: String,
    pub in_use: bool,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl Interface {
    /// Create an interface in `package`
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: ElementName::new(name),
            package: package.into(),
            in_use: true,
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Add a method
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Add an attribute
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Exclude from emission
    pub fn unused(mut self) -> Self {
        self.in_use = false;
        self
    }

    /// Build the member-name -> slot index consulted by rename actions.
    ///
    /// Keys are the members' IDL names: rules address members by what the
    /// schema declared, not by any earlier rename result.
    pub fn member_index(&self) -> HashMap<String, MemberSlot> {
        let mut index = HashMap::new();
        for (i, m) in self.methods.iter().enumerate() {
            index.insert(m.name.idl.clone(), MemberSlot::Method(i));
        }
        for (i, a) in self.attributes.iter().enumerate() {
            index.insert(a.name.idl.clone(), MemberSlot::Attribute(i));
        }
        index
    }

    /// Mutable access to the name record at `slot`
    pub fn member_name_mut(&mut self, slot: MemberSlot) -> Option<&mut MemberName> {
        match slot {
            MemberSlot::Method(i) => self.methods.get_mut(i).map(|m| &mut m.name),
            MemberSlot::Attribute(i) => self.attributes.get_mut(i).map(|a| &mut a.name),
            MemberSlot::Variant(_) => None,
        }
    }
}

/// WebIDL callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    pub name: ElementName,
    pub package: String,
    pub in_use: bool,
    pub params: Vec<Param>,
    pub returns: IdlType,
}

impl Callback {
    /// Create a callback with a void return
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: ElementName::new(name),
            package: package.into(),
            in_use: true,
            params: Vec::new(),
            returns: IdlType::void(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type
    pub fn returns(mut self, ty: IdlType) -> Self {
        self.returns = ty;
        self
    }

    /// Exclude from emission
    pub fn unused(mut self) -> Self {
        self.in_use = false;
        self
    }
}

/// Dictionary field; not renameable, the output name is fixed up front
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictField {
    pub idl: String,
    pub def: String,
    pub ty: IdlType,
    pub required: bool,
}

impl DictField {
    /// Create a field; the output name defaults to the snake_case IDL name
    pub fn new(idl: impl Into<String>, ty: IdlType) -> Self {
        let idl = idl.into();
        let def = to_snake_case(&idl);
        Self {
            idl,
            def,
            ty,
            required: false,
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// WebIDL dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    pub name: ElementName,
    pub package: String,
    pub in_use: bool,
    pub fields: Vec<DictField>,
}

impl Dictionary {
    /// Create a dictionary in `package`
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: ElementName::new(name),
            package: package.into(),
            in_use: true,
            fields: Vec::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, field: DictField) -> Self {
        self.fields.push(field);
        self
    }

    /// Exclude from emission
    pub fn unused(mut self) -> Self {
        self.in_use = false;
        self
    }
}

/// Enumeration variant; the name record is renameable, the wire value is not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: MemberName,
    /// Exact string the host sees
    pub value: String,
}

impl EnumVariant {
    /// Create a variant whose wire value equals its IDL name
    pub fn new(idl: impl Into<String>) -> Self {
        let idl = idl.into();
        let value = idl.clone();
        Self {
            name: MemberName::new(idl),
            value,
        }
    }

    /// Set an explicit wire value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// WebIDL enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub name: ElementName,
    pub package: String,
    pub in_use: bool,
    pub variants: Vec<EnumVariant>,
}

impl Enumeration {
    /// Create an enumeration in `package`
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: ElementName::new(name),
            package: package.into(),
            in_use: true,
            variants: Vec::new(),
        }
    }

    /// Add a variant
    pub fn variant(mut self, variant: EnumVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Exclude from emission
    pub fn unused(mut self) -> Self {
        self.in_use = false;
        self
    }

    /// Build the variant-name -> slot index consulted by rename actions
    pub fn member_index(&self) -> HashMap<String, MemberSlot> {
        self.variants
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.idl.clone(), MemberSlot::Variant(i)))
            .collect()
    }

    /// Mutable access to the name record at `slot`
    pub fn member_name_mut(&mut self, slot: MemberSlot) -> Option<&mut MemberName> {
        match slot {
            MemberSlot::Variant(i) => self.variants.get_mut(i).map(|v| &mut v.name),
            _ => None,
        }
    }
}

// Helper functions

/// Convert an IDL identifier (camelCase or PascalCase) to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            result.push(c);
        }
    }
    result
}

/// Convert an IDL identifier to PascalCase (enum variant position)
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
