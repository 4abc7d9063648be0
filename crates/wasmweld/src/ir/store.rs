//! Schema store
//!
//! The finalized element graph handed over by the front end. The store is
//! treated as immutable input until the transform engine runs; after that
//! it is read-only again for the whole emission phase.

use crate::ir::{Callback, Dictionary, ElementKind, Enumeration, Interface};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All schema elements, keyed by IDL name per kind.
///
/// `IndexMap` keeps insertion order so emission and diagnostics are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaStore {
    pub interfaces: IndexMap<String, Interface>,
    pub callbacks: IndexMap<String, Callback>,
    pub dictionaries: IndexMap<String, Dictionary>,
    pub enums: IndexMap<String, Enumeration>,
}

impl SchemaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interface
    pub fn interface(mut self, value: Interface) -> Self {
        self.interfaces.insert(value.name.idl.clone(), value);
        self
    }

    /// Add a callback
    pub fn callback(mut self, value: Callback) -> Self {
        self.callbacks.insert(value.name.idl.clone(), value);
        self
    }

    /// Add a dictionary
    pub fn dictionary(mut self, value: Dictionary) -> Self {
        self.dictionaries.insert(value.name.idl.clone(), value);
        self
    }

    /// Add an enumeration
    pub fn enumeration(mut self, value: Enumeration) -> Self {
        self.enums.insert(value.name.idl.clone(), value);
        self
    }

    /// IDL names of one kind, in insertion order
    pub fn names_of(&self, kind: ElementKind) -> Vec<String> {
        match kind {
            ElementKind::Interface => self.interfaces.keys().cloned().collect(),
            ElementKind::Callback => self.callbacks.keys().cloned().collect(),
            ElementKind::Dictionary => self.dictionaries.keys().cloned().collect(),
            ElementKind::Enum => self.enums.keys().cloned().collect(),
        }
    }

    /// Whether an element of `kind` with this IDL name exists
    pub fn contains(&self, kind: ElementKind, name: &str) -> bool {
        match kind {
            ElementKind::Interface => self.interfaces.contains_key(name),
            ElementKind::Callback => self.callbacks.contains_key(name),
            ElementKind::Dictionary => self.dictionaries.contains_key(name),
            ElementKind::Enum => self.enums.contains_key(name),
        }
    }

    /// Every distinct output package referenced by an in-use element,
    /// in first-reference order
    pub fn packages(&self) -> Vec<String> {
        let mut seen = Vec::new();
        let mut push = |pkg: &str| {
            if !seen.iter().any(|p: &String| p == pkg) {
                seen.push(pkg.to_string());
            }
        };
        for e in self.enums.values().filter(|e| e.in_use) {
            push(&e.package);
        }
        for c in self.callbacks.values().filter(|c| c.in_use) {
            push(&c.package);
        }
        for d in self.dictionaries.values().filter(|d| d.in_use) {
            push(&d.package);
        }
        for i in self.interfaces.values().filter(|i| i.in_use) {
            push(&i.package);
        }
        seen
    }

    /// Summary of in-use definitions per package, for the manifest
    pub fn manifest(&self) -> Manifest {
        let mut packages: IndexMap<String, Vec<String>> = IndexMap::new();
        for e in self.enums.values().filter(|e| e.in_use) {
            packages
                .entry(e.package.clone())
                .or_default()
                .push(e.name.def.clone());
        }
        for c in self.callbacks.values().filter(|c| c.in_use) {
            packages
                .entry(c.package.clone())
                .or_default()
                .push(c.name.def.clone());
        }
        for d in self.dictionaries.values().filter(|d| d.in_use) {
            packages
                .entry(d.package.clone())
                .or_default()
                .push(d.name.def.clone());
        }
        for i in self.interfaces.values().filter(|i| i.in_use) {
            packages
                .entry(i.package.clone())
                .or_default()
                .push(i.name.def.clone());
        }
        Manifest { packages }
    }
}

/// Machine-readable index of what was generated where.
///
/// Serialized to `bindings.json` next to the generated sources so
/// downstream tooling can consume the module layout without re-parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// package -> output definition names
    pub packages: IndexMap<String, Vec<String>>,
}
