//! Per-kind property tables
//!
//! Each element kind exposes a closed whitelist of settable keys. Lookups
//! return the setter; the valid-key list feeds the unknown-key diagnostic.

use crate::ir::{Callback, Dictionary, Enumeration, Interface};

pub type InterfaceSetter = fn(&mut Interface, &str);
pub type CallbackSetter = fn(&mut Callback, &str);
pub type DictionarySetter = fn(&mut Dictionary, &str);
pub type EnumSetter = fn(&mut Enumeration, &str);

pub const INTERFACE_PROPERTY_KEYS: &[&str] = &["name", "package"];
pub const CALLBACK_PROPERTY_KEYS: &[&str] = &["name", "package"];
pub const DICTIONARY_PROPERTY_KEYS: &[&str] = &["name", "package"];
pub const ENUM_PROPERTY_KEYS: &[&str] = &["name", "package", "prefix", "suffix"];

/// Setter for an interface property key
pub fn interface_property(key: &str) -> Option<InterfaceSetter> {
    match key {
        "name" => Some(|v, value| v.name.def = value.to_string()),
        "package" => Some(|v, value| v.package = value.to_string()),
        _ => None,
    }
}

/// Setter for a callback property key
pub fn callback_property(key: &str) -> Option<CallbackSetter> {
    match key {
        "name" => Some(|v, value| v.name.def = value.to_string()),
        "package" => Some(|v, value| v.package = value.to_string()),
        _ => None,
    }
}

/// Setter for a dictionary property key
pub fn dictionary_property(key: &str) -> Option<DictionarySetter> {
    match key {
        "name" => Some(|v, value| v.name.def = value.to_string()),
        "package" => Some(|v, value| v.package = value.to_string()),
        _ => None,
    }
}

/// Setter for an enum property key.
///
/// `prefix` and `suffix` rewrite every variant's output name; the wire
/// values stay untouched.
pub fn enum_property(key: &str) -> Option<EnumSetter> {
    match key {
        "name" => Some(|v, value| v.name.def = value.to_string()),
        "package" => Some(|v, value| v.package = value.to_string()),
        "prefix" => Some(|v, value| {
            for variant in &mut v.variants {
                variant.name.def = format!("{}{}", value, variant.name.def);
            }
        }),
        "suffix" => Some(|v, value| {
            for variant in &mut v.variants {
                variant.name.def = format!("{}{}", variant.name.def, value);
            }
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EnumVariant;

    #[test]
    fn test_interface_keys() {
        assert!(interface_property("name").is_some());
        assert!(interface_property("package").is_some());
        assert!(interface_property("prefix").is_none());
    }

    #[test]
    fn test_enum_prefix_touches_defs_only() {
        let mut e = Enumeration::new("ScrollBehavior", "dom")
            .variant(EnumVariant::new("smooth"))
            .variant(EnumVariant::new("instant"));

        enum_property("prefix").unwrap()(&mut e, "Scroll");

        assert_eq!(e.variants[0].name.def, "Scrollsmooth");
        assert_eq!(e.variants[0].name.idl, "smooth");
        assert_eq!(e.variants[0].value, "smooth");
    }
}
