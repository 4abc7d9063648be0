//! Enumeration backend
//!
//! A WebIDL enum becomes a Rust enum with host-string conversion in both
//! directions. The wire values stay exactly what the schema declared;
//! renames and prefix/suffix rules only affect the Rust variant names.

use crate::ir::{to_pascal_case, Enumeration};

/// Emit one enumeration into `out`
pub fn write_enum(out: &mut String, value: &Enumeration) {
    let name = &value.name.def;

    out.push_str(&format!("/// enum: {}\n", value.name.idl));
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq)]\n");
    out.push_str(&format!("pub enum {} {{\n", name));
    for v in &value.variants {
        out.push_str(&format!("    {},\n", to_pascal_case(&v.name.def)));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("impl {} {{\n", name));

    out.push_str("    pub fn as_str(&self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for v in &value.variants {
        out.push_str(&format!(
            "            {}::{} => \"{}\",\n",
            name,
            to_pascal_case(&v.name.def),
            v.value
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    pub fn to_js_value(&self) -> wasm_bindgen::JsValue {\n");
    out.push_str("        wasm_bindgen::JsValue::from_str(self.as_str())\n");
    out.push_str("    }\n\n");

    out.push_str("    pub fn from_js_value(value: wasm_bindgen::JsValue) -> Self {\n");
    out.push_str("        match value.as_string().unwrap_or_default().as_str() {\n");
    for v in &value.variants {
        out.push_str(&format!(
            "            \"{}\" => {}::{},\n",
            v.value,
            name,
            to_pascal_case(&v.name.def)
        ));
    }
    // unknown wire values fall back to the first variant
    if let Some(first) = value.variants.first() {
        out.push_str(&format!(
            "            _ => {}::{},\n",
            name,
            to_pascal_case(&first.name.def)
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EnumVariant;

    #[test]
    fn test_variants_and_wire_values() {
        let e = Enumeration::new("ScrollBehavior", "dom")
            .variant(EnumVariant::new("smooth"))
            .variant(EnumVariant::new("instant"));

        let mut out = String::new();
        write_enum(&mut out, &e);

        assert!(out.contains("pub enum ScrollBehavior {"));
        assert!(out.contains("    Smooth,\n    Instant,\n"));
        assert!(out.contains("ScrollBehavior::Smooth => \"smooth\""));
        assert!(out.contains("\"instant\" => ScrollBehavior::Instant"));
    }

    #[test]
    fn test_renamed_variant_keeps_wire_value() {
        let mut e = Enumeration::new("ScrollBehavior", "dom").variant(EnumVariant::new("smooth"));
        e.variants[0].name.def = "eased".to_string();

        let mut out = String::new();
        write_enum(&mut out, &e);

        assert!(out.contains("    Eased,\n"));
        assert!(out.contains("ScrollBehavior::Eased => \"smooth\""));
    }
}
