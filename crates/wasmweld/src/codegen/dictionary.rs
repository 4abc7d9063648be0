//! Dictionary backend
//!
//! A WebIDL dictionary becomes a plain struct whose fields are converted
//! one by one through `Reflect` property access. The host property names
//! are the IDL names; the Rust field names are the resolved output names.

use crate::codegen::convert::{pack_expr, unpack_expr};
use crate::ir::Dictionary;

/// Emit one dictionary into `out`
pub fn write_dictionary(out: &mut String, value: &Dictionary) {
    let name = &value.name.def;

    out.push_str(&format!("/// dictionary: {}\n", value.name.idl));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str(&format!("pub struct {} {{\n", name));
    for f in &value.fields {
        out.push_str(&format!("    pub {}: {},\n", f.def, f.ty.to_rust()));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("impl {} {{\n", name));

    out.push_str("    pub fn to_js_value(&self) -> wasm_bindgen::JsValue {\n");
    out.push_str("        let _obj = js_sys::Object::new();\n");
    for (i, f) in value.fields.iter().enumerate() {
        out.push_str(&format!(
            "        let _v{} = {};\n",
            i,
            pack_expr(&f.ty, &format!("self.{}", f.def))
        ));
        out.push_str(&format!(
            "        js_sys::Reflect::set(&_obj, &wasm_bindgen::JsValue::from_str(\"{}\"), &_v{}).unwrap_throw();\n",
            f.idl, i
        ));
    }
    out.push_str("        _obj.into()\n");
    out.push_str("    }\n\n");

    out.push_str("    pub fn from_js_value(value: wasm_bindgen::JsValue) -> Self {\n");
    for (i, f) in value.fields.iter().enumerate() {
        out.push_str(&format!(
            "        let _f{} = js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str(\"{}\")).unwrap_throw();\n",
            i, f.idl
        ));
    }
    out.push_str("        Self {\n");
    for (i, f) in value.fields.iter().enumerate() {
        out.push_str(&format!(
            "            {}: {},\n",
            f.def,
            unpack_expr(&f.ty, &format!("_f{}", i))
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
}
