//! Interface backend
//!
//! A WebIDL interface becomes a wrapper struct owning the host handle.
//! The handle is passed through unchanged in both directions so host
//! identity is preserved. Method wrappers look the member up by its IDL
//! name on the handle and invoke it through the shared packing plan;
//! attributes become getter/setter pairs.

use crate::codegen::convert::{pack_expr, unpack_expr, write_pack};
use crate::codegen::plan::{plan, PlanError};
use crate::ir::{to_snake_case, Interface, Method};

/// Emit one interface into `out`
pub fn write_interface(out: &mut String, value: &Interface) -> Result<(), PlanError> {
    let name = &value.name.def;

    out.push_str(&format!("/// interface: {}\n", value.name.idl));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str(&format!("pub struct {} {{\n", name));
    out.push_str("    value: wasm_bindgen::JsValue,\n");
    out.push_str("}\n\n");

    out.push_str(&format!("impl {} {{\n", name));

    out.push_str("    /// Wrap an existing host handle\n");
    out.push_str("    pub fn from_js_value(value: wasm_bindgen::JsValue) -> Self {\n");
    out.push_str("        Self { value }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// The underlying host handle; identity is preserved\n");
    out.push_str("    pub fn to_js_value(&self) -> wasm_bindgen::JsValue {\n");
    out.push_str("        self.value.clone()\n");
    out.push_str("    }\n\n");

    for a in &value.attributes {
        let getter = to_snake_case(&a.name.def);
        out.push_str(&format!(
            "    pub fn {}(&self) -> {} {{\n",
            getter,
            a.ty.to_rust()
        ));
        out.push_str(&format!(
            "        let _got = js_sys::Reflect::get(&self.value, &wasm_bindgen::JsValue::from_str(\"{}\")).unwrap_throw();\n",
            a.name.idl
        ));
        out.push_str(&format!("        {}\n", unpack_expr(&a.ty, "_got")));
        out.push_str("    }\n\n");

        if !a.readonly {
            out.push_str(&format!(
                "    pub fn set_{}(&self, value: {}) {{\n",
                getter,
                a.ty.to_rust()
            ));
            out.push_str(&format!("        let _v = {};\n", pack_expr(&a.ty, "value")));
            out.push_str(&format!(
                "        js_sys::Reflect::set(&self.value, &wasm_bindgen::JsValue::from_str(\"{}\"), &_v).unwrap_throw();\n",
                a.name.idl
            ));
            out.push_str("    }\n\n");
        }
    }

    for m in &value.methods {
        write_method(out, m)?;
    }

    out.push_str("}\n\n");
    Ok(())
}

fn write_method(out: &mut String, m: &Method) -> Result<(), PlanError> {
    let plan = plan(&m.params, &m.returns)?;
    let fn_name = to_snake_case(&m.name.def);

    let mut sig_params = vec!["&self".to_string()];
    sig_params.extend(m.params.iter().map(|p| {
        if p.variadic {
            format!("{}: Vec<{}>", p.name, p.ty.to_rust())
        } else {
            format!("{}: {}", p.name, p.ty.to_rust())
        }
    }));

    match &plan.ret {
        Some(ret) => out.push_str(&format!(
            "    pub fn {}({}) -> {} {{\n",
            fn_name,
            sig_params.join(", "),
            ret.ty.to_rust()
        )),
        None => out.push_str(&format!(
            "    pub fn {}({}) {{\n",
            fn_name,
            sig_params.join(", ")
        )),
    }

    // member lookup is by IDL name; renames only change the native side
    out.push_str(&format!(
        "        let _method: js_sys::Function = js_sys::Reflect::get(&self.value, &wasm_bindgen::JsValue::from_str(\"{}\"))\n            .unwrap_throw()\n            .unchecked_into();\n",
        m.name.idl
    ));
    if plan.variadic {
        out.push_str("        let _args = js_sys::Array::new();\n");
    } else {
        out.push_str(&format!(
            "        let _args = js_sys::Array::new_with_length({});\n",
            plan.fixed_slots
        ));
    }
    out.push_str("        let mut _end: u32 = 0;\n");
    write_pack(out, &plan.steps, "        ");

    match &plan.ret {
        Some(ret) => {
            out.push_str(
                "        let _returned = _method.apply(&self.value, &_args).unwrap_throw();\n",
            );
            out.push_str(&format!(
                "        {}\n",
                unpack_expr(&ret.ty, "_returned")
            ));
        }
        None => {
            out.push_str("        _method.apply(&self.value, &_args).unwrap_throw();\n");
        }
    }
    out.push_str("    }\n\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Attribute, IdlType, Param};

    #[test]
    fn test_handle_wrapper() {
        let iface = Interface::new("HTMLDivElement", "html");
        let mut out = String::new();
        write_interface(&mut out, &iface).unwrap();

        assert!(out.contains("pub struct HTMLDivElement {"));
        assert!(out.contains("value: wasm_bindgen::JsValue,"));
        assert!(out.contains("self.value.clone()"));
    }

    #[test]
    fn test_method_invokes_by_idl_name() {
        let mut iface = Interface::new("EventTarget", "dom").method(
            Method::new("addEventListener")
                .param(Param::new("kind", IdlType::string()))
                .param(Param::new("handler", IdlType::Callback("EventHandler".to_string()))),
        );
        // native name renamed; the host lookup must still use the IDL name
        iface.methods[0].name.def = "listen".to_string();

        let mut out = String::new();
        write_interface(&mut out, &iface).unwrap();

        assert!(out.contains("pub fn listen(&self, kind: String, handler: EventHandler)"));
        assert!(out.contains("from_str(\"addEventListener\")"));
        assert!(out.contains("event_handler_to_js(handler)"));
    }

    #[test]
    fn test_readonly_attribute_has_no_setter() {
        let iface = Interface::new("Node", "dom")
            .attribute(Attribute::new("nodeName", IdlType::string()).readonly())
            .attribute(Attribute::new("textContent", IdlType::string()));

        let mut out = String::new();
        write_interface(&mut out, &iface).unwrap();

        assert!(out.contains("pub fn node_name(&self) -> String {"));
        assert!(!out.contains("pub fn set_node_name"));
        assert!(out.contains("pub fn set_text_content(&self, value: String)"));
    }

    #[test]
    fn test_method_return_conversion() {
        let iface = Interface::new("Document", "dom").method(
            Method::new("createElement")
                .param(Param::new("tag", IdlType::string()))
                .returns(IdlType::interface_ref("Element")),
        );

        let mut out = String::new();
        write_interface(&mut out, &iface).unwrap();

        assert!(out.contains("-> Element {"));
        assert!(out.contains("Element::from_js_value(_returned)"));
    }
}
