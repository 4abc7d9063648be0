//! Per-type conversion expressions
//!
//! Text fragments for moving one value across the boundary, selected by
//! semantic tag. Every backend routes through these two functions so the
//! native->host and host->native directions stay symmetric.

use crate::ir::{to_snake_case, IdlType, MarshalKind};

/// Expression converting native `value` into a host `JsValue`
pub fn pack_expr(ty: &IdlType, value: &str) -> String {
    match ty.marshal() {
        MarshalKind::Number => format!("wasm_bindgen::JsValue::from({})", value),
        MarshalKind::Boolean => format!("wasm_bindgen::JsValue::from_bool({})", value),
        MarshalKind::String => format!("wasm_bindgen::JsValue::from_str({}.as_str())", value),
        // Wrapper hands back its own handle, so host identity is preserved
        MarshalKind::ObjectRef | MarshalKind::Dictionary | MarshalKind::Enum => {
            format!("{}.to_js_value()", value)
        }
        MarshalKind::Callback => {
            let name = match ty {
                IdlType::Callback(name) => name.as_str(),
                _ => unreachable!("callback tag on non-callback type"),
            };
            format!("{}_to_js({}).into()", to_snake_case(name), value)
        }
        MarshalKind::Any => value.to_string(),
        MarshalKind::Sequence => {
            let inner = match ty {
                IdlType::Sequence(inner) => inner,
                _ => unreachable!("sequence tag on non-sequence type"),
            };
            format!(
                "wasm_bindgen::JsValue::from({}.into_iter().map(|__e| {}).collect::<js_sys::Array>())",
                value,
                pack_expr(inner, "__e")
            )
        }
    }
}

/// Expression converting host `value` (a `JsValue`) into the native type
pub fn unpack_expr(ty: &IdlType, value: &str) -> String {
    match ty.marshal() {
        MarshalKind::Number => format!(
            "{}.as_f64().unwrap_or_default() as {}",
            value,
            ty.to_rust()
        ),
        MarshalKind::Boolean => format!("{}.as_bool().unwrap_or_default()", value),
        MarshalKind::String => format!("{}.as_string().unwrap_or_default()", value),
        MarshalKind::ObjectRef | MarshalKind::Dictionary | MarshalKind::Enum => {
            format!("{}::from_js_value({})", ty.to_rust(), value)
        }
        MarshalKind::Callback => {
            let name = match ty {
                IdlType::Callback(name) => name.as_str(),
                _ => unreachable!("callback tag on non-callback type"),
            };
            format!(
                "{}_from_js({}.unchecked_into())",
                to_snake_case(name),
                value
            )
        }
        MarshalKind::Any => value.to_string(),
        MarshalKind::Sequence => {
            let inner = match ty {
                IdlType::Sequence(inner) => inner,
                _ => unreachable!("sequence tag on non-sequence type"),
            };
            format!(
                "js_sys::Array::from(&{}).iter().map(|__e| {}).collect()",
                value,
                unpack_expr(inner, "__e")
            )
        }
    }
}

/// Emit the packing statement sequence for a plan's steps.
///
/// One statement per fixed parameter; a variadic step expands to a loop
/// producing one statement per call-time argument. Shared between the
/// callback Pack stage and the interface method bodies.
pub(crate) fn write_pack(out: &mut String, steps: &[crate::codegen::plan::ConversionStep], indent: &str) {
    for step in steps {
        if step.is_variadic() {
            let elem = match &step.ty {
                IdlType::Sequence(inner) => inner.as_ref().clone(),
                other => other.clone(),
            };
            out.push_str(&format!("{}for _v in {}.into_iter() {{\n", indent, step.param));
            out.push_str(&format!(
                "{}    let {} = {};\n",
                indent,
                step.local,
                pack_expr(&elem, "_v")
            ));
            out.push_str(&format!("{}    _args.set(_end, {});\n", indent, step.local));
            out.push_str(&format!("{}    _end += 1;\n", indent));
            out.push_str(&format!("{}}}\n", indent));
        } else {
            out.push_str(&format!(
                "{}let {} = {};\n",
                indent,
                step.local,
                pack_expr(&step.ty, &step.param)
            ));
            out.push_str(&format!("{}_args.set(_end, {});\n", indent, step.local));
            out.push_str(&format!("{}_end += 1;\n", indent));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_roundtrip_exprs() {
        assert_eq!(
            pack_expr(&IdlType::long(), "count"),
            "wasm_bindgen::JsValue::from(count)"
        );
        assert_eq!(
            unpack_expr(&IdlType::long(), "_returned"),
            "_returned.as_f64().unwrap_or_default() as i32"
        );
    }

    #[test]
    fn test_string_uses_host_constructor() {
        assert_eq!(
            pack_expr(&IdlType::string(), "msg"),
            "wasm_bindgen::JsValue::from_str(msg.as_str())"
        );
    }

    #[test]
    fn test_object_ref_preserves_handle() {
        assert_eq!(
            pack_expr(&IdlType::interface_ref("Node"), "target"),
            "target.to_js_value()"
        );
        assert_eq!(
            unpack_expr(&IdlType::interface_ref("Node"), "_returned"),
            "Node::from_js_value(_returned)"
        );
    }

    #[test]
    fn test_callback_wraps() {
        let ty = IdlType::Callback("TimerHandler".to_string());
        assert_eq!(
            pack_expr(&ty, "handler"),
            "timer_handler_to_js(handler).into()"
        );
    }

    #[test]
    fn test_sequence_recurses() {
        let ty = IdlType::sequence(IdlType::string());
        let expr = unpack_expr(&ty, "_returned");
        assert!(expr.contains("js_sys::Array::from(&_returned)"));
        assert!(expr.contains("__e.as_string()"));
    }
}
