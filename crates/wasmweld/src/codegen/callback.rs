//! Callback backend
//!
//! Emits the boxed-closure type alias plus both wrapping directions for a
//! callback: `*_to_js` hands a native closure to the host, `*_from_js`
//! wraps a host function handle into a native closure. The host-call
//! wrapper is produced by a fixed sequence of stages - Start, Pack,
//! Invoke, Unpack, End - with no branching between them; Unpack is
//! omitted entirely for void returns.

use crate::codegen::convert::{unpack_expr, write_pack};
use crate::codegen::plan::{plan, ConversionPlan, PlanError};
use crate::ir::{to_snake_case, Callback, IdlType};

/// Staged writer for one callback.
///
/// Carries every field any stage needs; each stage receives the writer and
/// the output buffer explicitly, so its data dependencies are visible at
/// the call site.
pub struct CallbackWriter<'a> {
    cb: &'a Callback,
    plan: ConversionPlan,
    /// Output type name, e.g. `TimerHandler`
    type_name: &'a str,
    /// snake_case base for the wrapper functions
    fn_base: String,
    /// Native parameter list, e.g. `t: f64, msg: String`
    param_line: String,
}

impl<'a> CallbackWriter<'a> {
    /// Plan the callback's conversions and set up the writer
    pub fn new(cb: &'a Callback) -> Result<Self, PlanError> {
        let plan = plan(&cb.params, &cb.returns)?;
        let type_name = cb.name.def.as_str();
        let fn_base = to_snake_case(type_name);
        let param_line = cb
            .params
            .iter()
            .map(|p| {
                if p.variadic {
                    format!("{}: Vec<{}>", p.name, p.ty.to_rust())
                } else {
                    format!("{}: {}", p.name, p.ty.to_rust())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Self {
            cb,
            plan,
            type_name,
            fn_base,
            param_line,
        })
    }

    /// Run every stage in order into `out`
    pub fn write(&self, out: &mut String) {
        self.start(out);
        self.pack(out);
        self.invoke(out);
        self.unpack(out);
        self.end(out);
    }

    /// Closure type text, e.g. `Box<dyn FnMut(f64) -> i32>`
    fn closure_type(&self) -> String {
        let params: Vec<String> = self
            .cb
            .params
            .iter()
            .map(|p| {
                if p.variadic {
                    format!("Vec<{}>", p.ty.to_rust())
                } else {
                    p.ty.to_rust()
                }
            })
            .collect();
        match &self.plan.ret {
            Some(ret) => format!(
                "Box<dyn FnMut({}) -> {}>",
                params.join(", "),
                ret.ty.to_rust()
            ),
            None => format!("Box<dyn FnMut({})>", params.join(", ")),
        }
    }

    /// Declaration header, host-side wrapper, and the opening of the
    /// native->host call wrapper
    fn start(&self, out: &mut String) {
        out.push_str(&format!("/// callback: {}\n", self.cb.name.idl));
        out.push_str(&format!(
            "pub type {} = {};\n\n",
            self.type_name,
            self.closure_type()
        ));

        self.write_to_js(out);

        // from_js: the wrapper whose body the remaining stages fill in
        out.push_str(&format!(
            "pub fn {}_from_js(value: js_sys::Function) -> {} {{\n",
            self.fn_base, self.type_name
        ));
        match &self.plan.ret {
            Some(ret) => out.push_str(&format!(
                "    Box::new(move |{}| -> {} {{\n",
                self.param_line,
                ret.ty.to_rust()
            )),
            None => out.push_str(&format!("    Box::new(move |{}| {{\n", self.param_line)),
        }
        if self.plan.variadic {
            out.push_str("        let _args = js_sys::Array::new();\n");
        } else {
            out.push_str(&format!(
                "        let _args = js_sys::Array::new_with_length({});\n",
                self.plan.fixed_slots
            ));
        }
        out.push_str("        let mut _end: u32 = 0;\n");
    }

    /// One packing statement per parameter, in parameter order; a variadic
    /// parameter expands to one statement per call-time argument
    fn pack(&self, out: &mut String) {
        write_pack(out, &self.plan.steps, "        ");
    }

    /// Exactly one host call expression
    fn invoke(&self, out: &mut String) {
        match &self.plan.ret {
            Some(_) => out.push_str(
                "        let _returned = value\n            .apply(&wasm_bindgen::JsValue::NULL, &_args)\n            .unwrap_throw();\n",
            ),
            None => out.push_str(
                "        value\n            .apply(&wasm_bindgen::JsValue::NULL, &_args)\n            .unwrap_throw();\n",
            ),
        }
    }

    /// Result decoding; skipped entirely for void returns
    fn unpack(&self, out: &mut String) {
        if let Some(ret) = &self.plan.ret {
            out.push_str(&format!(
                "        let _converted = {};\n",
                unpack_expr(&ret.ty, "_returned")
            ));
        }
    }

    /// Return the converted value and close the wrapper
    fn end(&self, out: &mut String) {
        if self.plan.ret.is_some() {
            out.push_str("        _converted\n");
        }
        out.push_str("    })\n");
        out.push_str("}\n\n");
    }

    /// Host-side wrapper: native closure exposed as a host function
    fn write_to_js(&self, out: &mut String) {
        out.push_str(&format!(
            "pub fn {}_to_js(mut callback: {}) -> js_sys::Function {{\n",
            self.fn_base, self.type_name
        ));
        out.push_str(
            "    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_args: js_sys::Array| {\n",
        );
        for (i, step) in self.plan.steps.iter().enumerate() {
            if step.is_variadic() {
                let elem = match &step.ty {
                    IdlType::Sequence(inner) => inner.as_ref().clone(),
                    other => other.clone(),
                };
                out.push_str(&format!(
                    "        let _a{} = ({}.._args.length()).map(|__i| {}).collect::<Vec<_>>();\n",
                    i,
                    i,
                    unpack_expr(&elem, "_args.get(__i)")
                ));
            } else {
                out.push_str(&format!(
                    "        let _a{} = {};\n",
                    i,
                    unpack_expr(&step.ty, &format!("_args.get({})", i))
                ));
            }
        }
        let args: Vec<String> = (0..self.plan.steps.len())
            .map(|i| format!("_a{}", i))
            .collect();
        out.push_str(&format!("        callback({});\n", args.join(", ")));
        if self.plan.ret.is_some() {
            out.push_str("        // TODO: surface the native return value to the host caller\n");
        }
        out.push_str("    }) as Box<dyn FnMut(js_sys::Array)>);\n");
        out.push_str("    closure.into_js_value().unchecked_into()\n");
        out.push_str("}\n\n");
    }
}

/// Emit one callback into `out`
pub fn write_callback(out: &mut String, cb: &Callback) -> Result<(), PlanError> {
    CallbackWriter::new(cb)?.write(out);
    Ok(())
}
