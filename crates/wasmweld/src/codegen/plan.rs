//! Marshalling planner
//!
//! Computes the per-signature conversion recipe: one step per parameter
//! with an assigned host argument slot, plus an optional return
//! conversion. Plans are derived on demand per emitted element and never
//! persisted.

use crate::ir::{IdlType, MarshalKind, Param};
use thiserror::Error;

/// Host argument slot assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSlot {
    /// Fixed position in the argument array
    Fixed(usize),
    /// Contiguous run starting at this position; the run length is only
    /// known at call time, so the argument count becomes a runtime counter
    VariadicRun(usize),
}

/// One parameter's packing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStep {
    /// User-visible parameter name
    pub param: String,
    /// Generated local holding the packed value
    pub local: String,
    pub ty: IdlType,
    pub kind: MarshalKind,
    pub slot: ArgSlot,
}

impl ConversionStep {
    /// Whether this step packs a variadic run
    pub fn is_variadic(&self) -> bool {
        matches!(self.slot, ArgSlot::VariadicRun(_))
    }
}

/// Result decoding step; absent entirely for void returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnConversion {
    pub ty: IdlType,
    pub kind: MarshalKind,
}

/// Per-signature marshalling recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub steps: Vec<ConversionStep>,
    pub ret: Option<ReturnConversion>,
    /// Number of fixed argument slots (variadic run excluded)
    pub fixed_slots: usize,
    /// Whether the final parameter is variadic
    pub variadic: bool,
}

/// Planner failures; these indicate a malformed signature, not a rule
/// problem, so they are hard errors rather than diagnostics
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("variadic parameter '{0}' must be the final parameter")]
    VariadicNotLast(String),
}

/// Compute the conversion plan for a signature.
///
/// Parameters are walked left to right; each non-variadic parameter takes
/// the next fixed slot. A variadic parameter takes no fixed slot and
/// instead consumes a contiguous run starting at its position. A void
/// return produces no [`ReturnConversion`] at all.
pub fn plan(params: &[Param], returns: &IdlType) -> Result<ConversionPlan, PlanError> {
    let mut steps = Vec::with_capacity(params.len());
    let mut next_slot = 0usize;
    let mut variadic = false;

    for (i, p) in params.iter().enumerate() {
        let slot = if p.variadic {
            if i + 1 != params.len() {
                return Err(PlanError::VariadicNotLast(p.name.clone()));
            }
            variadic = true;
            ArgSlot::VariadicRun(next_slot)
        } else {
            let slot = ArgSlot::Fixed(next_slot);
            next_slot += 1;
            slot
        };
        steps.push(ConversionStep {
            param: p.name.clone(),
            local: format!("_p{}", i),
            ty: p.ty.clone(),
            kind: p.ty.marshal(),
            slot,
        });
    }

    let ret = if returns.is_void() {
        None
    } else {
        Some(ReturnConversion {
            ty: returns.clone(),
            kind: returns.marshal(),
        })
    };

    Ok(ConversionPlan {
        steps,
        ret,
        fixed_slots: next_slot,
        variadic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_slot_assignment() {
        let params = vec![
            Param::new("a", IdlType::long()),
            Param::new("b", IdlType::string()),
            Param::new("c", IdlType::bool()),
        ];

        let plan = plan(&params, &IdlType::long()).unwrap();

        assert_eq!(plan.fixed_slots, 3);
        assert!(!plan.variadic);
        assert_eq!(plan.steps[0].slot, ArgSlot::Fixed(0));
        assert_eq!(plan.steps[2].slot, ArgSlot::Fixed(2));
        assert_eq!(plan.steps[1].local, "_p1");
        assert_eq!(plan.steps[0].kind, MarshalKind::Number);
        assert_eq!(plan.steps[1].kind, MarshalKind::String);
        assert_eq!(plan.steps[2].kind, MarshalKind::Boolean);
    }

    #[test]
    fn test_variadic_takes_a_run() {
        let params = vec![
            Param::new("first", IdlType::string()),
            Param::new("rest", IdlType::Any).variadic(),
        ];

        let plan = plan(&params, &IdlType::void()).unwrap();

        assert!(plan.variadic);
        assert_eq!(plan.fixed_slots, 1);
        assert_eq!(plan.steps[1].slot, ArgSlot::VariadicRun(1));
        assert!(plan.steps[1].is_variadic());
    }

    #[test]
    fn test_variadic_must_be_last() {
        let params = vec![
            Param::new("rest", IdlType::Any).variadic(),
            Param::new("after", IdlType::long()),
        ];

        let err = plan(&params, &IdlType::void()).unwrap_err();
        assert_eq!(err, PlanError::VariadicNotLast("rest".to_string()));
    }

    #[test]
    fn test_void_return_has_no_conversion() {
        let params = vec![Param::new("a", IdlType::long())];
        let plan = plan(&params, &IdlType::void()).unwrap();
        assert!(plan.ret.is_none());
    }

    #[test]
    fn test_object_ref_return() {
        let plan = plan(&[], &IdlType::interface_ref("Node")).unwrap();
        let ret = plan.ret.unwrap();
        assert_eq!(ret.kind, MarshalKind::ObjectRef);
        assert_eq!(ret.ty.to_rust(), "Node");
    }
}
