//! Transform engine
//!
//! Applies the ordered rule list to the schema store in place. Every
//! problem becomes a diagnostic and execution moves on to the next rule;
//! a single invocation surfaces everything wrong with the rule set.

use crate::diag::{Diagnostics, SourceRef};
use crate::ir::{
    Callback, Dictionary, ElementKind, Enumeration, Interface, SchemaStore,
};
use crate::transform::properties::{
    callback_property, dictionary_property, enum_property, interface_property,
    CALLBACK_PROPERTY_KEYS, DICTIONARY_PROPERTY_KEYS, ENUM_PROPERTY_KEYS, INTERFACE_PROPERTY_KEYS,
};
use crate::transform::rule::{Action, Matcher, Rule};
use tracing::debug;

/// Apply `rules` to `store` in order, accumulating diagnostics.
///
/// Exact selectors must resolve to one element of their kind; a miss is a
/// diagnostic. Pattern selectors are best-effort broadcasts; zero matches
/// is silently allowed. The engine never aborts on a bad rule.
pub fn apply(rules: &[Rule], store: &mut SchemaStore) -> Diagnostics {
    debug!(rules = rules.len(), "applying transform rules");
    let mut diags = Diagnostics::new();

    for rule in rules {
        let kind = rule.selector.kind;
        let targets: Vec<String> = match &rule.selector.matcher {
            Matcher::Exact(name) => {
                if store.contains(kind, name) {
                    vec![name.clone()]
                } else {
                    diags.report(
                        rule.source.clone(),
                        format!("unknown {} '{}'", kind, name),
                    );
                    continue;
                }
            }
            Matcher::Pattern(re) => store
                .names_of(kind)
                .into_iter()
                .filter(|name| re.is_match(name))
                .collect(),
        };

        let action = rule.action.innermost();
        for name in &targets {
            execute(action, &rule.source, kind, name, store, &mut diags);
        }
    }

    debug!(diagnostics = diags.len(), "transform complete");
    diags
}

/// Execute one action against one resolved element
fn execute(
    action: &Action,
    source: &SourceRef,
    kind: ElementKind,
    name: &str,
    store: &mut SchemaStore,
    diags: &mut Diagnostics,
) {
    match kind {
        ElementKind::Interface => {
            if let Some(value) = store.interfaces.get_mut(name) {
                execute_interface(action, source, value, diags);
            }
        }
        ElementKind::Callback => {
            if let Some(value) = store.callbacks.get_mut(name) {
                execute_callback(action, source, value, diags);
            }
        }
        ElementKind::Dictionary => {
            if let Some(value) = store.dictionaries.get_mut(name) {
                execute_dictionary(action, source, value, diags);
            }
        }
        ElementKind::Enum => {
            if let Some(value) = store.enums.get_mut(name) {
                execute_enum(action, source, value, diags);
            }
        }
    }
}

fn execute_interface(
    action: &Action,
    source: &SourceRef,
    instance: &mut Interface,
    diags: &mut Diagnostics,
) {
    match action {
        Action::SetProperty { key, value } => {
            if let Some(set) = interface_property(key) {
                set(instance, value);
            } else {
                diags.report(
                    source.clone(),
                    format!(
                        "unknown property '{}', valid are: {}",
                        key,
                        INTERFACE_PROPERTY_KEYS.join(", ")
                    ),
                );
            }
        }
        Action::RenameMember { from, to } => {
            let index = instance.member_index();
            match index.get(from.as_str()) {
                Some(slot) => {
                    if let Some(member) = instance.member_name_mut(*slot) {
                        member.def = to.clone();
                    }
                }
                None => diags.report(
                    source.clone(),
                    format!("unknown rename target '{}'", from),
                ),
            }
        }
        Action::Global(_) => unreachable!("broadcast markers are unwrapped before dispatch"),
    }
}

fn execute_callback(
    action: &Action,
    source: &SourceRef,
    instance: &mut Callback,
    diags: &mut Diagnostics,
) {
    match action {
        Action::SetProperty { key, value } => {
            if let Some(set) = callback_property(key) {
                set(instance, value);
            } else {
                diags.report(
                    source.clone(),
                    format!(
                        "unknown property '{}', valid are: {}",
                        key,
                        CALLBACK_PROPERTY_KEYS.join(", ")
                    ),
                );
            }
        }
        Action::RenameMember { .. } => diags.report(
            source.clone(),
            "callback doesn't have any attributes or methods that can be renamed",
        ),
        Action::Global(_) => unreachable!("broadcast markers are unwrapped before dispatch"),
    }
}

fn execute_dictionary(
    action: &Action,
    source: &SourceRef,
    instance: &mut Dictionary,
    diags: &mut Diagnostics,
) {
    match action {
        Action::SetProperty { key, value } => {
            if let Some(set) = dictionary_property(key) {
                set(instance, value);
            } else {
                diags.report(
                    source.clone(),
                    format!(
                        "unknown property '{}', valid are: {}",
                        key,
                        DICTIONARY_PROPERTY_KEYS.join(", ")
                    ),
                );
            }
        }
        Action::RenameMember { .. } => diags.report(
            source.clone(),
            "dictionary doesn't have any attributes or methods that can be renamed",
        ),
        Action::Global(_) => unreachable!("broadcast markers are unwrapped before dispatch"),
    }
}

fn execute_enum(
    action: &Action,
    source: &SourceRef,
    instance: &mut Enumeration,
    diags: &mut Diagnostics,
) {
    match action {
        Action::SetProperty { key, value } => {
            if let Some(set) = enum_property(key) {
                set(instance, value);
            } else {
                diags.report(
                    source.clone(),
                    format!(
                        "unknown property '{}', valid are: {}",
                        key,
                        ENUM_PROPERTY_KEYS.join(", ")
                    ),
                );
            }
        }
        Action::RenameMember { from, to } => {
            let index = instance.member_index();
            match index.get(from.as_str()) {
                Some(slot) => {
                    if let Some(member) = instance.member_name_mut(*slot) {
                        member.def = to.clone();
                    }
                }
                None => diags.report(
                    source.clone(),
                    format!("unknown rename target '{}'", from),
                ),
            }
        }
        Action::Global(_) => unreachable!("broadcast markers are unwrapped before dispatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumVariant, IdlType, Method};
    use crate::transform::rule::Selector;
    use regex::Regex;

    fn src(line: u32) -> SourceRef {
        SourceRef::new("rules.md", line)
    }

    fn dom_store() -> SchemaStore {
        SchemaStore::new()
            .interface(Interface::new("HTMLDivElement", "html").method(Method::new("focus")))
            .interface(Interface::new("HTMLAnchorElement", "html").method(Method::new("focus")))
            .interface(Interface::new("SVGElement", "svg").method(Method::new("focus")))
    }

    #[test]
    fn test_pattern_rename_scopes_to_matches() {
        let mut store = dom_store();
        let rule = Rule::new(
            Selector::pattern(
                ElementKind::Interface,
                Regex::new("^HTML.*Element$").unwrap(),
            ),
            Action::global(Action::rename("focus", "grab")),
            src(1),
        );

        let diags = apply(&[rule], &mut store);

        assert!(diags.is_empty());
        assert_eq!(store.interfaces["HTMLDivElement"].methods[0].name.def, "grab");
        assert_eq!(
            store.interfaces["HTMLAnchorElement"].methods[0].name.def,
            "grab"
        );
        assert_eq!(store.interfaces["SVGElement"].methods[0].name.def, "focus");
    }

    #[test]
    fn test_rename_keeps_idl_name() {
        let mut store = dom_store();
        let rule = Rule::new(
            Selector::exact(ElementKind::Interface, "HTMLDivElement"),
            Action::rename("focus", "grab"),
            src(2),
        );

        let diags = apply(&[rule], &mut store);

        assert!(diags.is_empty());
        let method = &store.interfaces["HTMLDivElement"].methods[0];
        assert_eq!(method.name.def, "grab");
        assert_eq!(method.name.idl, "focus");
    }

    #[test]
    fn test_exact_miss_is_reported() {
        let mut store = dom_store();
        let rule = Rule::new(
            Selector::exact(ElementKind::Interface, "HTMLSpanElement"),
            Action::set_property("package", "html"),
            src(3),
        );

        let diags = apply(&[rule], &mut store);

        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.source, src(3));
        assert!(diag.message.contains("unknown interface 'HTMLSpanElement'"));
    }

    #[test]
    fn test_pattern_miss_is_silent() {
        let mut store = dom_store();
        let rule = Rule::new(
            Selector::pattern(ElementKind::Interface, Regex::new("^MathML").unwrap()),
            Action::global(Action::set_property("package", "mathml")),
            src(4),
        );

        let diags = apply(&[rule], &mut store);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_key_reports_and_leaves_target() {
        let mut store = dom_store();
        let before = store.interfaces["HTMLDivElement"].clone();
        let rule = Rule::new(
            Selector::exact(ElementKind::Interface, "HTMLDivElement"),
            Action::set_property("colour", "blue"),
            src(5),
        );

        let diags = apply(&[rule], &mut store);

        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.source, src(5));
        assert!(diag.message.contains("unknown property 'colour'"));
        assert!(diag.message.contains("valid are: name, package"));
        assert_eq!(store.interfaces["HTMLDivElement"], before);
    }

    #[test]
    fn test_unknown_rename_target() {
        let mut store = dom_store();
        let rule = Rule::new(
            Selector::exact(ElementKind::Interface, "SVGElement"),
            Action::rename("blur", "unfocus"),
            src(6),
        );

        let diags = apply(&[rule], &mut store);

        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .next()
            .unwrap()
            .message
            .contains("unknown rename target 'blur'"));
    }

    #[test]
    fn test_rename_on_callback_always_fails() {
        let mut store =
            SchemaStore::new().callback(Callback::new("TimerHandler", "dom"));
        let rule = Rule::new(
            Selector::exact(ElementKind::Callback, "TimerHandler"),
            Action::rename("handleEvent", "run"),
            src(7),
        );

        let diags = apply(&[rule], &mut store);

        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .next()
            .unwrap()
            .message
            .contains("callback doesn't have any attributes or methods"));
    }

    #[test]
    fn test_set_package_and_name() {
        let mut store = dom_store();
        let rules = vec![
            Rule::new(
                Selector::exact(ElementKind::Interface, "SVGElement"),
                Action::set_property("package", "svg2"),
                src(8),
            ),
            Rule::new(
                Selector::exact(ElementKind::Interface, "SVGElement"),
                Action::set_property("name", "SvgElement"),
                src(9),
            ),
        ];

        let diags = apply(&rules, &mut store);

        assert!(diags.is_empty());
        let svg = &store.interfaces["SVGElement"];
        assert_eq!(svg.package, "svg2");
        assert_eq!(svg.name.def, "SvgElement");
        assert_eq!(svg.name.idl, "SVGElement");
    }

    #[test]
    fn test_enum_variant_rename() {
        let mut store = SchemaStore::new().enumeration(
            Enumeration::new("ScrollBehavior", "dom")
                .variant(EnumVariant::new("smooth"))
                .variant(EnumVariant::new("instant")),
        );
        let rule = Rule::new(
            Selector::exact(ElementKind::Enum, "ScrollBehavior"),
            Action::rename("smooth", "Smooth"),
            src(10),
        );

        let diags = apply(&[rule], &mut store);

        assert!(diags.is_empty());
        let e = &store.enums["ScrollBehavior"];
        assert_eq!(e.variants[0].name.def, "Smooth");
        assert_eq!(e.variants[0].value, "smooth");
    }

    #[test]
    fn test_errors_accumulate_across_rules() {
        let mut store = dom_store();
        let rules = vec![
            Rule::new(
                Selector::exact(ElementKind::Interface, "Missing"),
                Action::set_property("package", "x"),
                src(11),
            ),
            Rule::new(
                Selector::exact(ElementKind::Interface, "HTMLDivElement"),
                Action::set_property("bogus", "x"),
                src(12),
            ),
            Rule::new(
                Selector::exact(ElementKind::Interface, "HTMLDivElement"),
                Action::set_property("package", "web"),
                src(13),
            ),
        ];

        let diags = apply(&rules, &mut store);

        // Both problems reported, the valid rule still executed
        assert_eq!(diags.len(), 2);
        assert_eq!(store.interfaces["HTMLDivElement"].package, "web");
    }

    #[test]
    fn test_dictionary_set_property() {
        let mut store = SchemaStore::new().dictionary(
            Dictionary::new("ScrollOptions", "dom")
                .field(crate::ir::DictField::new("behavior", IdlType::string())),
        );
        let rule = Rule::new(
            Selector::exact(ElementKind::Dictionary, "ScrollOptions"),
            Action::set_property("package", "scroll"),
            src(14),
        );

        let diags = apply(&[rule], &mut store);

        assert!(diags.is_empty());
        assert_eq!(store.dictionaries["ScrollOptions"].package, "scroll");
    }
}
