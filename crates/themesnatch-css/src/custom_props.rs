//! Global custom properties (`--name: value`) declared in stylesheets.
//!
//! Only rules whose selector list targets the document scope are read:
//! `:root`, `html`, `body` and `:host`. Declarations inside at-rules
//! (`@media`, `@supports`, ...) are conditional and are not collected.
//!
//! Values that alias another property (`--accent: var(--brand)`) are resolved
//! by [`resolve_custom_properties`], following at most [`MAX_VAR_DEPTH`]
//! links.

use std::collections::HashMap;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};
use tracing::debug;

/// Maximum number of `var()` hops followed while resolving an alias.
pub const MAX_VAR_DEPTH: usize = 8;

const GLOBAL_SELECTORS: [&str; 4] = [":root", "html", "body", ":host"];

/// One custom property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProperty {
    /// Name including the leading `--`.
    pub name: String,
    pub value: String,
}

impl CustomProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        CustomProperty {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parsed `var(--name[, fallback])` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarReference {
    pub name: String,
    pub fallback: Option<String>,
}

/// Collects custom properties declared on global-scope rules, in source order.
///
/// Malformed rules are skipped; the rest of the sheet is still read.
pub fn global_custom_properties(css: &str) -> Vec<CustomProperty> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = GlobalRuleParser;

    let mut properties = Vec::new();
    for result in cssparser::StyleSheetParser::new(&mut parser, &mut rules) {
        match result {
            Ok(declarations) => properties.extend(declarations),
            Err((err, slice)) => {
                debug!(rule = slice, error = ?err.kind, "skipping stylesheet rule");
            }
        }
    }
    properties
}

/// Parses a value that is exactly one `var()` call.
pub fn parse_var_reference(value: &str) -> Option<VarReference> {
    let mut input = ParserInput::new(value.trim());
    let mut parser = Parser::new(&mut input);
    parser
        .parse_entirely(|p| {
            p.expect_function_matching("var")?;
            p.parse_nested_block(|p| {
                let name = p.expect_ident()?.as_ref().to_string();
                if !name.starts_with("--") {
                    return Err(p.new_custom_error::<(), ()>(()));
                }
                let fallback = if p.is_exhausted() {
                    None
                } else {
                    p.expect_comma()?;
                    let start = p.position();
                    while p.next_including_whitespace_and_comments().is_ok() {}
                    Some(p.slice_from(start).trim().to_string())
                };
                Ok(VarReference { name, fallback })
            })
        })
        .ok()
}

/// Replaces `var()` aliases with the values they point at.
///
/// Later declarations of the same name win. Output keeps the order in which
/// names first appear. Properties whose alias chain is broken, cyclic, or
/// longer than [`MAX_VAR_DEPTH`] are dropped.
pub fn resolve_custom_properties(properties: &[CustomProperty]) -> Vec<CustomProperty> {
    let mut order: Vec<&str> = Vec::new();
    let mut values: HashMap<&str, &str> = HashMap::new();
    for prop in properties {
        if values.insert(prop.name.as_str(), prop.value.as_str()).is_none() {
            order.push(prop.name.as_str());
        }
    }

    order
        .into_iter()
        .filter_map(|name| {
            let resolved = resolve_value(values.get(name)?, &values, 0);
            if resolved.is_none() {
                debug!(property = name, "unresolved custom property alias");
            }
            resolved.map(|value| CustomProperty::new(name, value))
        })
        .collect()
}

fn resolve_value(value: &str, values: &HashMap<&str, &str>, depth: usize) -> Option<String> {
    let Some(reference) = parse_var_reference(value) else {
        return Some(value.trim().to_string());
    };
    if depth >= MAX_VAR_DEPTH {
        return None;
    }
    match values.get(reference.name.as_str()) {
        Some(target) => resolve_value(target, values, depth + 1),
        None => reference
            .fallback
            .and_then(|fallback| resolve_value(&fallback, values, depth + 1)),
    }
}

// ─── cssparser plumbing ─────────────────────────────────────────────────────

struct GlobalRuleParser;

impl<'i> QualifiedRuleParser<'i> for GlobalRuleParser {
    type Prelude = ();
    type QualifiedRule = Vec<CustomProperty>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let is_global = input
            .slice_from(start)
            .split(',')
            .any(|selector| {
                let selector = selector.trim();
                GLOBAL_SELECTORS
                    .iter()
                    .any(|global| selector.eq_ignore_ascii_case(global))
            });

        if is_global {
            Ok(())
        } else {
            Err(input.new_custom_error(()))
        }
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut declarations = CustomPropertyParser;
        let body = RuleBodyParser::new(input, &mut declarations);
        Ok(body.flatten().flatten().collect())
    }
}

impl<'i> AtRuleParser<'i> for GlobalRuleParser {
    type Prelude = ();
    type AtRule = Vec<CustomProperty>;
    type Error = ();
}

struct CustomPropertyParser;

impl<'i> DeclarationParser<'i> for CustomPropertyParser {
    type Declaration = Option<CustomProperty>;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        if !name.starts_with("--") {
            return Ok(None);
        }

        let raw = input.slice_from(start).trim();
        let value = strip_important(raw).trim();
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(CustomProperty::new(name.as_ref(), value)))
    }
}

impl<'i> AtRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type AtRule = Option<CustomProperty>;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type QualifiedRule = Option<CustomProperty>;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Option<CustomProperty>, ()> for CustomPropertyParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) if lower[idx..].trim() == "!important" => &value[..idx],
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(props: &[CustomProperty]) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    // =========================================================================
    // Stylesheet reading
    // =========================================================================

    #[test]
    fn test_reads_root_declarations() {
        let css = r#"
            :root {
                --brand-primary: #3366ff;
                --spacing: 8px;
                color: red;
            }
        "#;
        let props = global_custom_properties(css);
        assert_eq!(
            props,
            vec![
                CustomProperty::new("--brand-primary", "#3366ff"),
                CustomProperty::new("--spacing", "8px"),
            ]
        );
    }

    #[test]
    fn test_reads_all_global_scopes() {
        let css = "html { --a: 1px } body { --b: 2px } :host { --c: 3px } .card { --d: 4px }";
        assert_eq!(
            names(&global_custom_properties(css)),
            vec!["--a", "--b", "--c"]
        );
    }

    #[test]
    fn test_selector_list_with_global_member() {
        let css = ".theme, :root { --bg: #fafafa; }";
        assert_eq!(names(&global_custom_properties(css)), vec!["--bg"]);
    }

    #[test]
    fn test_skips_at_rules_and_bad_rules() {
        let css = r#"
            @media (prefers-color-scheme: dark) { :root { --bg: #000; } }
            .card { --card: #eeeeee; }
            :root { --fg: #111111 }
        "#;
        let props = global_custom_properties(css);
        assert_eq!(names(&props), vec!["--fg"]);
    }

    #[test]
    fn test_strips_important() {
        let props = global_custom_properties(":root { --x: #123456 !important; }");
        assert_eq!(props, vec![CustomProperty::new("--x", "#123456")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(global_custom_properties("").is_empty());
    }

    // =========================================================================
    // var() references
    // =========================================================================

    #[test]
    fn test_parse_var_reference() {
        assert_eq!(
            parse_var_reference("var(--brand)"),
            Some(VarReference {
                name: "--brand".into(),
                fallback: None
            })
        );
        assert_eq!(
            parse_var_reference("var(--brand, #fff)"),
            Some(VarReference {
                name: "--brand".into(),
                fallback: Some("#fff".into())
            })
        );
        assert_eq!(parse_var_reference("#fff"), None);
        assert_eq!(parse_var_reference("var(brand)"), None);
        assert_eq!(parse_var_reference("calc(var(--a) * 2)"), None);
    }

    #[test]
    fn test_resolve_aliases() {
        let props = vec![
            CustomProperty::new("--blue", "#3366ff"),
            CustomProperty::new("--primary", "var(--blue)"),
            CustomProperty::new("--link", "var(--primary)"),
            CustomProperty::new("--missing", "var(--nope, #ff0000)"),
            CustomProperty::new("--broken", "var(--nope)"),
        ];
        let resolved = resolve_custom_properties(&props);
        assert_eq!(
            resolved,
            vec![
                CustomProperty::new("--blue", "#3366ff"),
                CustomProperty::new("--primary", "#3366ff"),
                CustomProperty::new("--link", "#3366ff"),
                CustomProperty::new("--missing", "#ff0000"),
            ]
        );
    }

    #[test]
    fn test_resolve_later_declaration_wins() {
        let props = vec![
            CustomProperty::new("--bg", "#ffffff"),
            CustomProperty::new("--fg", "#000000"),
            CustomProperty::new("--bg", "#fafafa"),
        ];
        let resolved = resolve_custom_properties(&props);
        assert_eq!(names(&resolved), vec!["--bg", "--fg"]);
        assert_eq!(resolved[0].value, "#fafafa");
    }

    #[test]
    fn test_resolve_cycle_is_dropped() {
        let props = vec![
            CustomProperty::new("--a", "var(--b)"),
            CustomProperty::new("--b", "var(--a)"),
            CustomProperty::new("--c", "#101010"),
        ];
        assert_eq!(names(&resolve_custom_properties(&props)), vec!["--c"]);
    }
}
