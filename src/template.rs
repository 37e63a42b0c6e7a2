//! Template Compiler
//!
//! Compiles a `<template>` block into an ES module exporting
//! `render(_ctx, _cache)`. Markup is parsed with html5ever; `{{ }}`
//! interpolations and directive values are JavaScript expressions rewritten
//! against the component instance (`_ctx`).
//!
//! Supported: static attributes, `:prop` / `v-bind`, `@event` / `v-on`,
//! `v-if` / `v-else-if` / `v-else`, `v-for`, `v-html`, `v-text`, `<slot>`,
//! `<template>` fragments and components (PascalCase or dashed tags).

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{
    CompilerError, TEMPLATE_DIRECTIVE_ERROR, TEMPLATE_EXPRESSION_ERROR, TEMPLATE_PARSE_ERROR,
};
use crate::expression::{
    is_function_expression, is_member_path, prefix_expression, prefix_statements, CTX,
};
use crate::options::DEFAULT_RUNTIME_MODULE;

/// Attribute name, then an optional `=` with a quoted or bare value.
const ATTR_NAME_PATTERN: &str = r#"[^\s"'<>/=]+"#;
const ATTR_VALUE_PATTERN: &str = r#"(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>/]+))?"#;

lazy_static! {
    static ref INTERP_PLACEHOLDER_RE: Regex = Regex::new(r"__SFC_INTERP_(\d+)__").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref SELF_CLOSING_RE: Regex = Regex::new(&format!(
        r"<([A-Za-z][A-Za-z0-9.-]*)((?:\s+{}{})*)\s*/>",
        ATTR_NAME_PATTERN, ATTR_VALUE_PATTERN
    ))
    .unwrap();
    static ref OPEN_TAG_RE: Regex = Regex::new(&format!(
        r"<([A-Za-z][A-Za-z0-9.-]*)((?:\s+{}{})*)(\s*/?>)",
        ATTR_NAME_PATTERN, ATTR_VALUE_PATTERN
    ))
    .unwrap();
    static ref ATTR_NAME_RE: Regex =
        Regex::new(&format!(r"\s+({}){}", ATTR_NAME_PATTERN, ATTR_VALUE_PATTERN)).unwrap();
    static ref COMPONENT_OPEN_RE: Regex = Regex::new(r"<([A-Z][a-zA-Z0-9.]*)(\s|>)").unwrap();
    static ref FOR_ALIAS_RE: Regex =
        Regex::new(r"^\s*(?:\(([^)]*)\)|(\S+?))\s+(?:in|of)\s+([\s\S]+?)\s*$").unwrap();
    static ref IDENT_RE: Regex = Regex::new(r"[A-Za-z_$][\w$]*").unwrap();

    /// html5ever lowercases attribute names; SVG needs these back in camelCase.
    static ref SVG_ATTR_CASE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("viewbox", "viewBox");
        m.insert("preserveaspectratio", "preserveAspectRatio");
        m.insert("gradienttransform", "gradientTransform");
        m.insert("gradientunits", "gradientUnits");
        m.insert("patterntransform", "patternTransform");
        m.insert("patternunits", "patternUnits");
        m.insert("stddeviation", "stdDeviation");
        m.insert("textlength", "textLength");
        m.insert("markerwidth", "markerWidth");
        m.insert("markerheight", "markerHeight");
        m.insert("refx", "refX");
        m.insert("refy", "refY");
        m.insert("clippathunits", "clipPathUnits");
        m
    };
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const ORIG_NAME_ATTR: &str = "data-sfc-orig-name";
const ORIG_ATTRS_ATTR: &str = "data-sfc-orig-attrs";

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
    pub source: &'a str,
    pub filename: &'a str,
    pub id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// Module code declaring `render`.
    pub code: String,
}

pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, input: &TemplateInput<'_>) -> Result<CompiledTemplate, CompilerError>;
}

#[derive(Debug, Clone)]
pub struct RenderFunctionCompiler {
    runtime_module: String,
}

impl RenderFunctionCompiler {
    pub fn new(runtime_module: impl Into<String>) -> Self {
        RenderFunctionCompiler {
            runtime_module: runtime_module.into(),
        }
    }
}

impl Default for RenderFunctionCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME_MODULE)
    }
}

impl TemplateCompiler for RenderFunctionCompiler {
    fn compile(&self, input: &TemplateInput<'_>) -> Result<CompiledTemplate, CompilerError> {
        compile_template(input.source, input.filename, &self.runtime_module)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREPROCESSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Replace `{{ expr }}` with placeholders so html5ever never sees the
/// expression text (which may contain `<`).
fn normalize_interpolations(
    source: &str,
    file: &str,
) -> Result<(String, HashMap<String, String>), CompilerError> {
    let mut normalized = String::with_capacity(source.len());
    let mut expressions = HashMap::new();
    let mut rest = source;
    let mut consumed = 0;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            return Err(CompilerError::at_offset(
                TEMPLATE_PARSE_ERROR,
                "Interpolation end sign was not found.",
                file,
                source,
                consumed + open,
            ));
        };
        let expr = &rest[open + 2..open + 2 + close];
        let placeholder = format!("__SFC_INTERP_{}__", expressions.len());
        normalized.push_str(&rest[..open]);
        normalized.push_str(&placeholder);
        expressions.insert(placeholder, expr.trim().to_string());

        let advance = open + 2 + close + 2;
        consumed += advance;
        rest = &rest[advance..];
    }
    normalized.push_str(rest);

    Ok((normalized, expressions))
}

/// html5ever treats `<Foo />` as an open tag; close it explicitly.
fn convert_self_closing(html: &str) -> String {
    SELF_CLOSING_RE
        .replace_all(html, |caps: &regex::Captures| {
            let tag = &caps[1];
            let attrs = caps.get(2).map(|m| m.as_str().trim_end()).unwrap_or("");
            if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
                caps[0].to_string()
            } else {
                format!("<{}{}></{}>", tag, attrs, tag)
            }
        })
        .to_string()
}

/// Record the original casing of PascalCase tags before html5ever lowercases them.
fn mark_component_tags(html: &str) -> String {
    COMPONENT_OPEN_RE
        .replace_all(html, |caps: &regex::Captures| {
            format!("<{} {}=\"{}\"{}", &caps[1], ORIG_NAME_ATTR, &caps[1], &caps[2])
        })
        .to_string()
}

/// Record attribute names that carry uppercase letters, which html5ever
/// lowercases. `element_attrs` restores them from the list.
fn mark_attribute_names(html: &str) -> String {
    OPEN_TAG_RE
        .replace_all(html, |caps: &regex::Captures| {
            let attrs = &caps[2];
            let cased: Vec<&str> = ATTR_NAME_RE
                .captures_iter(attrs)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .filter(|name| name.chars().any(|c| c.is_ascii_uppercase()))
                .collect();
            if cased.is_empty() {
                caps[0].to_string()
            } else {
                format!(
                    "<{}{} {}=\"{}\"{}",
                    &caps[1],
                    attrs,
                    ORIG_ATTRS_ATTR,
                    cased.join(" "),
                    &caps[3]
                )
            }
        })
        .to_string()
}

/// Body-level nodes of a parsed document, without the implied wrappers.
fn collect_roots(handle: &Handle, roots: &mut Vec<Handle>) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_roots(child, roots);
            }
        }
        NodeData::Element { name, .. }
            if matches!(&*name.local, "html" | "head" | "body") =>
        {
            for child in handle.children.borrow().iter() {
                collect_roots(child, roots);
            }
        }
        NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        _ => roots.push(handle.clone()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CODE GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_component(tag: &str) -> bool {
    tag.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) || tag.contains('-')
}

fn element_attrs(handle: &Handle) -> Vec<(String, String)> {
    let attrs = match &handle.data {
        NodeData::Element { attrs, .. } => attrs.borrow(),
        _ => return Vec::new(),
    };
    let cased: HashMap<String, &str> = attrs
        .iter()
        .find(|a| &*a.name.local == ORIG_ATTRS_ATTR)
        .map(|a| {
            a.value
                .split_whitespace()
                .map(|name| (name.to_ascii_lowercase(), name))
                .collect()
        })
        .unwrap_or_default();

    attrs
        .iter()
        .filter(|a| &*a.name.local != ORIG_ATTRS_ATTR)
        .map(|a| {
            let local = a.name.local.to_string();
            let name = match &a.name.prefix {
                Some(prefix) => format!("{}:{}", prefix, local),
                None => local,
            };
            let name = match cased.get(&name.to_ascii_lowercase()) {
                Some(orig) => orig.to_string(),
                None => name,
            };
            (name, a.value.to_string())
        })
        .collect()
}

fn has_attr(handle: &Handle, name: &str) -> bool {
    element_attrs(handle).iter().any(|(n, _)| n == name)
}

fn attr_value(handle: &Handle, name: &str) -> Option<String> {
    element_attrs(handle)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v)
}

fn is_blank(handle: &Handle) -> bool {
    match &handle.data {
        NodeData::Text { contents } => contents.borrow().trim().is_empty(),
        NodeData::Comment { .. } => true,
        _ => false,
    }
}

struct RenderGen<'a> {
    file: &'a str,
    interpolations: HashMap<String, String>,
    helpers: BTreeSet<&'static str>,
}

impl<'a> RenderGen<'a> {
    fn helper(&mut self, name: &'static str) -> String {
        self.helpers.insert(name);
        format!("_{}", name)
    }

    fn directive_error(&self, message: String) -> CompilerError {
        CompilerError::new(TEMPLATE_DIRECTIVE_ERROR, &message, self.file, 0, 0)
    }

    /// Put `{{ }}` text back where a placeholder ended up in a static value.
    fn restore_interpolations(&self, value: &str) -> String {
        INTERP_PLACEHOLDER_RE
            .replace_all(value, |caps: &regex::Captures| match self.interpolations.get(&caps[0]) {
                Some(expr) => format!("{{{{ {} }}}}", expr),
                None => caps[0].to_string(),
            })
            .to_string()
    }

    fn expr(&self, source: &str, scope: &HashSet<String>) -> Result<String, CompilerError> {
        prefix_expression(source, scope, self.file)
    }

    fn gen_text(
        &mut self,
        text: &str,
        scope: &HashSet<String>,
    ) -> Result<Option<String>, CompilerError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let text = WHITESPACE_RE.replace_all(text, " ");

        let mut parts = Vec::new();
        let mut last_end = 0;
        for caps in INTERP_PLACEHOLDER_RE.captures_iter(&text) {
            let Some(m) = caps.get(0) else { continue };
            if m.start() > last_end {
                parts.push(js_string(&text[last_end..m.start()]));
            }
            if let Some(expr) = self.interpolations.get(m.as_str()).cloned() {
                let code = self.expr(&expr, scope)?;
                let display = self.helper("toDisplayString");
                parts.push(format!("{}({})", display, code));
            }
            last_end = m.end();
        }
        if last_end < text.len() {
            parts.push(js_string(&text[last_end..]));
        }

        Ok(Some(parts.join(" + ")))
    }

    fn gen_children(
        &mut self,
        children: &[Handle],
        scope: &HashSet<String>,
    ) -> Result<Vec<String>, CompilerError> {
        let mut out = Vec::new();
        let mut i = 0;

        while i < children.len() {
            let child = &children[i];
            match &child.data {
                NodeData::Text { contents } => {
                    let text = contents.borrow().to_string();
                    if let Some(code) = self.gen_text(&text, scope)? {
                        out.push(code);
                    }
                }
                NodeData::Element { .. } => {
                    if has_attr(child, "v-else-if") || has_attr(child, "v-else") {
                        return Err(
                            self.directive_error("v-else/v-else-if has no adjacent v-if.".into())
                        );
                    }

                    if let Some(condition) = attr_value(child, "v-if") {
                        let mut branches =
                            vec![(Some(condition), self.gen_element(child, scope)?)];
                        let mut j = i + 1;
                        while j < children.len() {
                            let next = &children[j];
                            if is_blank(next) {
                                j += 1;
                                continue;
                            }
                            if let Some(cond) = attr_value(next, "v-else-if") {
                                branches.push((Some(cond), self.gen_element(next, scope)?));
                                i = j;
                                j += 1;
                            } else if has_attr(next, "v-else") {
                                branches.push((None, self.gen_element(next, scope)?));
                                i = j;
                                break;
                            } else {
                                break;
                            }
                        }
                        out.push(self.gen_conditional(branches, scope)?);
                    } else {
                        out.push(self.gen_element(child, scope)?);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        Ok(out)
    }

    fn gen_conditional(
        &mut self,
        branches: Vec<(Option<String>, String)>,
        scope: &HashSet<String>,
    ) -> Result<String, CompilerError> {
        let mut code = "null".to_string();
        for (condition, node) in branches.into_iter().rev() {
            code = match condition {
                Some(cond) => format!("({}) ? {} : {}", self.expr(&cond, scope)?, node, code),
                None => node,
            };
        }
        Ok(code)
    }

    fn gen_element(
        &mut self,
        handle: &Handle,
        scope: &HashSet<String>,
    ) -> Result<String, CompilerError> {
        let Some(for_expr) = attr_value(handle, "v-for") else {
            return self.gen_element_body(handle, scope);
        };

        let caps = FOR_ALIAS_RE
            .captures(&for_expr)
            .ok_or_else(|| self.directive_error(format!("Invalid v-for expression: {}", for_expr)))?;
        let aliases = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let source = self.expr(&caps[3], scope)?;

        let mut inner_scope = scope.clone();
        for ident in IDENT_RE.find_iter(&aliases) {
            inner_scope.insert(ident.as_str().to_string());
        }
        let body = self.gen_element_body(handle, &inner_scope)?;

        let h = self.helper("h");
        let fragment = self.helper("Fragment");
        let render_list = self.helper("renderList");
        Ok(format!(
            "{}({}, null, {}({}, ({}) => {}))",
            h, fragment, render_list, source, aliases, body
        ))
    }

    fn gen_props(
        &mut self,
        handle: &Handle,
        tag: &str,
        scope: &HashSet<String>,
    ) -> Result<Vec<String>, CompilerError> {
        let mut props = Vec::new();

        for (name, value) in element_attrs(handle) {
            match name.as_str() {
                ORIG_NAME_ATTR | "v-if" | "v-else-if" | "v-else" | "v-for" => continue,
                "v-bind" => {
                    props.push(format!("...({})", self.expr(&value, scope)?));
                    continue;
                }
                "v-html" => {
                    props.push(format!("innerHTML: {}", self.expr(&value, scope)?));
                    continue;
                }
                "v-text" => {
                    let display = self.helper("toDisplayString");
                    props.push(format!(
                        "textContent: {}({})",
                        display,
                        self.expr(&value, scope)?
                    ));
                    continue;
                }
                _ => {}
            }

            if let Some(arg) = name.strip_prefix(':').or_else(|| name.strip_prefix("v-bind:")) {
                props.push(format!("{}: {}", js_string(arg), self.expr(&value, scope)?));
            } else if let Some(event) = name.strip_prefix('@').or_else(|| name.strip_prefix("v-on:"))
            {
                if event.contains('.') {
                    return Err(self.directive_error(format!(
                        "Event modifiers are not supported: {}",
                        name
                    )));
                }
                let key = js_string(&format!("on{}", capitalize(event)));
                props.push(format!("{}: {}", key, self.gen_handler(&value, scope)?));
            } else if name.starts_with("v-") || name.starts_with('#') {
                return Err(self.directive_error(format!("Unsupported directive: {}", name)));
            } else {
                let prop_name = SVG_ATTR_CASE_MAP
                    .get(name.as_str())
                    .filter(|_| !is_component(tag))
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| name.clone());
                props.push(format!(
                    "{}: {}",
                    js_string(&prop_name),
                    js_string(&self.restore_interpolations(&value))
                ));
            }
        }

        Ok(props)
    }

    fn gen_handler(&self, value: &str, scope: &HashSet<String>) -> Result<String, CompilerError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CompilerError::new(
                TEMPLATE_EXPRESSION_ERROR,
                "v-on is missing a handler expression.",
                self.file,
                0,
                0,
            ));
        }
        if is_member_path(value) || is_function_expression(value) {
            return self.expr(value, scope);
        }
        let mut handler_scope = scope.clone();
        handler_scope.insert("$event".to_string());
        let body = prefix_statements(value, &handler_scope, self.file)?;
        Ok(format!("($event) => {{ {} }}", body))
    }

    fn gen_element_body(
        &mut self,
        handle: &Handle,
        scope: &HashSet<String>,
    ) -> Result<String, CompilerError> {
        let NodeData::Element {
            name,
            template_contents,
            ..
        } = &handle.data
        else {
            return Ok("null".to_string());
        };

        let tag = attr_value(handle, ORIG_NAME_ATTR).unwrap_or_else(|| name.local.to_string());

        let child_handles: Vec<Handle> = if tag == "template" {
            match template_contents.borrow().as_ref() {
                Some(fragment) => fragment.children.borrow().clone(),
                None => Vec::new(),
            }
        } else {
            handle.children.borrow().clone()
        };
        let children = self.gen_children(&child_handles, scope)?;
        let children_array = format!("[{}]", children.join(", "));

        if tag == "slot" {
            let slot_name = attr_value(handle, "name").unwrap_or_else(|| "default".to_string());
            let slot = format!("{}.$slots[{}]", CTX, js_string(&slot_name));
            let fallback = if children.is_empty() {
                "null".to_string()
            } else {
                children_array
            };
            return Ok(format!("({} ? {}() : {})", slot, slot, fallback));
        }

        let props = self.gen_props(handle, &tag, scope)?;
        let props_code = if props.is_empty() {
            "null".to_string()
        } else {
            format!("{{ {} }}", props.join(", "))
        };

        let h = self.helper("h");

        if tag == "template" {
            let fragment = self.helper("Fragment");
            return Ok(format!("{}({}, null, {})", h, fragment, children_array));
        }

        if is_component(&tag) {
            let resolve = self.helper("resolveComponent");
            let target = format!("{}({})", resolve, js_string(&tag));
            return Ok(if children.is_empty() {
                format!("{}({}, {})", h, target, props_code)
            } else {
                format!(
                    "{}({}, {}, {{ default: () => {} }})",
                    h, target, props_code, children_array
                )
            });
        }

        Ok(if children.is_empty() {
            format!("{}({}, {})", h, js_string(&tag), props_code)
        } else {
            format!("{}({}, {}, {})", h, js_string(&tag), props_code, children_array)
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

pub fn compile_template(
    source: &str,
    file: &str,
    runtime_module: &str,
) -> Result<CompiledTemplate, CompilerError> {
    let (normalized, interpolations) = normalize_interpolations(source, file)?;
    let html = mark_attribute_names(&mark_component_tags(&convert_self_closing(&normalized)));

    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| {
            CompilerError::new(
                TEMPLATE_PARSE_ERROR,
                &format!("Failed to parse template: {}", e),
                file,
                0,
                0,
            )
        })?;

    let mut roots = Vec::new();
    collect_roots(&dom.document, &mut roots);

    let mut gen = RenderGen {
        file,
        interpolations,
        helpers: BTreeSet::new(),
    };
    let nodes = gen.gen_children(&roots, &HashSet::new())?;

    let body = match nodes.len() {
        0 => "null".to_string(),
        1 => nodes.into_iter().next().unwrap_or_default(),
        _ => {
            let h = gen.helper("h");
            let fragment = gen.helper("Fragment");
            format!("{}({}, null, [{}])", h, fragment, nodes.join(", "))
        }
    };

    let mut code = String::new();
    if !gen.helpers.is_empty() {
        let imports = gen
            .helpers
            .iter()
            .map(|name| format!("{} as _{}", name, name))
            .collect::<Vec<_>>()
            .join(", ");
        code.push_str(&format!(
            "import {{ {} }} from {}\n",
            imports,
            js_string(runtime_module)
        ));
    }
    code.push_str(&format!(
        "export function render({}, _cache) {{\n  return {}\n}}",
        CTX, body
    ));

    Ok(CompiledTemplate { code })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_interpolations() {
        let (html, exprs) = normalize_interpolations("<p>{{ a < b }} and {{c}}</p>", "t.vue").unwrap();
        assert_eq!(html, "<p>__SFC_INTERP_0__ and __SFC_INTERP_1__</p>");
        assert_eq!(exprs["__SFC_INTERP_0__"], "a < b");
        assert_eq!(exprs["__SFC_INTERP_1__"], "c");
    }

    #[test]
    fn test_unterminated_interpolation() {
        let err = normalize_interpolations("<p>\n{{ oops</p>", "t.vue").unwrap_err();
        assert_eq!(err.code, TEMPLATE_PARSE_ERROR);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_convert_self_closing() {
        assert_eq!(convert_self_closing("<Button />"), "<Button></Button>");
        assert_eq!(
            convert_self_closing(r#"<my-card title="x"/>"#),
            r#"<my-card title="x"></my-card>"#
        );
        assert_eq!(convert_self_closing("<br/>"), "<br/>");
    }

    #[test]
    fn test_mark_component_tags() {
        assert_eq!(
            mark_component_tags("<Card>x</Card>"),
            r#"<Card data-sfc-orig-name="Card">x</Card>"#
        );
        assert_eq!(mark_component_tags("<div>"), "<div>");
    }

    #[test]
    fn test_convert_self_closing_with_quoted_gt() {
        assert_eq!(
            convert_self_closing(r#"<Icon @click="() => go()" /><span>after</span>"#),
            r#"<Icon @click="() => go()"></Icon><span>after</span>"#
        );
        assert_eq!(
            convert_self_closing("<Cell :show='a > b'/>"),
            "<Cell :show='a > b'></Cell>"
        );
    }

    #[test]
    fn test_mark_attribute_names() {
        assert_eq!(
            mark_attribute_names(r#"<my-card :cardTitle="t" @click="go">"#),
            r#"<my-card :cardTitle="t" @click="go" data-sfc-orig-attrs=":cardTitle">"#
        );
        assert_eq!(
            mark_attribute_names(r#"<p title="Hello World">x</p>"#),
            r#"<p title="Hello World">x</p>"#
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("click"), "Click");
        assert_eq!(capitalize("update:modelValue"), "Update:modelValue");
    }
}
