//! Template expression rewriting.
//!
//! Template expressions are evaluated against the component instance, so every
//! free identifier is qualified with `_ctx.`. Identifiers bound inside the
//! expression (arrow/function params and locals), aliases introduced by the
//! template itself (`v-for` items, `$event`) and well-known globals are left
//! untouched.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, BindingIdentifier, Expression, Function, IdentifierReference,
    ObjectProperty,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::SourceType;
use oxc_syntax::scope::ScopeFlags;
use std::collections::HashSet;

use crate::error::{CompilerError, TEMPLATE_EXPRESSION_ERROR};

pub const CTX: &str = "_ctx";

lazy_static! {
    pub static ref TEMPLATE_GLOBALS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("Math");
        s.insert("console");
        s.insert("JSON");
        s.insert("Date");
        s.insert("String");
        s.insert("Number");
        s.insert("Boolean");
        s.insert("Array");
        s.insert("Object");
        s.insert("Promise");
        s.insert("Map");
        s.insert("Set");
        s.insert("RegExp");
        s.insert("BigInt");
        s.insert("Intl");
        s.insert("Error");
        s.insert("undefined");
        s.insert("NaN");
        s.insert("Infinity");
        s.insert("parseInt");
        s.insert("parseFloat");
        s.insert("isNaN");
        s.insert("isFinite");
        s.insert("encodeURI");
        s.insert("encodeURIComponent");
        s.insert("decodeURI");
        s.insert("decodeURIComponent");
        s.insert("arguments");
        s.insert("require");
        s
    };
}

/// Collects every name bound anywhere inside the visited node.
#[derive(Default)]
struct BindingCollector {
    names: HashSet<String>,
}

impl<'a> Visit<'a> for BindingCollector {
    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.insert(ident.name.to_string());
    }
}

struct ContextPrefixer<'s> {
    locals: &'s HashSet<String>,
    scopes: Vec<HashSet<String>>,
    replacements: Vec<(u32, u32, String)>,
}

impl<'s> ContextPrefixer<'s> {
    fn new(locals: &'s HashSet<String>) -> Self {
        ContextPrefixer {
            locals,
            scopes: Vec::new(),
            replacements: Vec::new(),
        }
    }

    fn needs_prefix(&self, name: &str) -> bool {
        !(self.locals.contains(name)
            || TEMPLATE_GLOBALS.contains(name)
            || self.scopes.iter().any(|s| s.contains(name)))
    }

    fn apply(mut self, source: &str) -> String {
        self.replacements.sort_by(|a, b| b.0.cmp(&a.0));
        let mut result = source.to_string();
        for (start, end, replacement) in self.replacements {
            result.replace_range((start as usize)..(end as usize), &replacement);
        }
        result
    }
}

impl<'a> Visit<'a> for ContextPrefixer<'_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        let name = ident.name.as_str();
        if self.needs_prefix(name) {
            self.replacements
                .push((ident.span.start, ident.span.end, format!("{}.{}", CTX, name)));
        }
    }

    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        // `{ a }` must become `{ a: _ctx.a }`, not `{ _ctx.a }`.
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                let name = ident.name.as_str();
                if self.needs_prefix(name) {
                    self.replacements.push((
                        ident.span.start,
                        ident.span.end,
                        format!("{}: {}.{}", name, CTX, name),
                    ));
                }
                return;
            }
        }
        walk::walk_object_property(self, prop);
    }

    fn visit_arrow_function_expression(&mut self, func: &ArrowFunctionExpression<'a>) {
        let mut bound = BindingCollector::default();
        bound.visit_arrow_function_expression(func);
        self.scopes.push(bound.names);
        walk::walk_arrow_function_expression(self, func);
        self.scopes.pop();
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        let mut bound = BindingCollector::default();
        bound.visit_function(func, flags);
        self.scopes.push(bound.names);
        walk::walk_function(self, func, flags);
        self.scopes.pop();
    }
}

fn expression_error(message: String, source: &str, file: &str) -> CompilerError {
    CompilerError::with_details(
        TEMPLATE_EXPRESSION_ERROR,
        &message,
        file,
        0,
        0,
        Some(source.to_string()),
        vec![],
    )
}

/// Qualify free identifiers of a single expression.
pub fn prefix_expression(
    source: &str,
    locals: &HashSet<String>,
    file: &str,
) -> Result<String, CompilerError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let expr = Parser::new(&allocator, source, source_type)
        .parse_expression()
        .map_err(|errors| {
            let message = errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "invalid expression".to_string());
            expression_error(
                format!("Error parsing template expression: {}", message),
                source,
                file,
            )
        })?;

    let mut prefixer = ContextPrefixer::new(locals);
    prefixer.visit_expression(&expr);
    Ok(prefixer.apply(source))
}

/// Qualify free identifiers of a statement list (inline event handlers such
/// as `count++; notify()`).
pub fn prefix_statements(
    source: &str,
    locals: &HashSet<String>,
    file: &str,
) -> Result<String, CompilerError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true);
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(expression_error(
            format!("Error parsing template statement: {}", error),
            source,
            file,
        ));
    }

    let mut prefixer = ContextPrefixer::new(locals);
    prefixer.visit_program(&ret.program);
    Ok(prefixer.apply(source))
}

/// `true` for `foo`, `foo.bar`, `foo['bar']`: handlers that can be passed by reference.
pub fn is_member_path(source: &str) -> bool {
    lazy_static! {
        static ref MEMBER_PATH_RE: regex::Regex = regex::Regex::new(
            r#"^\s*[A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*|\[[^\]]+\])*\s*$"#
        )
        .unwrap();
    }
    MEMBER_PATH_RE.is_match(source)
}

/// `true` for arrow functions and function expressions.
pub fn is_function_expression(source: &str) -> bool {
    lazy_static! {
        static ref FN_EXPR_RE: regex::Regex = regex::Regex::new(
            r#"^\s*(?:async\s+)?(?:[\w$]+|\([^)]*?\))\s*=>|^\s*(?:async\s+)?function\b"#
        )
        .unwrap();
    }
    FN_EXPR_RE.is_match(source)
}
