//! Default-export rewriting.
//!
//! Turns a module's default export into a local binding so more code can be
//! appended to the component object before it is exported. Works on the AST,
//! so an `export default` inside a string or comment is never touched.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ExportDefaultDeclarationKind, ModuleExportName, Statement};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::error::{CompilerError, SCRIPT_PARSE_ERROR};

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

/// Rewrite the default export of `code` into `const <as_name> = ...`.
///
/// A module without a default export gets `const <as_name> = {}` appended.
pub fn rewrite_default(code: &str, as_name: &str, file: &str) -> Result<String, CompilerError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, code, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(CompilerError::new(
            SCRIPT_PARSE_ERROR,
            &format!("Failed to parse script: {}", error),
            file,
            0,
            0,
        ));
    }

    let mut replacements: Vec<(u32, u32, String)> = Vec::new();
    let mut prepended: Vec<String> = Vec::new();
    let mut appended: Vec<String> = Vec::new();
    let mut found = false;

    for stmt in &ret.program.body {
        match stmt {
            Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) if func.id.is_some() => {
                    // Keep the named declaration, bind it afterwards.
                    replacements.push((decl.span.start, func.span.start, String::new()));
                    if let Some(id) = &func.id {
                        appended.push(format!("const {} = {}", as_name, id.name));
                    }
                    found = true;
                }
                ExportDefaultDeclarationKind::ClassDeclaration(class) if class.id.is_some() => {
                    replacements.push((decl.span.start, class.span.start, String::new()));
                    if let Some(id) = &class.id {
                        appended.push(format!("const {} = {}", as_name, id.name));
                    }
                    found = true;
                }
                ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {}
                kind => {
                    replacements.push((
                        decl.span.start,
                        kind.span().start,
                        format!("const {} = ", as_name),
                    ));
                    found = true;
                }
            },
            Statement::ExportNamedDeclaration(decl) => {
                let Some(default_spec) = decl
                    .specifiers
                    .iter()
                    .find(|s| export_name(&s.exported) == "default")
                else {
                    continue;
                };
                found = true;
                let local = export_name(&default_spec.local);

                match &decl.source {
                    // export { default } from './x'  /  export { foo as default } from './x'
                    Some(source) => {
                        let source_text = &code[source.span.start as usize..source.span.end as usize];
                        prepended.push(format!(
                            "import {{ {} as {} }} from {}",
                            local, as_name, source_text
                        ));
                    }
                    None => appended.push(format!("const {} = {}", as_name, local)),
                }

                let remaining: Vec<&str> = decl
                    .specifiers
                    .iter()
                    .filter(|s| s.span != default_spec.span)
                    .map(|s| &code[s.span.start as usize..s.span.end as usize])
                    .collect();
                let rebuilt = if remaining.is_empty() {
                    String::new()
                } else {
                    let from = decl
                        .source
                        .as_ref()
                        .map(|s| {
                            format!(" from {}", &code[s.span.start as usize..s.span.end as usize])
                        })
                        .unwrap_or_default();
                    format!("export {{ {} }}{}", remaining.join(", "), from)
                };
                replacements.push((decl.span.start, decl.span.end, rebuilt));
            }
            _ => {}
        }
    }

    replacements.sort_by(|a, b| b.0.cmp(&a.0));
    let mut result = code.to_string();
    for (start, end, replacement) in replacements {
        result.replace_range((start as usize)..(end as usize), &replacement);
    }

    if !found {
        appended.push(format!("const {} = {{}}", as_name));
    }

    let mut parts = prepended;
    parts.push(result);
    parts.extend(appended);
    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(code: &str) -> String {
        rewrite_default(code, "_sfc_main", "t.vue").unwrap()
    }

    #[test]
    fn test_object_literal() {
        assert_eq!(
            rewrite("export default { data() {} }"),
            "const _sfc_main = { data() {} }"
        );
    }

    #[test]
    fn test_call_expression() {
        let out = rewrite("import { defineComponent } from 'vue'\nexport default defineComponent({})");
        assert!(out.contains("const _sfc_main = defineComponent({})"));
        assert!(!out.contains("export default"));
    }

    #[test]
    fn test_named_function() {
        let out = rewrite("export default function setup() {}");
        assert_eq!(out, "function setup() {}\nconst _sfc_main = setup");
    }

    #[test]
    fn test_anonymous_class() {
        assert_eq!(rewrite("export default class {}"), "const _sfc_main = class {}");
    }

    #[test]
    fn test_specifier_export() {
        let out = rewrite("const a = {}\nconst b = 1\nexport { b, a as default }");
        assert_eq!(out, "const a = {}\nconst b = 1\nexport { b }\nconst _sfc_main = a");
    }

    #[test]
    fn test_reexport() {
        let out = rewrite("export { default } from './impl.js'");
        assert_eq!(out, "import { default as _sfc_main } from './impl.js'\n");
    }

    #[test]
    fn test_no_default_export() {
        assert_eq!(rewrite("export const x = 1"), "export const x = 1\nconst _sfc_main = {}");
    }

    #[test]
    fn test_strings_and_comments_untouched() {
        let code = "// export default nothing\nconst s = 'export default'\nexport default { s }";
        let out = rewrite(code);
        assert!(out.contains("// export default nothing"));
        assert!(out.contains("const s = 'export default'"));
        assert!(out.ends_with("const _sfc_main = { s }"));
    }

    #[test]
    fn test_parse_error() {
        let err = rewrite_default("export default {", "_sfc_main", "t.vue").unwrap_err();
        assert_eq!(err.code, SCRIPT_PARSE_ERROR);
    }
}
