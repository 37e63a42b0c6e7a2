//! Script block compilation.
//!
//! A plain `<script>` passes through. A `<script setup>` body becomes the
//! `setup()` function of the component options, returning every top-level
//! binding so the render function can reach it. When both blocks exist, the
//! plain block's default export is extended with that `setup()`.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingIdentifier, Declaration, IdentifierReference, ImportDeclarationSpecifier, Statement,
    TSClassImplements, TSInterfaceDeclaration, TSType, TSTypeAliasDeclaration,
};
use oxc_ast_visit::Visit;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{GetSpan, SourceType};
use oxc_transformer::{TransformOptions, Transformer};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use crate::descriptor::SfcDescriptor;
use crate::error::{CompilerError, SCRIPT_PARSE_ERROR, SCRIPT_TRANSFORM_ERROR};
use crate::rewrite::rewrite_default;

lazy_static! {
    static ref TEMPLATE_IDENT_RE: Regex = Regex::new(r"[A-Za-z_$][\w$]*").unwrap();
}

/// Local the plain script's default export is bound to when merged with setup.
const DEFAULT_LOCAL: &str = "__default__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScript {
    /// ES module source with a default export.
    pub content: String,
    /// Top-level bindings exposed from `<script setup>`, in declaration order.
    pub bindings: Vec<String>,
}

pub trait ScriptCompiler: Send + Sync {
    /// Compile the script blocks of `descriptor`. Only called when the
    /// descriptor has a plain or setup script.
    fn compile(&self, descriptor: &SfcDescriptor) -> Result<CompiledScript, CompilerError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SetupScriptCompiler;

impl ScriptCompiler for SetupScriptCompiler {
    fn compile(&self, descriptor: &SfcDescriptor) -> Result<CompiledScript, CompilerError> {
        compile_script(descriptor)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SETUP ANALYSIS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct BindingNames {
    names: Vec<String>,
}

impl<'a> Visit<'a> for BindingNames {
    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.push(ident.name.to_string());
    }
}

/// Identifiers read in value position. Type annotations and declarations
/// are not walked.
#[derive(Default)]
struct ValueReferences {
    names: HashSet<String>,
}

impl<'a> Visit<'a> for ValueReferences {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_ts_type(&mut self, _ty: &TSType<'a>) {}

    fn visit_ts_interface_declaration(&mut self, _decl: &TSInterfaceDeclaration<'a>) {}

    fn visit_ts_type_alias_declaration(&mut self, _decl: &TSTypeAliasDeclaration<'a>) {}

    fn visit_ts_class_implements(&mut self, _implements: &TSClassImplements<'a>) {}
}

fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether the template mentions `name` as an identifier or as a kebab-case tag.
fn used_in_template(name: &str, template: &str) -> bool {
    TEMPLATE_IDENT_RE
        .find_iter(template)
        .any(|m| m.as_str() == name)
        || (name.chars().any(|c| c.is_ascii_uppercase())
            && template.contains(&format!("<{}", hyphenate(name))))
}

struct SetupParts {
    imports: Vec<String>,
    body: Vec<String>,
    bindings: Vec<String>,
}

fn source_type(typescript: bool) -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(typescript)
}

/// Split a setup body into hoisted imports, the `setup()` body and the names
/// it returns. In TypeScript an import that is only used as a type is not
/// returned, since type stripping elides it.
fn split_setup(
    content: &str,
    typescript: bool,
    template: Option<&str>,
    file: &str,
) -> Result<SetupParts, CompilerError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, content, source_type(typescript)).parse();
    if let Some(error) = ret.errors.first() {
        return Err(CompilerError::new(
            SCRIPT_PARSE_ERROR,
            &format!("Failed to parse <script setup>: {}", error),
            file,
            0,
            0,
        ));
    }

    let mut parts = SetupParts {
        imports: Vec::new(),
        body: Vec::new(),
        bindings: Vec::new(),
    };
    let text = |span: oxc_span::Span| content[span.start as usize..span.end as usize].to_string();
    let mut imported = Vec::new();

    for stmt in &ret.program.body {
        match stmt {
            Statement::ImportDeclaration(import) => {
                parts.imports.push(text(import.span));
                if import.import_kind.is_type() {
                    continue;
                }
                for specifier in import.specifiers.iter().flatten() {
                    match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => {
                            if !s.import_kind.is_type() {
                                imported.push(s.local.name.to_string());
                            }
                        }
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            imported.push(s.local.name.to_string())
                        }
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            imported.push(s.local.name.to_string())
                        }
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                return Err(CompilerError::at_offset(
                    SCRIPT_PARSE_ERROR,
                    "<script setup> cannot contain ES module exports.",
                    file,
                    content,
                    decl.span.start as usize,
                ));
            }
            Statement::ExportNamedDeclaration(decl) => {
                let type_only = matches!(
                    decl.declaration,
                    Some(Declaration::TSTypeAliasDeclaration(_))
                        | Some(Declaration::TSInterfaceDeclaration(_))
                );
                if !type_only {
                    return Err(CompilerError::at_offset(
                        SCRIPT_PARSE_ERROR,
                        "<script setup> cannot contain ES module exports.",
                        file,
                        content,
                        decl.span.start as usize,
                    ));
                }
                // Exported types stay at module level.
                parts.imports.push(text(decl.span));
            }
            Statement::VariableDeclaration(var_decl) => {
                let mut names = BindingNames::default();
                for decl in &var_decl.declarations {
                    names.visit_binding_pattern(&decl.id);
                }
                parts.bindings.extend(names.names);
                parts.body.push(text(var_decl.span));
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    parts.bindings.push(id.name.to_string());
                }
                parts.body.push(text(func.span));
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    parts.bindings.push(id.name.to_string());
                }
                parts.body.push(text(class.span));
            }
            other => parts.body.push(text(other.span())),
        }
    }

    if typescript {
        let mut refs = ValueReferences::default();
        refs.visit_program(&ret.program);
        imported.retain(|name| {
            refs.names.contains(name)
                || template.is_some_and(|template| used_in_template(name, template))
        });
    }
    imported.extend(parts.bindings);
    parts.bindings = imported;

    Ok(parts)
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILATION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn compile_script(descriptor: &SfcDescriptor) -> Result<CompiledScript, CompilerError> {
    let file = descriptor.filename.as_str();
    let typescript = descriptor
        .script
        .iter()
        .chain(descriptor.script_setup.iter())
        .any(|block| block.is_typescript());

    let Some(setup) = &descriptor.script_setup else {
        let content = descriptor
            .script
            .as_ref()
            .map(|s| s.content.clone())
            .unwrap_or_default();
        let content = if typescript {
            strip_typescript(&content, file)?
        } else {
            content
        };
        return Ok(CompiledScript {
            content,
            bindings: Vec::new(),
        });
    };

    let template = descriptor.template.as_ref().map(|t| t.content.as_str());
    let parts = split_setup(&setup.content, typescript, template, file)?;

    let mut code = Vec::new();
    code.extend(parts.imports.iter().cloned());

    let setup_fn = format!(
        "setup(__props, {{ expose: __expose }}) {{\n__expose();\n{}\nreturn {{ {} }}\n}}",
        parts.body.join("\n"),
        parts.bindings.join(", ")
    );

    match &descriptor.script {
        Some(script) => {
            code.push(rewrite_default(&script.content, DEFAULT_LOCAL, file)?);
            code.push(format!(
                "export default /*#__PURE__*/Object.assign({}, {{\n{}\n}})",
                DEFAULT_LOCAL, setup_fn
            ));
        }
        None => code.push(format!("export default {{\n{}\n}}", setup_fn)),
    }

    let content = code.join("\n");
    let content = if typescript {
        strip_typescript(&content, file)?
    } else {
        content
    };

    Ok(CompiledScript {
        content,
        bindings: parts.bindings,
    })
}

/// Remove TypeScript syntax, leaving plain ES module code.
pub fn strip_typescript(code: &str, file: &str) -> Result<String, CompilerError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, source_type(true)).parse();
    if let Some(error) = ret.errors.first() {
        return Err(CompilerError::new(
            SCRIPT_PARSE_ERROR,
            &format!("Failed to parse script: {}", error),
            file,
            0,
            0,
        ));
    }

    let mut program = ret.program;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let options = TransformOptions::default();
    let transformed = Transformer::new(&allocator, Path::new(file), &options)
        .build_with_scoping(scoping, &mut program);
    if let Some(error) = transformed.errors.first() {
        return Err(CompilerError::new(
            SCRIPT_TRANSFORM_ERROR,
            &format!("Failed to strip types: {}", error),
            file,
            0,
            0,
        ));
    }

    Ok(Codegen::new().build(&program).code)
}
