//! Module Assembler
//!
//! Joins the compiled blocks of one component into a single ES module:
//!
//! ```text
//! import "<file>?type=style&index=0&lang=css"   (one per style block)
//! <render function>
//! <script with its default export bound to _sfc_main>
//! _sfc_main.render = render
//! _sfc_main.__scopeId = "data-v-<id>"          (scoped styles only)
//! export default _sfc_main
//! ```
//!
//! Later lines reference names declared by earlier ones, so the order is fixed.

use std::sync::Arc;

use crate::descriptor::SfcDescriptor;
use crate::error::CompilerError;
use crate::options::DEFAULT_RUNTIME_MODULE;
use crate::request::style_request_id;
use crate::rewrite::rewrite_default;
use crate::script::{ScriptCompiler, SetupScriptCompiler};
use crate::style::{ScopedCssCompiler, StyleCompiler};
use crate::template::{RenderFunctionCompiler, TemplateCompiler, TemplateInput};

/// Local the component options object is bound to.
pub const COMPONENT_LOCAL: &str = "_sfc_main";

const EMPTY_RENDER: &str = "function render() { return null }";
const DEFAULT_STYLE_LANG: &str = "css";

/// The three block compilers a plugin delegates to.
#[derive(Clone)]
pub struct Compilers {
    pub script: Arc<dyn ScriptCompiler>,
    pub template: Arc<dyn TemplateCompiler>,
    pub style: Arc<dyn StyleCompiler>,
}

impl Compilers {
    /// Built-in compilers, with render helpers imported from `runtime_module`.
    pub fn builtin(runtime_module: &str) -> Self {
        Compilers {
            script: Arc::new(SetupScriptCompiler),
            template: Arc::new(RenderFunctionCompiler::new(runtime_module)),
            style: Arc::new(ScopedCssCompiler),
        }
    }

    pub fn with_script(mut self, compiler: Arc<dyn ScriptCompiler>) -> Self {
        self.script = compiler;
        self
    }

    pub fn with_template(mut self, compiler: Arc<dyn TemplateCompiler>) -> Self {
        self.template = compiler;
        self
    }

    pub fn with_style(mut self, compiler: Arc<dyn StyleCompiler>) -> Self {
        self.style = compiler;
        self
    }
}

impl Default for Compilers {
    fn default() -> Self {
        Self::builtin(DEFAULT_RUNTIME_MODULE)
    }
}

impl std::fmt::Debug for Compilers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilers").finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK CODEGEN
// ═══════════════════════════════════════════════════════════════════════════════

fn gen_style_imports(descriptor: &SfcDescriptor) -> String {
    descriptor
        .styles
        .iter()
        .enumerate()
        .map(|(i, style)| {
            let lang = style.lang.as_deref().unwrap_or(DEFAULT_STYLE_LANG);
            format!(
                "import \"{}\"",
                style_request_id(&descriptor.filename, i, lang)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn gen_template(
    descriptor: &SfcDescriptor,
    compiler: &dyn TemplateCompiler,
) -> Result<String, CompilerError> {
    let Some(template) = &descriptor.template else {
        return Ok(EMPTY_RENDER.to_string());
    };
    let id = descriptor.scope_attribute();
    let compiled = compiler.compile(&TemplateInput {
        source: &template.content,
        filename: &descriptor.filename,
        id: &id,
    })?;
    Ok(compiled.code)
}

fn gen_script(
    descriptor: &SfcDescriptor,
    compiler: &dyn ScriptCompiler,
) -> Result<String, CompilerError> {
    if !descriptor.has_script() {
        return Ok(format!("const {} = {{}}", COMPONENT_LOCAL));
    }
    let compiled = compiler.compile(descriptor)?;
    rewrite_default(&compiled.content, COMPONENT_LOCAL, &descriptor.filename)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile every block of `descriptor` and join the results into one module.
/// Compiler errors are returned unchanged.
pub fn assemble(descriptor: &SfcDescriptor, compilers: &Compilers) -> Result<String, CompilerError> {
    let mut parts = vec![
        gen_style_imports(descriptor),
        gen_template(descriptor, compilers.template.as_ref())?,
        gen_script(descriptor, compilers.script.as_ref())?,
        format!("{}.render = render", COMPONENT_LOCAL),
    ];
    if descriptor.has_scoped_style() {
        parts.push(format!(
            "{}.__scopeId = \"{}\"",
            COMPONENT_LOCAL,
            descriptor.scope_attribute()
        ));
    }
    parts.push(format!("export default {}", COMPONENT_LOCAL));

    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_sfc;

    fn descriptor(source: &str) -> SfcDescriptor {
        let mut d = parse_sfc(source, "/src/Card.vue").unwrap();
        d.id = "0a1b2c3d".to_string();
        d
    }

    #[test]
    fn test_empty_component() {
        let out = assemble(&descriptor(""), &Compilers::default()).unwrap();
        assert_eq!(
            out,
            "\nfunction render() { return null }\nconst _sfc_main = {}\n_sfc_main.render = render\nexport default _sfc_main"
        );
    }

    #[test]
    fn test_style_imports_default_to_css() {
        let d = descriptor("<style>.a{}</style>\n<style lang=\"scss\">.b{}</style>");
        let out = gen_style_imports(&d);
        assert_eq!(
            out,
            "import \"/src/Card.vue?type=style&index=0&lang=css\"\nimport \"/src/Card.vue?type=style&index=1&lang=scss\""
        );
    }

    #[test]
    fn test_scope_id_emitted_only_for_scoped_styles() {
        let scoped = assemble(&descriptor("<style scoped>.a{}</style>"), &Compilers::default()).unwrap();
        assert!(scoped.contains("_sfc_main.__scopeId = \"data-v-0a1b2c3d\"\nexport default _sfc_main"));

        let plain = assemble(&descriptor("<style>.a{}</style>"), &Compilers::default()).unwrap();
        assert!(!plain.contains("__scopeId"));
    }

    #[test]
    fn test_script_default_export_is_bound() {
        let out = assemble(
            &descriptor("<script>export default { name: 'Card' }</script>"),
            &Compilers::default(),
        )
        .unwrap();
        assert!(out.contains("const _sfc_main = { name: 'Card' }"));
        assert!(out.ends_with("_sfc_main.render = render\nexport default _sfc_main"));
        assert_eq!(out.matches("export default").count(), 1);
    }

    #[test]
    fn test_template_error_propagates() {
        let err = assemble(&descriptor("<template><p>{{ a + }}</p></template>"), &Compilers::default())
            .unwrap_err();
        assert_eq!(err.code, crate::error::TEMPLATE_EXPRESSION_ERROR);
    }
}
