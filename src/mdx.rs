//! Markdown-with-components adapter.
//!
//! Ids accepted by the filter are handed to a [`MarkdownCompiler`]; its output
//! becomes the module, optionally preceded by a renderer prelude that imports
//! the JSX factory the compiled markdown calls.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{CompilerError, Result};
use crate::filter::{Filter, FilterPattern};
use crate::pipeline::TransformOutput;

/// Renderer import for Vue 3 hosts.
pub const VUE3_RENDERER: &str = "\nimport {mdx} from 'vite-mdx/vue3'\n";
/// Points the JSX factory of the compiled markdown at `mdx`.
pub const MDX_JSX_PRAGMA: &str = "\n/** @jsx mdx **/\n";

pub trait MarkdownCompiler: Send + Sync {
    /// Compile markdown source into ES module code.
    fn compile(&self, source: &str, filename: &str) -> Result<String, CompilerError>;
}

fn default_include() -> Vec<FilterPattern> {
    vec![FilterPattern::regex(r"\.mdx")]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdxOptions {
    #[serde(default = "default_include")]
    pub include: Vec<FilterPattern>,
    #[serde(default)]
    pub exclude: Vec<FilterPattern>,
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for MdxOptions {
    fn default() -> Self {
        MdxOptions {
            include: default_include(),
            exclude: Vec::new(),
            root: None,
        }
    }
}

pub struct MdxPlugin {
    filter: Filter,
    compiler: Arc<dyn MarkdownCompiler>,
    prelude: String,
}

impl MdxPlugin {
    pub fn new(options: &MdxOptions, compiler: Arc<dyn MarkdownCompiler>) -> Result<Self> {
        let root = match &options.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        Ok(MdxPlugin {
            filter: Filter::new(&options.include, &options.exclude, &root)?,
            compiler,
            prelude: String::new(),
        })
    }

    /// Adapter whose output renders through the Vue 3 `mdx` factory.
    pub fn vue3(options: &MdxOptions, compiler: Arc<dyn MarkdownCompiler>) -> Result<Self> {
        Ok(Self::new(options, compiler)?.with_prelude(format!("{}{}", VUE3_RENDERER, MDX_JSX_PRAGMA)))
    }

    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = prelude.into();
        self
    }

    /// `transform` hook. The filter sees the whole id, query included.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        if !self.filter.matches(id) {
            return Ok(None);
        }
        tracing::debug!(id, "compiling markdown module");
        let compiled = self.compiler.compile(code, id)?;
        Ok(Some(TransformOutput {
            code: format!("{}{}", self.prelude, compiled),
        }))
    }
}
