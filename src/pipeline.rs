//! Transform Pipeline
//!
//! The plugin object a bundler host drives. Every id goes through the
//! Request Parser once; the resulting [`RequestKind`] decides between
//! assembling the whole component and compiling one style block.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::assemble::{assemble, Compilers};
use crate::cache::DescriptorCache;
use crate::descriptor::{BlockParser, SfcDescriptor, SfcParser, SfcStyleBlock};
use crate::error::{Result, TransformError};
use crate::filter::Filter;
use crate::options::PluginOptions;
use crate::request::{ModuleRequest, RequestKind};
use crate::style::StyleInput;

/// Code handed back to the host for a transformed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    pub code: String,
}

pub struct SfcPlugin {
    options: PluginOptions,
    filter: Filter,
    cache: DescriptorCache,
    compilers: Compilers,
}

impl SfcPlugin {
    /// Plugin with the built-in parser and compilers.
    pub fn new(options: PluginOptions) -> Result<Self> {
        let compilers = Compilers::builtin(&options.runtime_module);
        Self::with_parts(options, Arc::new(BlockParser), compilers)
    }

    pub fn with_parts(
        options: PluginOptions,
        parser: Arc<dyn SfcParser>,
        compilers: Compilers,
    ) -> Result<Self> {
        let root = options.resolved_root();
        let filter = options.build_filter(&root)?;
        let cache = DescriptorCache::new(root, parser);
        Ok(SfcPlugin {
            options,
            filter,
            cache,
            compilers,
        })
    }

    pub fn with_compilers(mut self, compilers: Compilers) -> Self {
        self.compilers = compilers;
        self
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HOST HOOKS
    // ═══════════════════════════════════════════════════════════════════════════

    /// `transform` hook. `Ok(None)` leaves the module to other plugins.
    ///
    /// For a main request `code` is the component source; for a style
    /// sub-request it is the style text of the addressed block.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        let request = ModuleRequest::parse(id);
        if !self.filter.matches(&request.filename) {
            tracing::trace!(id, "not handled by component plugin");
            return Ok(None);
        }

        let code = match request.kind {
            RequestKind::Style { index } => {
                let (descriptor, index) = self.resolve_style(&request, index)?;
                tracing::debug!(filename = %request.filename, index, "compiling style block");
                let block = style_block(&descriptor, index)?;
                let scope = descriptor.scope_attribute();
                self.compilers
                    .style
                    .compile(&StyleInput {
                        filename: &descriptor.filename,
                        source: code,
                        id: &scope,
                        scoped: block.scoped,
                    })?
                    .code
            }
            RequestKind::Main => {
                tracing::debug!(filename = %request.filename, "assembling component module");
                let descriptor = self.cache.get_or_parse(&request.filename, Some(code))?;
                assemble(&descriptor, &self.compilers)?
            }
        };

        Ok(Some(TransformOutput { code }))
    }

    /// `load` hook. Serves the raw text of a style sub-request's block so the
    /// host can pass it back through [`SfcPlugin::transform`].
    pub fn load(&self, id: &str) -> Result<Option<String>> {
        let request = ModuleRequest::parse(id);
        let RequestKind::Style { index } = request.kind else {
            return Ok(None);
        };
        if !self.filter.matches(&request.filename) {
            return Ok(None);
        }

        let (descriptor, index) = self.resolve_style(&request, index)?;
        let block = style_block(&descriptor, index)?;
        Ok(Some(block.content.clone()))
    }

    /// Invalidation hook for file-change notifications. Returns whether a
    /// cached descriptor was dropped.
    pub fn handle_file_change(&self, path: &str) -> bool {
        self.cache.invalidate(path)
    }

    /// Pre-parse every handled component under `dir`.
    pub fn warm(&self, dir: &Path) -> usize {
        self.cache.warm(dir, &self.filter)
    }

    /// A sub-request for a file that has not been seen yet is built from disk,
    /// never from the style text it carries.
    fn resolve_style(
        &self,
        request: &ModuleRequest,
        index: Option<usize>,
    ) -> Result<(Arc<SfcDescriptor>, usize)> {
        let index = index.ok_or_else(|| TransformError::InvalidStyleIndex {
            file: request.filename.clone(),
            raw: request.query.get("index").map(str::to_string),
        })?;
        let descriptor = self.cache.get_or_parse(&request.filename, None)?;
        Ok((descriptor, index))
    }
}

fn style_block(descriptor: &SfcDescriptor, index: usize) -> Result<&SfcStyleBlock> {
    descriptor
        .styles
        .get(index)
        .ok_or_else(|| TransformError::StyleBlockNotFound {
            file: descriptor.filename.clone(),
            index,
        })
}

impl std::fmt::Debug for SfcPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SfcPlugin")
            .field("options", &self.options)
            .field("cached", &self.cache.len())
            .finish()
    }
}
