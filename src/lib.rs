//! # Native Component-File Plugin
//!
//! Bundler plugin core for single-file components: one file holding
//! `<template>`, `<script>`, `<script setup>` and `<style>` blocks is turned
//! into one ES module, with each style block served as its own sub-request.
//!
//! ## Request Flow
//!
//! 1. **Request Parser** (`request`): `<file>?type=style&index=<n>` becomes a
//!    [`ModuleRequest`] tagged [`RequestKind::Main`] or [`RequestKind::Style`].
//! 2. **Filter** (`filter`): ids outside `include`/`exclude` pass through.
//! 3. **Descriptor Cache** (`cache`): one [`SfcDescriptor`] per file, parsed
//!    once and kept until [`SfcPlugin::handle_file_change`] drops it.
//! 4. **Module Assembler** (`assemble`): style imports, render function,
//!    script bound to `_sfc_main`, then `export default _sfc_main`.
//! 5. **Style sub-requests**: the addressed block is compiled alone, scoped
//!    to `data-v-<scope id>` when it is `scoped`.
//!
//! The parser and the three block compilers sit behind traits
//! ([`SfcParser`], [`ScriptCompiler`], [`TemplateCompiler`],
//! [`StyleCompiler`]) so hosts can swap in their own.

mod assemble;
mod cache;
mod descriptor;
mod error;
mod expression;
mod filter;
mod mdx;
mod options;
mod pipeline;
mod request;
mod rewrite;
mod script;
mod style;
mod template;

#[cfg(feature = "napi")]
mod binding;

#[cfg(test)]
mod template_tests;

pub use assemble::{assemble, Compilers, COMPONENT_LOCAL};
pub use cache::DescriptorCache;
pub use descriptor::{
    parse_sfc, BlockParser, BlockSpan, SfcBlock, SfcDescriptor, SfcParser, SfcStyleBlock,
};
pub use error::*;
pub use filter::{Filter, FilterPattern};
pub use mdx::{MarkdownCompiler, MdxOptions, MdxPlugin, MDX_JSX_PRAGMA, VUE3_RENDERER};
pub use options::{PluginOptions, DEFAULT_RUNTIME_MODULE};
pub use pipeline::{SfcPlugin, TransformOutput};
pub use request::{style_request_id, ModuleRequest, Query, RequestKind};
pub use rewrite::rewrite_default;
pub use script::{CompiledScript, ScriptCompiler, SetupScriptCompiler};
pub use style::{CompiledStyle, ScopedCssCompiler, StyleCompiler, StyleInput};
pub use template::{CompiledTemplate, RenderFunctionCompiler, TemplateCompiler, TemplateInput};

#[cfg(feature = "napi")]
pub use binding::{NativeTransformResult, SfcPluginNative};
