//! Component file parsing.
//!
//! Splits a component file into its top-level `<template>`, `<script>`,
//! `<script setup>` and `<style>` blocks. Block contents are kept verbatim;
//! compiling them is the job of the block compilers.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CompilerError, SFC_DUPLICATE_BLOCK, SFC_UNCLOSED_BLOCK};

lazy_static! {
    /// Top-level comment or block opening tag
    static ref BLOCK_OPEN_RE: Regex =
        Regex::new(r"(?is)<!--.*?-->|<(template|script|style)\b([^>]*)>").unwrap();

    static ref ATTR_RE: Regex =
        Regex::new(r#"(?i)([a-z0-9:@_.-]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^>\s]+)))?"#).unwrap();

    static ref TEMPLATE_TAG_RE: Regex = Regex::new(r"(?i)<(/?)template\b[^>]*?(/?)>").unwrap();
    static ref SCRIPT_CLOSE_RE: Regex = Regex::new(r"(?i)</script\s*>").unwrap();
    static ref STYLE_CLOSE_RE: Regex = Regex::new(r"(?i)</style\s*>").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// DESCRIPTOR TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte range of a block's content within the component source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcBlock {
    pub content: String,
    pub attrs: HashMap<String, String>,
    pub lang: Option<String>,
    pub span: BlockSpan,
}

impl SfcBlock {
    fn new(content: &str, attrs: HashMap<String, String>, span: BlockSpan) -> Self {
        let lang = attrs.get("lang").cloned();
        SfcBlock {
            content: content.to_string(),
            attrs,
            lang,
            span,
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self.lang.as_deref(), Some("ts") | Some("tsx"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcStyleBlock {
    pub content: String,
    pub attrs: HashMap<String, String>,
    pub lang: Option<String>,
    pub scoped: bool,
    /// `<style module>`; the value is the binding name (`$style` when bare).
    pub module: Option<String>,
    pub span: BlockSpan,
}

/// Parsed structure of one component file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfcDescriptor {
    pub filename: String,
    pub source: String,
    pub template: Option<SfcBlock>,
    pub script: Option<SfcBlock>,
    pub script_setup: Option<SfcBlock>,
    pub styles: Vec<SfcStyleBlock>,
    /// Scope id. Assigned by the descriptor cache when the descriptor is stored.
    pub id: String,
}

impl SfcDescriptor {
    pub fn has_script(&self) -> bool {
        self.script.is_some() || self.script_setup.is_some()
    }

    pub fn has_scoped_style(&self) -> bool {
        self.styles.iter().any(|s| s.scoped)
    }

    /// Attribute name scoped styles and rendered elements share.
    pub fn scope_attribute(&self) -> String {
        format!("data-v-{}", self.id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER
// ═══════════════════════════════════════════════════════════════════════════════

/// Splits component source into blocks.
pub trait SfcParser: Send + Sync {
    fn parse(&self, source: &str, filename: &str) -> Result<SfcDescriptor, CompilerError>;
}

/// The built-in block splitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockParser;

impl SfcParser for BlockParser {
    fn parse(&self, source: &str, filename: &str) -> Result<SfcDescriptor, CompilerError> {
        parse_sfc(source, filename)
    }
}

pub fn parse_attributes(attr_string: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    for caps in ATTR_RE.captures_iter(attr_string) {
        if let Some(name) = caps.get(1) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "true".to_string());
            attributes.insert(name.as_str().to_lowercase(), value);
        }
    }
    attributes
}

/// Find the `</template>` matching a `<template>` whose content starts at `from`.
/// Returns (content_end, after_close).
fn find_template_close(source: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1;
    for caps in TEMPLATE_TAG_RE.captures_iter(&source[from..]) {
        let m = caps.get(0)?;
        let closing = !caps[1].is_empty();
        let self_closing = !caps[2].is_empty();
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some((from + m.start(), from + m.end()));
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    None
}

pub fn parse_sfc(source: &str, filename: &str) -> Result<SfcDescriptor, CompilerError> {
    let mut descriptor = SfcDescriptor {
        filename: filename.to_string(),
        source: source.to_string(),
        template: None,
        script: None,
        script_setup: None,
        styles: Vec::new(),
        id: String::new(),
    };

    let mut pos = 0;
    while let Some(caps) = BLOCK_OPEN_RE.captures_at(source, pos) {
        let Some(whole) = caps.get(0) else { break };
        let Some(tag) = caps.get(1) else {
            // comment
            pos = whole.end();
            continue;
        };
        let tag = tag.as_str().to_lowercase();
        let attr_string = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        // `<script src="..." />` has no content.
        if attr_string.trim_end().ends_with('/') {
            pos = whole.end();
            continue;
        }

        let attrs = parse_attributes(attr_string);
        let content_start = whole.end();

        let close = match tag.as_str() {
            "template" => find_template_close(source, content_start),
            "script" => SCRIPT_CLOSE_RE
                .find_at(source, content_start)
                .map(|m| (m.start(), m.end())),
            _ => STYLE_CLOSE_RE
                .find_at(source, content_start)
                .map(|m| (m.start(), m.end())),
        };
        let Some((content_end, after)) = close else {
            return Err(CompilerError::at_offset(
                SFC_UNCLOSED_BLOCK,
                &format!("Element <{}> is missing end tag.", tag),
                filename,
                source,
                whole.start(),
            ));
        };

        let span = BlockSpan {
            start: content_start,
            end: content_end,
        };
        let content = &source[content_start..content_end];

        let duplicate = |what: &str| {
            CompilerError::at_offset(
                SFC_DUPLICATE_BLOCK,
                &format!("A component file can contain only one {} element.", what),
                filename,
                source,
                whole.start(),
            )
        };

        match tag.as_str() {
            "template" => {
                if descriptor.template.is_some() {
                    return Err(duplicate("<template>"));
                }
                descriptor.template = Some(SfcBlock::new(content, attrs, span));
            }
            "script" => {
                let block = SfcBlock::new(content, attrs, span);
                // Blank scripts compile to nothing; treat them as absent.
                if content.trim().is_empty() && !block.has_attr("src") {
                    pos = after;
                    continue;
                }
                if block.has_attr("setup") {
                    if descriptor.script_setup.is_some() {
                        return Err(duplicate("<script setup>"));
                    }
                    descriptor.script_setup = Some(block);
                } else {
                    if descriptor.script.is_some() {
                        return Err(duplicate("<script>"));
                    }
                    descriptor.script = Some(block);
                }
            }
            _ => {
                let scoped = attrs.contains_key("scoped");
                let module = attrs.get("module").map(|m| {
                    if m == "true" {
                        "$style".to_string()
                    } else {
                        m.clone()
                    }
                });
                let lang = attrs.get("lang").cloned();
                descriptor.styles.push(SfcStyleBlock {
                    content: content.to_string(),
                    attrs,
                    lang,
                    scoped,
                    module,
                    span,
                });
            }
        }

        pos = after;
    }

    Ok(descriptor)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_all_blocks() {
        let src = indoc! {r#"
            <template>
              <div class="a">{{ msg }}</div>
            </template>
            <script lang="ts">
            export default { data() { return { msg: 'hi' } } }
            </script>
            <style scoped>
            .a { color: red; }
            </style>
            <style module="classes" lang="css">
            .b { color: blue; }
            </style>
        "#};
        let d = parse_sfc(src, "/src/App.vue").unwrap();
        assert_eq!(d.filename, "/src/App.vue");
        assert!(d.template.as_ref().unwrap().content.contains("{{ msg }}"));
        let script = d.script.as_ref().unwrap();
        assert!(script.is_typescript());
        assert!(script.content.contains("export default"));
        assert!(d.script_setup.is_none());
        assert_eq!(d.styles.len(), 2);
        assert!(d.styles[0].scoped);
        assert_eq!(d.styles[0].module, None);
        assert!(!d.styles[1].scoped);
        assert_eq!(d.styles[1].module.as_deref(), Some("classes"));
        assert_eq!(d.styles[1].lang.as_deref(), Some("css"));
        assert!(d.id.is_empty());
    }

    #[test]
    fn test_nested_templates_stay_in_outer_block() {
        let src = indoc! {r#"
            <template>
              <template v-if="ok"><p>yes</p></template>
              <span>after</span>
            </template>
        "#};
        let d = parse_sfc(src, "a.vue").unwrap();
        let template = d.template.unwrap();
        assert!(template.content.contains(r#"<template v-if="ok">"#));
        assert!(template.content.contains("<span>after</span>"));
    }

    #[test]
    fn test_setup_and_plain_script() {
        let src = indoc! {r#"
            <script>export default { name: 'X' }</script>
            <script setup>const count = 1</script>
        "#};
        let d = parse_sfc(src, "a.vue").unwrap();
        assert!(d.script.is_some());
        assert_eq!(d.script_setup.unwrap().content, "const count = 1");
    }

    #[test]
    fn test_commented_blocks_are_ignored() {
        let src = "<!-- <style>.x{}</style> -->\n<style>.y{}</style>";
        let d = parse_sfc(src, "a.vue").unwrap();
        assert_eq!(d.styles.len(), 1);
        assert_eq!(d.styles[0].content, ".y{}");
    }

    #[test]
    fn test_empty_file() {
        let d = parse_sfc("", "a.vue").unwrap();
        assert!(d.template.is_none());
        assert!(!d.has_script());
        assert!(d.styles.is_empty());
    }

    #[test]
    fn test_blank_scripts_are_dropped() {
        let d = parse_sfc("<script>\n  </script>\n<script setup></script>", "a.vue").unwrap();
        assert!(d.script.is_none());
        assert!(d.script_setup.is_none());
        assert!(!d.has_script());
    }

    #[test]
    fn test_duplicate_script_is_error() {
        let err = parse_sfc("<script>a</script><script>b</script>", "a.vue").unwrap_err();
        assert_eq!(err.code, SFC_DUPLICATE_BLOCK);
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 19);
    }

    #[test]
    fn test_unclosed_style_is_error() {
        let err = parse_sfc("<template></template>\n<style>.a{}", "a.vue").unwrap_err();
        assert_eq!(err.code, SFC_UNCLOSED_BLOCK);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_span_points_at_content() {
        let src = "<style>.a{}</style>";
        let d = parse_sfc(src, "a.vue").unwrap();
        let span = d.styles[0].span;
        assert_eq!(&src[span.start..span.end], ".a{}");
    }
}
