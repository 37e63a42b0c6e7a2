//! Style block compilation.
//!
//! Scoped blocks get the component's scope attribute appended to the last
//! compound of every selector, so rules only match elements rendered by that
//! component. Unscoped blocks pass through unchanged.

use crate::error::{CompilerError, STYLE_PARSE_ERROR};

/// At-rules whose blocks contain ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

#[derive(Debug, Clone, Copy)]
pub struct StyleInput<'a> {
    pub filename: &'a str,
    pub source: &'a str,
    /// Scope attribute name, e.g. `data-v-1a2b3c4d`.
    pub id: &'a str,
    pub scoped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
    pub code: String,
}

pub trait StyleCompiler: Send + Sync {
    fn compile(&self, input: &StyleInput<'_>) -> Result<CompiledStyle, CompilerError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScopedCssCompiler;

impl StyleCompiler for ScopedCssCompiler {
    fn compile(&self, input: &StyleInput<'_>) -> Result<CompiledStyle, CompilerError> {
        let code = if input.scoped {
            scope_css(input.source, input.id, input.filename)?
        } else {
            input.source.to_string()
        };
        Ok(CompiledStyle { code })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Index just past a comment or string starting at `i`, if one starts there.
fn skip_opaque(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes[i] {
        b'/' if bytes.get(i + 1) == Some(&b'*') => {
            let mut j = i + 2;
            while j + 1 < bytes.len() && !(bytes[j] == b'*' && bytes[j + 1] == b'/') {
                j += 1;
            }
            Some((j + 2).min(bytes.len()))
        }
        quote @ (b'"' | b'\'') => {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] != quote {
                if bytes[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            Some((j + 1).min(bytes.len()))
        }
        _ => None,
    }
}

/// `text` without its comments. Strings are kept whole.
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match skip_opaque(bytes, i) {
            Some(next) => {
                if bytes[i] == b'/' {
                    out.push_str(&text[copied..i]);
                    copied = next;
                }
                i = next;
            }
            None => i += 1,
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// Index of the `}` closing the block opened at `open`.
fn find_block_end(src: &str, open: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_opaque(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_error(message: &str, file: &str, source: &str, offset: usize) -> CompilerError {
    CompilerError::at_offset(STYLE_PARSE_ERROR, message, file, source, offset)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPING
// ═══════════════════════════════════════════════════════════════════════════════

pub fn scope_css(source: &str, id: &str, file: &str) -> Result<String, CompilerError> {
    let mut out = String::with_capacity(source.len() + 64);
    scope_rules(source, 0, source.len(), id, file, &mut out)?;
    Ok(out)
}

fn scope_rules(
    source: &str,
    start: usize,
    end: usize,
    id: &str,
    file: &str,
    out: &mut String,
) -> Result<(), CompilerError> {
    let bytes = source.as_bytes();
    let mut i = start;
    let mut prelude_start = start;

    while i < end {
        if let Some(next) = skip_opaque(bytes, i) {
            // Comments between rules are copied as-is.
            if i == prelude_start || source[prelude_start..i].trim().is_empty() {
                out.push_str(&source[prelude_start..next.min(end)]);
                prelude_start = next;
            }
            i = next;
            continue;
        }

        match bytes[i] {
            b';' => {
                out.push_str(&source[prelude_start..=i]);
                prelude_start = i + 1;
            }
            b'{' => {
                let close = find_block_end(&source[..end], i)
                    .ok_or_else(|| parse_error("Unclosed block", file, source, i))?;
                let raw_prelude = &source[prelude_start..i];
                let leading_ws = &raw_prelude[..raw_prelude.len() - raw_prelude.trim_start().len()];
                let prelude = raw_prelude.trim();
                out.push_str(leading_ws);

                if let Some(at_rule) = prelude.strip_prefix('@') {
                    let name: String = at_rule
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                        .collect();
                    if GROUPING_AT_RULES.contains(&name.to_ascii_lowercase().as_str()) {
                        out.push_str(prelude);
                        out.push_str(" {");
                        scope_rules(source, i + 1, close, id, file, out)?;
                        out.push('}');
                    } else {
                        // keyframes, font-face, page: nothing to scope
                        out.push_str(prelude);
                        out.push(' ');
                        out.push_str(&source[i..=close]);
                    }
                } else {
                    let selector = strip_comments(prelude);
                    let selector = selector.trim();
                    if selector.is_empty() {
                        return Err(parse_error("Missing selector", file, source, i));
                    }
                    out.push_str(&scope_selector_list(selector, id));
                    out.push(' ');
                    out.push_str(&source[i..=close]);
                }

                i = close + 1;
                prelude_start = i;
                continue;
            }
            b'}' => {
                return Err(parse_error("Unexpected }", file, source, i));
            }
            _ => {}
        }
        i += 1;
    }

    out.push_str(&source[prelude_start..end]);
    Ok(())
}

/// Split at top-level commas.
fn split_selectors(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut last = 0;
    let mut escaped = false;
    for (i, c) in list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[last..]);
    parts
}

pub fn scope_selector_list(list: &str, id: &str) -> String {
    split_selectors(list)
        .into_iter()
        .map(|s| scope_selector(s.trim(), id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn scope_selector(selector: &str, id: &str) -> String {
    let attr = format!("[{}]", id);

    if let Some(deep) = selector.find(":deep(") {
        let before = selector[..deep].trim_end();
        let inner_start = deep + ":deep(".len();
        let inner_end = selector.rfind(')').unwrap_or(selector.len()).max(inner_start);
        let inner = selector[inner_start..inner_end].trim();
        let rest = &selector[(inner_end + 1).min(selector.len())..];
        let scoped_before = if before.is_empty() {
            attr
        } else {
            scope_selector(before, id)
        };
        return format!("{} {}{}", scoped_before, inner, rest);
    }

    // Start of the last compound selector.
    let mut compound_start = 0;
    let mut depth = 0i32;
    let mut escaped = false;
    for (i, c) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ' ' | '>' | '+' | '~' | '\t' | '\n' if depth == 0 => compound_start = i + 1,
            _ => {}
        }
    }

    // Insert before the first pseudo-class/element of that compound.
    let compound = &selector[compound_start..];
    let mut insert_at = selector.len();
    let mut depth = 0i32;
    let mut escaped = false;
    for (i, c) in compound.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ':' if depth == 0 => {
                insert_at = compound_start + i;
                break;
            }
            _ => {}
        }
    }

    format!("{}{}{}", &selector[..insert_at], attr, &selector[insert_at..])
}
