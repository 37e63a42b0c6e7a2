use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const SFC_DUPLICATE_BLOCK: &str = "SFC_DUPLICATE_BLOCK";
pub const SFC_UNCLOSED_BLOCK: &str = "SFC_UNCLOSED_BLOCK";
pub const SCRIPT_PARSE_ERROR: &str = "SCRIPT_PARSE_ERROR";
pub const SCRIPT_TRANSFORM_ERROR: &str = "SCRIPT_TRANSFORM_ERROR";
pub const TEMPLATE_PARSE_ERROR: &str = "TEMPLATE_PARSE_ERROR";
pub const TEMPLATE_EXPRESSION_ERROR: &str = "TEMPLATE_EXPRESSION_ERROR";
pub const TEMPLATE_DIRECTIVE_ERROR: &str = "TEMPLATE_DIRECTIVE_ERROR";
pub const STYLE_PARSE_ERROR: &str = "STYLE_PARSE_ERROR";
pub const MARKDOWN_COMPILE_ERROR: &str = "MARKDOWN_COMPILE_ERROR";

fn error_type(code: &str) -> &'static str {
    match code {
        SFC_DUPLICATE_BLOCK | SFC_UNCLOSED_BLOCK => "SFC_SYNTAX_ERROR",
        SCRIPT_PARSE_ERROR | SCRIPT_TRANSFORM_ERROR => "SCRIPT_ERROR",
        TEMPLATE_PARSE_ERROR | TEMPLATE_EXPRESSION_ERROR | TEMPLATE_DIRECTIVE_ERROR => {
            "TEMPLATE_ERROR"
        }
        STYLE_PARSE_ERROR => "STYLE_ERROR",
        MARKDOWN_COMPILE_ERROR => "MARKDOWN_ERROR",
        _ => "COMPILER_ERROR",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Diagnostic produced by one of the block compilers.
///
/// `line`/`column` are 1-based and relative to the block being compiled;
/// `0` means the position is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: error_type(code).to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
            context,
            hints,
        }
    }

    /// Build an error positioned at a byte offset of `source`.
    pub fn at_offset(code: &str, message: &str, file: &str, source: &str, offset: usize) -> Self {
        let (line, column) = line_column(source, offset);
        Self::new(code, message, file, line, column)
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.file.is_empty() {
            write!(f, " ({}", self.file)?;
            if self.line > 0 {
                write!(f, ":{}:{}", self.line, self.column)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompilerError {}

/// 1-based line/column of a byte offset, clamped to the source length.
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() as u32 + 1,
        None => before.chars().count() as u32 + 1,
    };
    (line, column)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure of a single `load`/`transform` request.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Compile(#[from] CompilerError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file} has no style block at index {index}")]
    StyleBlockNotFound { file: String, index: usize },

    #[error("style request for {file} has an invalid index {raw:?}")]
    InvalidStyleIndex { file: String, raw: Option<String> },

    #[error("invalid plugin options: {0}")]
    Options(String),
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
