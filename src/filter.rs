//! Include/exclude filtering of module ids.
//!
//! Patterns written as `/…/` are regular expressions tested against the id;
//! anything else is a glob matched against the whole path. Relative globs
//! are resolved against the project root unless they start with `*`.

use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TransformError};
use crate::request::normalize_path;

/// A single include/exclude entry as written in the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterPattern(pub String);

impl FilterPattern {
    pub fn regex(source: &str) -> Self {
        FilterPattern(format!("/{}/", source))
    }

    pub fn glob(source: &str) -> Self {
        FilterPattern(source.to_string())
    }

    fn as_regex_source(&self) -> Option<&str> {
        let s = self.0.as_str();
        if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
            Some(&s[1..s.len() - 1])
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    Glob(Pattern),
}

impl Matcher {
    fn compile(pattern: &FilterPattern, root: &Path) -> Result<Self> {
        if let Some(source) = pattern.as_regex_source() {
            let re = Regex::new(source).map_err(|e| {
                TransformError::Options(format!("invalid regex pattern {}: {}", pattern.0, e))
            })?;
            return Ok(Matcher::Regex(re));
        }

        let raw = normalize_path(&pattern.0);
        let resolved = if raw.starts_with('*') || Path::new(&raw).is_absolute() {
            raw
        } else {
            normalize_path(&root.join(&raw).to_string_lossy())
        };
        let glob = Pattern::new(&resolved).map_err(|e| {
            TransformError::Options(format!("invalid glob pattern {}: {}", pattern.0, e))
        })?;
        Ok(Matcher::Glob(glob))
    }

    fn matches(&self, id: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(id),
            Matcher::Glob(glob) => glob.matches_with(
                id,
                MatchOptions {
                    case_sensitive: true,
                    require_literal_separator: true,
                    require_literal_leading_dot: false,
                },
            ),
        }
    }
}

/// Compiled include/exclude filter. Exclusion wins over inclusion; an empty
/// include list admits everything not excluded.
#[derive(Debug, Clone)]
pub struct Filter {
    include: Vec<Matcher>,
    exclude: Vec<Matcher>,
}

impl Filter {
    pub fn new(include: &[FilterPattern], exclude: &[FilterPattern], root: &Path) -> Result<Self> {
        Ok(Filter {
            include: include
                .iter()
                .map(|p| Matcher::compile(p, root))
                .collect::<Result<_>>()?,
            exclude: exclude
                .iter()
                .map(|p| Matcher::compile(p, root))
                .collect::<Result<_>>()?,
        })
    }

    pub fn matches(&self, id: &str) -> bool {
        // Virtual modules are never ours.
        if id.contains('\0') {
            return false;
        }
        let id = normalize_path(id);

        if self.exclude.iter().any(|m| m.matches(&id)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|m| m.matches(&id))
    }
}
