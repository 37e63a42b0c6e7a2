//! Plugin configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TransformError};
use crate::filter::{Filter, FilterPattern};

pub const DEFAULT_RUNTIME_MODULE: &str = "vue";

fn default_include() -> Vec<FilterPattern> {
    vec![FilterPattern::regex(r"\.vue$")]
}

fn default_runtime_module() -> String {
    DEFAULT_RUNTIME_MODULE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Ids handled by the plugin. Defaults to files ending in `.vue`.
    #[serde(default = "default_include")]
    pub include: Vec<FilterPattern>,
    #[serde(default)]
    pub exclude: Vec<FilterPattern>,
    /// Scope ids are hashed from paths relative to this directory.
    /// Defaults to the process working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Module the generated render functions import their helpers from.
    #[serde(default = "default_runtime_module")]
    pub runtime_module: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        PluginOptions {
            include: default_include(),
            exclude: Vec::new(),
            root: None,
            runtime_module: default_runtime_module(),
        }
    }
}

impl PluginOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransformError::Options(e.to_string()))
    }

    pub fn with_include(mut self, include: Vec<FilterPattern>) -> Self {
        self.include = include;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<FilterPattern>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn resolved_root(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn build_filter(&self, root: &Path) -> Result<Filter> {
        Filter::new(&self.include, &self.exclude, root)
    }
}
