//! Request parsing for module identifiers.
//!
//! A module id is `<filename>` optionally followed by `?<query>`. Style blocks
//! of a component file are addressed as sub-requests of the component itself:
//! `<filename>?type=style&index=<n>&lang=css`.

use serde::{Deserialize, Serialize};

/// Ordered, percent-decoded query parameters.
///
/// Lookups by key return the *first* occurrence, like `URLSearchParams.get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Query { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What a module id asks the pipeline for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// The whole component file.
    Main,
    /// One style block. `None` when `index` is missing or not a non-negative integer.
    Style { index: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    pub filename: String,
    pub query: Query,
    pub kind: RequestKind,
}

impl ModuleRequest {
    /// Split `id` at the first `?`. Never fails: an id without a query is a
    /// main request with an empty query.
    pub fn parse(id: &str) -> Self {
        let (filename, raw_query) = match id.split_once('?') {
            Some((f, q)) => (f, q),
            None => (id, ""),
        };
        let query = Query::parse(raw_query);

        let kind = if query.get("type") == Some("style") {
            RequestKind::Style {
                index: query.get("index").and_then(|i| i.parse::<usize>().ok()),
            }
        } else {
            RequestKind::Main
        };

        ModuleRequest {
            filename: filename.to_string(),
            query,
            kind,
        }
    }

    pub fn is_style(&self) -> bool {
        matches!(self.kind, RequestKind::Style { .. })
    }
}

/// Forward slashes only; ids are compared as strings by the host.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Synthetic id of the style block at `index` in `filename`.
pub fn style_request_id(filename: &str, index: usize, lang: &str) -> String {
    normalize_path(&format!(
        "{}?type=style&index={}&lang={}",
        filename, index, lang
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_main_request() {
        let req = ModuleRequest::parse("/src/App.vue");
        assert_eq!(req.filename, "/src/App.vue");
        assert!(req.query.is_empty());
        assert_eq!(req.kind, RequestKind::Main);
    }

    #[test]
    fn test_style_sub_request() {
        let req = ModuleRequest::parse("/src/App.vue?type=style&index=1&lang=css");
        assert_eq!(req.filename, "/src/App.vue");
        assert_eq!(req.kind, RequestKind::Style { index: Some(1) });
        assert_eq!(req.query.get("lang"), Some("css"));
    }

    #[test]
    fn test_split_on_first_question_mark_only() {
        let req = ModuleRequest::parse("/a.vue?type=style&index=0&x=a?b");
        assert_eq!(req.filename, "/a.vue");
        assert_eq!(req.query.get("x"), Some("a?b"));
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let req = ModuleRequest::parse("/a.vue?type=style&index=2&index=5");
        assert_eq!(req.kind, RequestKind::Style { index: Some(2) });
    }

    #[test]
    fn test_bad_index_is_unresolved_style() {
        let req = ModuleRequest::parse("/a.vue?type=style&index=-1");
        assert_eq!(req.kind, RequestKind::Style { index: None });
        let req = ModuleRequest::parse("/a.vue?type=style");
        assert_eq!(req.kind, RequestKind::Style { index: None });
    }

    #[test]
    fn test_other_types_are_main() {
        let req = ModuleRequest::parse("/a.vue?type=template");
        assert_eq!(req.kind, RequestKind::Main);
        assert!(req.query.has("type"));
    }

    #[test]
    fn test_percent_decoding() {
        let req = ModuleRequest::parse("/a.vue?name=hello%20world&flag");
        assert_eq!(req.query.get("name"), Some("hello world"));
        assert_eq!(req.query.get("flag"), Some(""));
    }

    #[test]
    fn test_style_request_id_normalizes_separators() {
        assert_eq!(
            style_request_id("C:\\src\\App.vue", 0, "css"),
            "C:/src/App.vue?type=style&index=0&lang=css"
        );
    }
}
