//! Query-string handling shared by the callback codec.

use std::fmt;

use url::form_urlencoded;

/// Where to go back to.
pub const RETURN_PATH: &str = "returnPath";
/// JSON object of query parameters to restore on return.
pub const RETURN_QUERY: &str = "returnQuery";
/// Fragment (without `#`) to restore on return.
pub const RETURN_FRAGMENT: &str = "returnFragment";
/// Opaque JSON passed through to the returning page.
pub const CONTEXT_DATA: &str = "contextData";
/// Marker read by the destination page after a failed operation.
pub const ERROR: &str = "error";

/// Whether `key` belongs to the callback codec rather than the page.
///
/// Such keys are stripped when capturing the current location so
/// repeated encode/decode cycles don't nest.
pub fn is_callback_key(key: &str) -> bool {
    key.starts_with("return") || key == CONTEXT_DATA
}

/// An ordered list of query-string pairs.
///
/// Duplicate keys are allowed, as in a real query string; [`get`](Self::get)
/// returns the first and [`set`](Self::set) collapses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL-encoded query string, with or without a leading `?`.
    ///
    /// ```
    /// use trip_links::navigation::QueryParams;
    ///
    /// let params = QueryParams::parse("?returnPath=%2Ftrips%2F1&tab=plans");
    /// assert_eq!(params.get("returnPath"), Some("/trips/1"));
    /// assert_eq!(params.get("tab"), Some("plans"));
    /// ```
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first `key` and drop any later duplicates, or append.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.0[first].1 = value;
                let mut index = 0;
                self.0.retain(|(k, _)| {
                    let keep = index <= first || *k != key;
                    index += 1;
                    keep
                });
            }
            None => self.0.push((key, value)),
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` text, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.0 {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// A relative URL split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelativeUrl {
    pub path: String,
    pub query: QueryParams,
    pub fragment: Option<String>,
}

impl RelativeUrl {
    /// Split `path?query#fragment`. Missing parts are empty.
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_owned())),
            None => (url, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, QueryParams::parse(query)),
            None => (rest, QueryParams::new()),
        };
        Self {
            path: path.to_owned(),
            query,
            fragment,
        }
    }

    /// Path plus query, ignoring any fragment.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_values() {
        let params = QueryParams::parse("a=1&b=hello+world&c=%7B%22x%22%3A1%7D");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("hello world"));
        assert_eq!(params.get("c"), Some(r#"{"x":1}"#));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn parse_empty() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn set_collapses_duplicates() {
        let mut params = QueryParams::parse("a=1&b=2&a=3");
        params.set("a", "9");
        assert_eq!(params.to_query_string(), "a=9&b=2");

        params.set("c", "x");
        assert_eq!(params.to_query_string(), "a=9&b=2&c=x");
    }

    #[test]
    fn remove_and_append() {
        let mut params = QueryParams::new();
        params.append("k", "1");
        params.append("k", "2");
        assert_eq!(params.len(), 2);
        params.remove("k");
        assert!(!params.contains_key("k"));
    }

    #[test]
    fn serializer_encodes_json() {
        let params: QueryParams = [("q", r#"{"day":"3"}"#)].into_iter().collect();
        assert_eq!(params.to_string(), "q=%7B%22day%22%3A%223%22%7D");
    }

    #[test]
    fn callback_keys() {
        assert!(is_callback_key("returnPath"));
        assert!(is_callback_key("returnAnything"));
        assert!(is_callback_key("contextData"));
        assert!(!is_callback_key("tab"));
        assert!(!is_callback_key("error"));
    }

    #[test]
    fn relative_url_parts() {
        let url = RelativeUrl::parse("/trips/1?tab=map&x=2#day-3");
        assert_eq!(url.path, "/trips/1");
        assert_eq!(url.query.get("tab"), Some("map"));
        assert_eq!(url.fragment.as_deref(), Some("day-3"));
        assert_eq!(url.path_and_query(), "/trips/1?tab=map&x=2");

        let bare = RelativeUrl::parse("/plans/new");
        assert_eq!(bare.path_and_query(), "/plans/new");
        assert_eq!(bare.fragment, None);
    }
}
