//! Encoding and decoding of navigation intents.
//!
//! An intent says "when this flow finishes, go back to `returnPath` with
//! this query, fragment and context". It lives only in the URL: it is
//! written into the target link's query string and re-read on the next
//! page load.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::error::DecodeError;
use super::query::{
    CONTEXT_DATA, QueryParams, RETURN_FRAGMENT, RETURN_PATH, RETURN_QUERY, RelativeUrl,
};

/// Extra state to carry alongside the return path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeOptions {
    /// Query parameters to restore on return. Omitted from the link when empty.
    pub query: BTreeMap<String, String>,
    /// Fragment (without `#`) to restore on return.
    pub fragment: Option<String>,
    /// Opaque JSON handed back to the returning page.
    pub context_data: Option<Value>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context_data = Some(context);
        self
    }
}

/// A decoded "return to" instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationIntent {
    pub return_path: String,
    pub return_query: Option<BTreeMap<String, String>>,
    pub return_fragment: Option<String>,
    pub context_data: Option<Value>,
}

impl NavigationIntent {
    pub fn new(return_path: impl Into<String>) -> Self {
        Self {
            return_path: return_path.into(),
            return_query: None,
            return_fragment: None,
            context_data: None,
        }
    }

    /// The return path with `return_query` merged into its query string.
    ///
    /// Without a `return_query` the path is handed back verbatim.
    pub fn return_url_without_fragment(&self) -> String {
        let Some(query) = &self.return_query else {
            return self.return_path.clone();
        };
        let mut url = RelativeUrl::parse(&self.return_path);
        for (k, v) in query {
            url.query.set(k.as_str(), v.as_str());
        }
        url.path_and_query()
    }

    /// The full URL to navigate to, including `#fragment` when present.
    pub fn return_url(&self) -> String {
        let base = self.return_url_without_fragment();
        match &self.return_fragment {
            Some(fragment) => format!("{base}#{fragment}"),
            None => base,
        }
    }
}

/// Build a link to `target_path` that remembers how to get back to `return_path`.
///
/// Any query already on `target_path` is kept; the callback keys are set
/// on top of it. The result is a relative `path?query` suitable for a
/// client-side router.
///
/// # Examples
///
/// ```
/// use trip_links::navigation::{EncodeOptions, encode_callback};
///
/// let link = encode_callback(
///     "/plans/new",
///     "/trips/abc",
///     &EncodeOptions::new().with_fragment("day-2"),
/// );
/// assert_eq!(link, "/plans/new?returnPath=%2Ftrips%2Fabc&returnFragment=day-2");
/// ```
pub fn encode_callback(target_path: &str, return_path: &str, options: &EncodeOptions) -> String {
    let mut url = RelativeUrl::parse(target_path);

    url.query.set(RETURN_PATH, return_path);

    if !options.query.is_empty() {
        let object: serde_json::Map<String, Value> = options
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        url.query.set(RETURN_QUERY, Value::Object(object).to_string());
    }

    if let Some(fragment) = options.fragment.as_deref().filter(|f| !f.is_empty()) {
        url.query.set(RETURN_FRAGMENT, fragment);
    }

    if let Some(context) = &options.context_data {
        url.query.set(CONTEXT_DATA, context.to_string());
    }

    url.path_and_query()
}

/// Read an intent back out of a page's query parameters.
///
/// Returns `None` when there is no (non-empty) `returnPath`: the caller
/// should fall back to its default behaviour. A malformed `returnQuery`
/// or `contextData` is logged and dropped; it never invalidates the
/// return path.
pub fn decode_callback(params: &QueryParams) -> Option<NavigationIntent> {
    let mut intent = NavigationIntent::new(params.get(RETURN_PATH).filter(|p| !p.is_empty())?);

    intent.return_query = lenient(params, RETURN_QUERY);
    intent.return_fragment = params
        .get(RETURN_FRAGMENT)
        .filter(|f| !f.is_empty())
        .map(str::to_owned);
    intent.context_data = lenient(params, CONTEXT_DATA);

    Some(intent)
}

/// Like [`decode_callback`], but reports malformed JSON fields instead of
/// dropping them.
pub fn decode_callback_strict(
    params: &QueryParams,
) -> Result<Option<NavigationIntent>, DecodeError> {
    let Some(return_path) = params.get(RETURN_PATH).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    Ok(Some(NavigationIntent {
        return_path: return_path.to_owned(),
        return_query: json_field(params, RETURN_QUERY)?,
        return_fragment: params
            .get(RETURN_FRAGMENT)
            .filter(|f| !f.is_empty())
            .map(str::to_owned),
        context_data: json_field(params, CONTEXT_DATA)?,
    }))
}

fn json_field<T: DeserializeOwned>(
    params: &QueryParams,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    match params.get(field).filter(|raw| !raw.is_empty()) {
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|source| DecodeError::MalformedJson { field, source }),
        None => Ok(None),
    }
}

fn lenient<T: DeserializeOwned>(params: &QueryParams, field: &'static str) -> Option<T> {
    json_field(params, field).unwrap_or_else(|e| {
        warn!(error = %e, "dropping callback field");
        None
    })
}
