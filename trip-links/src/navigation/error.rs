//! Callback decoding errors.

/// A callback field that could not be read.
///
/// [`decode_callback`](super::decode_callback) logs and drops these;
/// [`decode_callback_strict`](super::decode_callback_strict) returns them.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A JSON-valued query parameter did not parse into the expected shape
    #[error("malformed {field}: {source}")]
    MalformedJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DecodeError::MalformedJson {
            field: "contextData",
            source,
        };
        assert!(err.to_string().starts_with("malformed contextData: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
