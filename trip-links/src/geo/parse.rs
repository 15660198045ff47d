//! Extract a coordinate from an arbitrary map-sharing URL.

use serde::Serialize;
use tracing::{debug, trace};

use super::{Coordinate, MapProvider};

/// Why a URL yielded no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    /// Empty or whitespace-only input
    #[error("Invalid URL")]
    InvalidUrl,

    /// No provider pattern produced a valid coordinate
    #[error("Unsupported map URL format")]
    Unsupported,
}

/// A coordinate together with the provider whose pattern found it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedLocation {
    pub coordinate: Coordinate,
    #[serde(serialize_with = "serialize_label")]
    pub source: MapProvider,
}

fn serialize_label<S: serde::Serializer>(p: &MapProvider, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(p.label())
}

/// Result of [`parse_map_url`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Success(ParsedLocation),
    Failure(ParseFailure),
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success(_))
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            ParseOutcome::Success(loc) => Some(loc.coordinate),
            ParseOutcome::Failure(_) => None,
        }
    }

    /// The provider label on success.
    pub fn source(&self) -> Option<&'static str> {
        match self {
            ParseOutcome::Success(loc) => Some(loc.source.label()),
            ParseOutcome::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<ParsedLocation, ParseFailure> {
        match self {
            ParseOutcome::Success(loc) => Ok(loc),
            ParseOutcome::Failure(f) => Err(f),
        }
    }
}

impl From<Result<ParsedLocation, ParseFailure>> for ParseOutcome {
    fn from(result: Result<ParsedLocation, ParseFailure>) -> Self {
        match result {
            Ok(loc) => ParseOutcome::Success(loc),
            Err(f) => ParseOutcome::Failure(f),
        }
    }
}

/// Parse a map URL into a coordinate.
///
/// Providers whose domain appears anywhere in the URL are tried first
/// (Apple, Naver, Kakao, Google). If none of them succeed every provider
/// is tried in the fixed order Google, Naver, Kakao, Apple, Generic. The
/// first valid coordinate wins. Matches outside the valid range are
/// skipped rather than reported.
///
/// # Examples
///
/// ```
/// use trip_links::geo::{parse_map_url, ParseFailure, ParseOutcome};
///
/// let outcome = parse_map_url("https://map.naver.com/v5/?c=126.9780,37.5665,15");
/// assert_eq!(outcome.source(), Some("Naver Map"));
///
/// assert_eq!(parse_map_url(""), ParseOutcome::Failure(ParseFailure::InvalidUrl));
/// ```
pub fn parse_map_url(url: &str) -> ParseOutcome {
    let url = url.trim();
    if url.is_empty() {
        return ParseOutcome::Failure(ParseFailure::InvalidUrl);
    }

    let attempts = MapProvider::for_url(url)
        .into_iter()
        .chain(MapProvider::FALLBACK_ORDER);

    for provider in attempts {
        trace!(provider = provider.label(), "trying provider");
        if let Some(coordinate) = provider.extract(url) {
            debug!(provider = provider.label(), %coordinate, "extracted coordinate");
            return ParseOutcome::Success(ParsedLocation {
                coordinate,
                source: provider,
            });
        }
    }

    debug!(url, "no provider matched");
    ParseOutcome::Failure(ParseFailure::Unsupported)
}
