//! Map providers and their coordinate extraction patterns.
//!
//! Each provider owns an ordered list of regular expressions. A pattern
//! yields a coordinate only if its first match parses and passes range
//! validation; otherwise the next pattern is tried.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::Coordinate;

/// A map-sharing service whose URLs we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapProvider {
    Google,
    Naver,
    Kakao,
    Apple,
    /// Plain `lat`/`lng` style parameters from any site.
    Generic,
}

/// Which capture group holds which axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisOrder {
    LatLng,
    LngLat,
}

struct Pattern {
    regex: Regex,
    order: AxisOrder,
}

impl Pattern {
    fn new(source: &str, order: AxisOrder) -> Self {
        Self {
            // Patterns are string literals below; a bad one is a programming error.
            regex: Regex::new(source).expect("map URL pattern must compile"),
            order,
        }
    }

    fn extract(&self, url: &str) -> Option<Coordinate> {
        let caps = self.regex.captures(url)?;
        let first: f64 = caps.get(1)?.as_str().parse().ok()?;
        let second: f64 = caps.get(2)?.as_str().parse().ok()?;

        let (lat, lng) = match self.order {
            AxisOrder::LatLng => (first, second),
            AxisOrder::LngLat => (second, first),
        };

        match Coordinate::new(lat, lng) {
            Ok(c) => Some(c),
            Err(e) => {
                trace!(pattern = self.regex.as_str(), error = %e, "match rejected");
                None
            }
        }
    }
}

// ASCII digits only: `\d` in `regex` also matches other scripts' digits,
// which `f64::from_str` rejects.
const NUM: &str = r"(-?[0-9]+\.?[0-9]*)";

static GOOGLE: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new(&format!(r"@{NUM},{NUM}"), AxisOrder::LatLng),
        Pattern::new(&format!(r"[?&]q={NUM},{NUM}"), AxisOrder::LatLng),
        Pattern::new(&format!(r"[?&]ll={NUM},{NUM}"), AxisOrder::LatLng),
        Pattern::new(&format!(r"[?&]center={NUM},{NUM}"), AxisOrder::LatLng),
    ]
});

static NAVER: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new(&format!(r"[?&]c={NUM},{NUM}"), AxisOrder::LngLat),
        Pattern::new(&format!(r"naver\.com.*?{NUM},{NUM}"), AxisOrder::LngLat),
    ]
});

static KAKAO: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new(&format!(r"[?&]urlX={NUM}.*?[?&]urlY={NUM}"), AxisOrder::LngLat),
        Pattern::new(&format!(r"/map/[^,]*,{NUM},{NUM}"), AxisOrder::LatLng),
    ]
});

static APPLE: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new(&format!(r"[?&]ll={NUM},{NUM}"), AxisOrder::LatLng),
        Pattern::new(&format!(r"[?&]q={NUM},{NUM}"), AxisOrder::LatLng),
    ]
});

static GENERIC: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new(&format!(r"latitude={NUM}.*?longitude={NUM}"), AxisOrder::LatLng),
        Pattern::new(&format!(r"lat={NUM}.*?lng={NUM}"), AxisOrder::LatLng),
        // Bare pairs need 4+ decimals so short integers don't match.
        Pattern::new(r"(-?[0-9]{1,3}\.[0-9]{4,}),(-?[0-9]{1,3}\.[0-9]{4,})", AxisOrder::LatLng),
    ]
});

impl MapProvider {
    /// Providers tried first when their domain appears in the URL, in this order.
    pub const DOMAIN_PRIORITY: [MapProvider; 4] = [
        MapProvider::Apple,
        MapProvider::Naver,
        MapProvider::Kakao,
        MapProvider::Google,
    ];

    /// Order used once domain-prioritised attempts have failed.
    pub const FALLBACK_ORDER: [MapProvider; 5] = [
        MapProvider::Google,
        MapProvider::Naver,
        MapProvider::Kakao,
        MapProvider::Apple,
        MapProvider::Generic,
    ];

    /// Human-readable name reported alongside a parsed coordinate.
    pub fn label(&self) -> &'static str {
        match self {
            MapProvider::Google => "Google Maps",
            MapProvider::Naver => "Naver Map",
            MapProvider::Kakao => "Kakao Map",
            MapProvider::Apple => "Apple Maps",
            MapProvider::Generic => "Generic",
        }
    }

    /// Substrings that mark a URL as belonging to this provider.
    ///
    /// Matching is plain substring containment on the whole URL, not host
    /// parsing, so shortened or redirect URLs that merely mention the
    /// provider still route here.
    pub fn domain_hints(&self) -> &'static [&'static str] {
        match self {
            MapProvider::Google => &["google.com", "goo.gl"],
            MapProvider::Naver => &["naver.com"],
            MapProvider::Kakao => &["kakao.com"],
            MapProvider::Apple => &["maps.apple.com"],
            MapProvider::Generic => &[],
        }
    }

    /// Whether `url` mentions one of this provider's domains.
    pub fn matches_domain(&self, url: &str) -> bool {
        self.domain_hints().iter().any(|hint| url.contains(hint))
    }

    /// Providers whose domain hints appear in `url`, in priority order.
    pub fn for_url(url: &str) -> Vec<MapProvider> {
        Self::DOMAIN_PRIORITY
            .into_iter()
            .filter(|p| p.matches_domain(url))
            .collect()
    }

    /// Try each of this provider's patterns in order.
    pub fn extract(&self, url: &str) -> Option<Coordinate> {
        self.patterns().iter().find_map(|p| p.extract(url))
    }

    fn patterns(&self) -> &'static [Pattern] {
        match self {
            MapProvider::Google => GOOGLE.as_slice(),
            MapProvider::Naver => NAVER.as_slice(),
            MapProvider::Kakao => KAKAO.as_slice(),
            MapProvider::Apple => APPLE.as_slice(),
            MapProvider::Generic => GENERIC.as_slice(),
        }
    }
}

impl fmt::Display for MapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
