//! Map URL coordinate extraction.
//!
//! Users paste share links from Google Maps, Naver Map, Kakao Map or
//! Apple Maps (or any page with `lat`/`lng` style parameters). This module
//! reads a validated [`Coordinate`] out of such a link, and goes the other
//! way for Google and Naver. Failure is always a value, never a panic.

mod coordinate;
mod links;
mod parse;
mod provider;

pub use coordinate::{
    Coordinate, EARTH_RADIUS_KM, FormattedCoordinate, InvalidCoordinate, distance_km,
    format_coordinate,
};
pub use links::{coordinate_to_google_maps_url, coordinate_to_naver_map_url};
pub use parse::{ParseFailure, ParseOutcome, ParsedLocation, parse_map_url};
pub use provider::MapProvider;
