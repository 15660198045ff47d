//! Build provider links from a coordinate.

use super::Coordinate;

/// Zoom level used for generated Naver links.
const NAVER_ZOOM: u8 = 15;

/// A Google Maps search link: `https://maps.google.com/?q={lat},{lng}`.
///
/// Numbers use their shortest natural representation, so `126.9780`
/// becomes `126.978`.
pub fn coordinate_to_google_maps_url(coordinate: &Coordinate) -> String {
    format!(
        "https://maps.google.com/?q={},{}",
        coordinate.latitude(),
        coordinate.longitude()
    )
}

/// A Naver Map link. Naver puts longitude first.
pub fn coordinate_to_naver_map_url(coordinate: &Coordinate) -> String {
    format!(
        "https://map.naver.com/v5/?c={},{},{NAVER_ZOOM}",
        coordinate.longitude(),
        coordinate.latitude()
    )
}
