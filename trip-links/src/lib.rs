//! URL-encoded state for a travel itinerary app.
//!
//! Two independent, pure pieces the UI leans on:
//!
//! - [`geo`]: read a latitude/longitude out of a pasted map share link
//!   (Google, Naver, Kakao, Apple, or generic), build links back, and
//!   measure distances.
//! - [`navigation`]: encode "return here afterwards" into a link's query
//!   string and act on it when the flow finishes, with no server session.

pub mod geo;
pub mod navigation;
