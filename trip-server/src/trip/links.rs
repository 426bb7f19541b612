//! Share-link and navigation-link generation.
//!
//! Share links encode trip order as repeated `places[]` query parameters so
//! a trip can be rebuilt elsewhere. Route links open the provider's
//! directions UI with every stop in order.

use crate::domain::{InvalidPlaceId, Place, PlaceId};

/// Base URL of the provider's directions UI.
pub const ROUTE_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Query key carrying one place ID in a share link.
const SHARE_PARAM: &str = "places[]";

/// Error returned when a share link cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareLinkError {
    /// The link is not an absolute URL
    #[error("invalid share link: {0}")]
    InvalidUrl(String),

    /// A `places[]` value is not a usable place ID
    #[error("invalid place in share link: {0}")]
    InvalidPlaceId(#[from] InvalidPlaceId),
}

/// Generate a share link for the given stops.
///
/// Any query string or fragment already on `base_url` is dropped. An empty
/// trip yields the bare base URL.
///
/// # Example
///
/// ```ignore
/// let url = build_share_link("https://x/", &[p1, p2]);
/// // Returns: "https://x/?places[]=p1&places[]=p2"
/// ```
pub fn build_share_link(base_url: &str, stops: &[Place]) -> String {
    let base = base_url
        .split(['?', '#'])
        .next()
        .unwrap_or(base_url);

    if stops.is_empty() {
        return base.to_string();
    }

    let params: Vec<String> = stops
        .iter()
        .map(|p| format!("{SHARE_PARAM}={}", encode_component(p.place_id.as_str())))
        .collect();

    format!("{base}?{}", params.join("&"))
}

/// Extract the ordered place IDs from a share link.
///
/// Accepts the parameter key raw (`places[]`) or percent-encoded
/// (`places%5B%5D`). Other parameters and empty values are ignored.
pub fn parse_share_link(link: &str) -> Result<Vec<PlaceId>, ShareLinkError> {
    let url = reqwest::Url::parse(link).map_err(|e| ShareLinkError::InvalidUrl(e.to_string()))?;

    url.query_pairs()
        .filter(|(key, value)| key == SHARE_PARAM && !value.is_empty())
        .map(|(_, value)| PlaceId::new(value.into_owned()).map_err(ShareLinkError::from))
        .collect()
}

/// Generate a provider directions link visiting the stops in order.
///
/// The first stop is the origin, the last the destination, and everything
/// between becomes a waypoint. Each stop is identified by both its title
/// and its place ID.
///
/// # Example
///
/// ```ignore
/// let url = build_external_route_link(&[a, b, c]);
/// // Returns: "https://www.google.com/maps/dir/?api=1&origin=A&origin_place_id=a\
/// //           &destination=C&destination_place_id=c&waypoints=B&waypoint_place_ids=b"
/// ```
pub fn build_external_route_link(stops: &[Place]) -> String {
    let Some((first, rest)) = stops.split_first() else {
        return ROUTE_BASE_URL.to_string();
    };

    let origin = format!(
        "origin={}&origin_place_id={}",
        encode_component(&first.title),
        encode_component(first.place_id.as_str())
    );

    let Some((last, middle)) = rest.split_last() else {
        return format!("{ROUTE_BASE_URL}&{origin}");
    };

    let destination = format!(
        "destination={}&destination_place_id={}",
        encode_component(&last.title),
        encode_component(last.place_id.as_str())
    );

    let waypoint_names: Vec<String> = middle.iter().map(|p| encode_component(&p.title)).collect();
    let waypoint_ids: Vec<String> = middle
        .iter()
        .map(|p| encode_component(p.place_id.as_str()))
        .collect();
    let waypoints = format!(
        "waypoints={}&waypoint_place_ids={}",
        waypoint_names.join("|"),
        waypoint_ids.join("|")
    );

    format!("{ROUTE_BASE_URL}&{origin}&{destination}&{waypoints}")
}

/// Percent-encode a URL component.
///
/// Leaves the same characters unescaped as JavaScript's
/// `encodeURIComponent`, so links match what the browser client produced.
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
