use geo_types::Point;
use itinerary_lib::position::{from_lat_lng, lat, lng};
use leaflet::LatLng;

pub fn to_lat_lng(position: &Point) -> LatLng {
    LatLng::new(lat(position), lng(position))
}

pub fn to_point(lat_lng: &LatLng) -> Point {
    from_lat_lng(lat_lng.lat(), lat_lng.lng())
}

/// Distance in km, shown in metres when below one km.
pub fn format_distance(distance: f64) -> String {
    if distance > 1. {
        format!("{:.1} km", distance)
    } else {
        format!("{:.0} m", distance * 1000.)
    }
}

/// Titles are user input and end up in tooltip HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
