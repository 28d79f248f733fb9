use chrono::{DateTime, Utc};
use geo_types::Coord;

const EARTH_RADIUS_IN_M: f64 = 6371000.0;

// Great-circle distance between two lon/lat coordinates, in meters.
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let d_lat = (to.y - from.y).to_radians();
    let d_lon = (to.x - from.x).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_IN_M * c
}

/// Milliseconds from `from` to `to` (negative if `to` is earlier).
pub fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1_000_000.0,
        // ~292 years, nanoseconds overflow
        None => delta.num_milliseconds() as f64,
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
