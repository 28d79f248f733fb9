use geo_types::Coord;

use crate::track::{Track, TrackPoint};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerPosition {
    // x is longitude, y is latitude
    pub position: Coord<f64>,
    /// Degrees clockwise from north.
    pub heading: f64,
}

// Splits a segment position into point index and fraction. The index
// saturates at `usize::MAX` for huge or infinite positions.
fn split_segment(segment: f64) -> (usize, f64) {
    let segment = segment.max(0.);
    let i = segment.floor();
    (i as usize, segment - i)
}

/// Fraction of the track's total distance covered at `segment`.
pub fn distance_progress(track: &Track, segment: f64) -> f64 {
    let points = track.points();
    let (i, segment_proportion) = split_segment(segment);
    if i >= points.len().saturating_sub(1) {
        return 1.;
    }
    // a track that never moves has covered nothing until it ends
    if track.total_distance() <= 0. {
        return 0.;
    }
    let p0 = &points[i];
    let p1 = &points[i + 1];

    let distance_diff = p1.cumulative_distance - p0.cumulative_distance;
    let distance_at_segment = p0.cumulative_distance + segment_proportion * distance_diff;

    distance_at_segment / track.total_distance()
}

/// Position and heading of the track marker at `segment`. `None` for a track
/// without points; a single-point track sits still with heading 0.
pub fn marker_position(track: &Track, segment: f64) -> Option<MarkerPosition> {
    let points = track.points();
    match points.len() {
        0 => return None,
        1 => {
            return Some(MarkerPosition {
                position: points[0].position,
                heading: 0.,
            })
        }
        _ => (),
    }

    let (mut i, mut segment_proportion) = split_segment(segment);
    if i >= points.len() - 1 {
        i = points.len() - 2;
        segment_proportion = 1.;
    }

    let p0 = &points[i];
    let p1 = &points[i + 1];

    let position = Coord {
        x: p0.longitude() + segment_proportion * (p1.longitude() - p0.longitude()),
        y: p0.latitude() + segment_proportion * (p1.latitude() - p0.latitude()),
    };

    let mut heading = heading_between_points(p0, p1);
    // Exactly on an inner vertex: blend in the incoming segment so the marker
    // doesn't snap around.
    if segment_proportion == 0. && i > 0 {
        let heading_prev = heading_between_points(&points[i - 1], p0);
        heading = (heading + heading_prev) / 2.;
    }

    Some(MarkerPosition { position, heading })
}

// Planar bearing, fine for the extents we draw.
pub fn heading_between_points(p0: &TrackPoint, p1: &TrackPoint) -> f64 {
    (p1.longitude() - p0.longitude())
        .atan2(p1.latitude() - p0.latitude())
        .to_degrees()
}
