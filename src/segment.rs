/* Resolving an instant into a "segment position": a real number whose integer
part is a point index `i` and whose fractional part is the progress from point
`i` to point `i + 1`. `0` is the first point, `points.len() - 1` is the last
point (or anything after it). The geometry queries in `interpolate` take the
same addressing.
*/

use chrono::{DateTime, Utc};

use crate::track::{Track, TrackPoint};
use crate::utils::millis_between;

pub fn last_segment(track: &Track) -> f64 {
    track.points().len().saturating_sub(1) as f64
}

pub fn segment_at(track: &Track, instant: Option<DateTime<Utc>>) -> f64 {
    let instant = match instant {
        None => return 0.,
        Some(instant) => instant,
    };
    if instant <= track.start_time() {
        return 0.;
    }
    if instant >= track.end_time() {
        return last_segment(track);
    }

    let points = track.points();
    let i = binary_search_time(points, instant);
    if i + 1 >= points.len() {
        return last_segment(track);
    }
    let p0 = &points[i];
    let p1 = &points[i + 1];

    let time_diff = millis_between(p0.time, p1.time);
    let time_into_segment = millis_between(p0.time, instant);
    // duplicated timestamps
    let segment_proportion = if time_diff == 0. {
        0.
    } else {
        // only leaves [0, 1] when the summary starts before the first point
        (time_into_segment / time_diff).clamp(0., 1.)
    };

    i as f64 + segment_proportion
}

// Index of the last point at or before `instant`. An exact hit returns that
// point. Falls back to 0 when every point is later.
fn binary_search_time(points: &[TrackPoint], instant: DateTime<Utc>) -> usize {
    let mut low: i64 = 0;
    let mut high: i64 = points.len() as i64 - 1;

    while low <= high {
        let mid = (low + high) / 2;
        let mid_time = points[mid as usize].time;
        if mid_time < instant {
            low = mid + 1;
        } else if mid_time > instant {
            high = mid - 1;
        } else {
            return mid as usize;
        }
    }

    high.max(0) as usize
}
