#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use track_replay_core::track::{RawDuration, RawPoint, RawTrack, Track, TrackId};

pub const BASE_TIMESTAMP_SEC: i64 = 1697349116;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn time(offset_sec: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(BASE_TIMESTAMP_SEC + offset_sec, 0).unwrap()
}

pub fn time_ms(offset_ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(BASE_TIMESTAMP_SEC * 1000 + offset_ms)
        .unwrap()
}

// (seconds since base, longitude, latitude, cumulative distance)
pub fn raw_track(name: &str, points: &[(i64, f64, f64, f64)]) -> RawTrack {
    let start_time = points.first().map(|p| time(p.0));
    let end_time = points.last().map(|p| time(p.0));
    RawTrack {
        name: name.to_owned(),
        points: points
            .iter()
            .map(|(t, lon, lat, _)| RawPoint {
                time: Some(time(*t)),
                longitude: *lon,
                latitude: *lat,
            })
            .collect(),
        cumulative_distance: points.iter().map(|p| p.3).collect(),
        total_distance: points.last().map(|p| p.3).unwrap_or(0.),
        duration: RawDuration {
            start_time,
            end_time,
            total_duration: match (start_time, end_time) {
                (Some(start), Some(end)) => end - start,
                _ => TimeDelta::zero(),
            },
        },
    }
}

pub fn track(id: u64, points: &[(i64, f64, f64, f64)]) -> Track {
    Track::new(TrackId(id), &raw_track(&format!("track {id}"), points)).unwrap()
}

/// t=0s dist 0, t=10s dist 100, t=20s dist 300.
pub fn three_point_track() -> Track {
    track(
        1,
        &[
            (0, 151.20, -33.80, 0.),
            (10, 151.21, -33.81, 100.),
            (20, 151.23, -33.82, 300.),
        ],
    )
}

/// A track spanning `[start_sec, end_sec]` with two points.
pub fn spanning_track(id: u64, start_sec: i64, end_sec: i64) -> Track {
    track(
        id,
        &[(start_sec, 120.16, 30.27, 0.), (end_sec, 120.17, 30.28, 1000.)],
    )
}

pub const SAMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="track_replay_core tests" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata>
    <name>Morning ride</name>
  </metadata>
  <trk>
    <name>Laojunshan</name>
    <trkseg>
      <trkpt lat="30.2719716" lon="120.163856"><time>2023-10-15T05:51:56Z</time></trkpt>
      <trkpt lat="30.2719810" lon="120.1639266"><time>2023-10-15T05:51:57Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="30.2729810" lon="120.1649266"></trkpt>
      <trkpt lat="30.2739810" lon="120.1659266"><time>2023-10-15T05:52:30Z</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <trkseg>
      <trkpt lat="30.28" lon="120.17"><time>2023-10-15T06:00:00Z</time></trkpt>
      <trkpt lat="30.29" lon="120.18"><time>2023-10-15T06:10:00Z</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <name>No timing</name>
    <trkseg>
      <trkpt lat="30.28" lon="120.17"></trkpt>
      <trkpt lat="30.29" lon="120.18"></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

pub const ROUTES_ONLY_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="track_replay_core tests" xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <name>Planned</name>
    <rtept lat="30.28" lon="120.17"></rtept>
    <rtept lat="30.29" lon="120.18"></rtept>
  </rte>
</gpx>
"#;

pub const EMPTY_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="track_replay_core tests" xmlns="http://www.topografix.com/GPX/1/1">
</gpx>
"#;
