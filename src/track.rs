use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use geo_types::{Coord, LineString, Rect};
use itertools::{Itertools, MinMaxResult};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

pub const DEFAULT_LAYER_PREFIX: &str = "track-";

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out track ids. Ids from one allocator are unique and increasing.
pub trait IdAllocator {
    fn next_id(&mut self) -> TrackId;
}

pub struct SequentialIdAllocator {
    last: u64,
}

impl SequentialIdAllocator {
    pub fn new() -> Self {
        SequentialIdAllocator { last: 0 }
    }

    // Useful when restoring a session that already used some ids.
    pub fn starting_after(last: TrackId) -> Self {
        SequentialIdAllocator { last: last.0 }
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn next_id(&mut self) -> TrackId {
        self.last += 1;
        TrackId(self.last)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TimingField {
    #[strum(serialize = "start time")]
    StartTime,
    #[strum(serialize = "end time")]
    EndTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("Track point is missing time data for {0}")]
    MissingTimingData(TimingField),
}

// What a file parser hands us. `cumulative_distance` is parallel to `points`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPoint {
    pub time: Option<DateTime<Utc>>,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawDuration {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_duration: TimeDelta,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawTrack {
    pub name: String,
    pub points: Vec<RawPoint>,
    pub cumulative_distance: Vec<f64>,
    pub total_distance: f64,
    pub duration: RawDuration,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackPoint {
    // x is longitude, y is latitude
    pub position: Coord<f64>,
    pub time: DateTime<Utc>,
    pub cumulative_distance: f64,
}

impl TrackPoint {
    pub fn longitude(&self) -> f64 {
        self.position.x
    }

    pub fn latitude(&self) -> f64 {
        self.position.y
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrackDuration {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total: TimeDelta,
}

/// A recorded track. Immutable once built; points are ordered by time.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    id: TrackId,
    name: String,
    points: Vec<TrackPoint>,
    total_distance: f64,
    duration: TrackDuration,
}

impl Track {
    /// Points without a timestamp are skipped. Fails only when the overall
    /// start or end time is missing (start time is reported first).
    pub fn new(id: TrackId, raw: &RawTrack) -> Result<Self, TrackError> {
        let points = raw
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, point)| {
                let time = point.time?;
                Some(TrackPoint {
                    position: Coord {
                        x: point.longitude,
                        y: point.latitude,
                    },
                    time,
                    // a short distance array is the parser's bug, not ours to reject
                    cumulative_distance: raw
                        .cumulative_distance
                        .get(i)
                        .copied()
                        .unwrap_or(f64::NAN),
                })
            })
            .collect();

        let duration = TrackDuration {
            start_time: ensure_time(raw.duration.start_time, TimingField::StartTime)?,
            end_time: ensure_time(raw.duration.end_time, TimingField::EndTime)?,
            total: raw.duration.total_duration,
        };

        Ok(Track {
            id,
            name: raw.name.clone(),
            points,
            total_distance: raw.total_distance,
            duration,
        })
    }

    pub fn with_allocator(ids: &mut impl IdAllocator, raw: &RawTrack) -> Result<Self, TrackError> {
        Self::new(ids.next_id(), raw)
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn duration(&self) -> &TrackDuration {
        &self.duration
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.duration.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.duration.end_time
    }

    /// Key of the map layer/source drawing this track, e.g. `track-3`.
    pub fn layer_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.id)
    }

    pub fn line_string(&self) -> LineString<f64> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let lons = self.points.iter().map(|p| p.longitude()).minmax_by(f64::total_cmp);
        let lats = self.points.iter().map(|p| p.latitude()).minmax_by(f64::total_cmp);
        let (lon_min, lon_max) = min_max(lons)?;
        let (lat_min, lat_max) = min_max(lats)?;
        Some(Rect::new(
            Coord {
                x: lon_min,
                y: lat_min,
            },
            Coord {
                x: lon_max,
                y: lat_max,
            },
        ))
    }
}

fn ensure_time(
    time: Option<DateTime<Utc>>,
    field: TimingField,
) -> Result<DateTime<Utc>, TrackError> {
    time.ok_or(TrackError::MissingTimingData(field))
}

fn min_max(result: MinMaxResult<f64>) -> Option<(f64, f64)> {
    match result {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(x) => Some((x, x)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}
