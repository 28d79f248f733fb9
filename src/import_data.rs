use std::{fs::File, io::BufReader, io::Read, path::Path};

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use geo_types::Coord;
use gpx::read;

use crate::track::{RawDuration, RawPoint, RawTrack};
use crate::utils::haversine_distance;

pub const ROUTES_NOT_SUPPORTED: &str =
    "GPX routes are not supported, because they do not have timing data.";
pub const NO_TRACKS_FOUND: &str = "No tracks found in GPX file.";

/// Load every track of a GPX file. The second value is a warning for files
/// that have nothing we can play.
pub fn load_gpx(file_path: impl AsRef<Path>) -> Result<(Vec<RawTrack>, Option<String>)> {
    let file_path = file_path.as_ref();
    let file_name = file_path
        .file_name()
        .and_then(|x| x.to_str())
        .unwrap_or("")
        .to_owned();
    load_gpx_from_reader(BufReader::new(File::open(file_path)?), &file_name)
}

pub fn load_gpx_from_reader<R: Read>(
    reader: R,
    file_name: &str,
) -> Result<(Vec<RawTrack>, Option<String>)> {
    let gpx_data = read(reader)?;

    if gpx_data.tracks.is_empty() {
        let warning = if gpx_data.routes.is_empty() {
            NO_TRACKS_FOUND
        } else {
            ROUTES_NOT_SUPPORTED
        };
        return Ok((Vec::new(), Some(warning.to_owned())));
    }

    let fallback_name = gpx_data
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(file_name);

    let mut raw_tracks = Vec::with_capacity(gpx_data.tracks.len());
    for (i, track) in gpx_data.tracks.iter().enumerate() {
        let name = match track.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            // "Run", "Run2", "Run3", ...
            _ if i > 0 => format!("{fallback_name}{}", i + 1),
            _ => fallback_name.to_owned(),
        };

        let points = track
            .segments
            .iter()
            .flat_map(|segment| segment.points.iter())
            .map(|point| -> Result<RawPoint> {
                let time = match &point.time {
                    Some(time) => Some(DateTime::<Utc>::from(DateTime::parse_from_rfc3339(
                        &time.format()?,
                    )?)),
                    None => None,
                };
                Ok(RawPoint {
                    time,
                    longitude: point.point().x(),
                    latitude: point.point().y(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        raw_tracks.push(build_raw_track(name, points));
    }

    info!("Loaded {} track(s) from {}", raw_tracks.len(), file_name);
    Ok((raw_tracks, None))
}

// Fills in what a parser is expected to precompute: distances and the overall
// time span.
pub fn build_raw_track(name: String, points: Vec<RawPoint>) -> RawTrack {
    let mut cumulative_distance = Vec::with_capacity(points.len());
    let mut total_distance = 0.;
    let mut prev: Option<Coord<f64>> = None;
    for point in &points {
        let coord = Coord {
            x: point.longitude,
            y: point.latitude,
        };
        if let Some(prev) = prev {
            total_distance += haversine_distance(prev, coord);
        }
        cumulative_distance.push(total_distance);
        prev = Some(coord);
    }

    let start_time = points.first().and_then(|p| p.time);
    let end_time = points.last().and_then(|p| p.time);
    let total_duration = match (start_time, end_time) {
        (Some(start), Some(end)) => end - start,
        _ => TimeDelta::zero(),
    };

    RawTrack {
        name,
        points,
        cumulative_distance,
        total_distance,
        duration: RawDuration {
            start_time,
            end_time,
            total_duration,
        },
    }
}
