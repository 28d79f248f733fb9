use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::ReplayConfig;
use crate::import_data;
use crate::interpolate::{distance_progress, marker_position, MarkerPosition};
use crate::playback::{FrameScheduler, PlaybackClock, PlaybackRange};
use crate::segment::segment_at;
use crate::track::{IdAllocator, RawTrack, SequentialIdAllocator, Track, TrackError, TrackId};

struct Warning {
    message: String,
    expires_at: Instant,
}

/// Where a track is at the clock's current time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackPosition {
    pub id: TrackId,
    pub segment: f64,
    pub distance_progress: f64,
    pub marker: Option<MarkerPosition>,
}

/// The set of loaded tracks plus the clock replaying them. Every change to the
/// set recomputes the playback range.
pub struct TrackStore<S: FrameScheduler, A: IdAllocator = SequentialIdAllocator> {
    config: ReplayConfig,
    tracks: Vec<Track>,
    ids: A,
    clock: PlaybackClock<S>,
    warnings: Vec<Warning>,
}

impl<S: FrameScheduler> TrackStore<S, SequentialIdAllocator> {
    pub fn new(config: ReplayConfig, scheduler: S) -> Self {
        Self::with_id_allocator(config, scheduler, SequentialIdAllocator::new())
    }
}

impl<S: FrameScheduler, A: IdAllocator> TrackStore<S, A> {
    pub fn with_id_allocator(config: ReplayConfig, scheduler: S, ids: A) -> Self {
        let clock = PlaybackClock::new(scheduler, config.playback.default_speed_multiplier);
        TrackStore {
            config,
            tracks: Vec::new(),
            ids,
            clock,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn clock(&self) -> &PlaybackClock<S> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock<S> {
        &mut self.clock
    }

    pub fn layer_id(&self, id: TrackId) -> String {
        format!("{}{}", self.config.tracks.layer_prefix, id)
    }

    /// Add a batch of parsed tracks. Tracks that can't be built are skipped
    /// with a warning, the rest of the batch still goes in. `now` is when
    /// those warnings start their lifetime, on the same clock later passed
    /// to `warnings`.
    pub fn add_raw_tracks(&mut self, raw_tracks: &[RawTrack], now: Instant) -> Vec<TrackId> {
        let mut added = Vec::new();
        for raw in raw_tracks {
            match Track::with_allocator(&mut self.ids, raw) {
                Ok(track) => {
                    info!(
                        "Added track {} \"{}\" with {} points",
                        track.id(),
                        track.name(),
                        track.points().len()
                    );
                    added.push(track.id());
                    self.tracks.push(track);
                }
                Err(e @ TrackError::MissingTimingData(_)) => {
                    self.warn(format!("Skipping track \"{}\": {}", raw.name, e), now);
                }
            }
        }
        self.update_range();
        added
    }

    pub fn add_gpx_file(
        &mut self,
        file_path: impl AsRef<Path>,
        now: Instant,
    ) -> Result<Vec<TrackId>> {
        let (raw_tracks, warning) = import_data::load_gpx(file_path)?;
        if let Some(warning) = warning {
            self.warn(warning, now);
        }
        Ok(self.add_raw_tracks(&raw_tracks, now))
    }

    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id() == id)?;
        let track = self.tracks.remove(index);
        info!("Removed track {}", id);
        self.update_range();
        Some(track)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.update_range();
    }

    fn update_range(&mut self) {
        self.clock.set_range(PlaybackRange::of_tracks(&self.tracks));
    }

    fn warn(&mut self, message: String, now: Instant) {
        warn!("{}", message);
        self.warnings.push(Warning {
            message,
            expires_at: now + Duration::from_millis(self.config.warnings.lifetime_ms),
        });
    }

    /// Warnings still visible at `now`; expired ones are dropped.
    pub fn warnings(&mut self, now: Instant) -> Vec<&str> {
        self.warnings.retain(|w| w.expires_at > now);
        self.warnings.iter().map(|w| w.message.as_str()).collect()
    }

    /// What the renderer needs for each track this frame.
    pub fn positions_at_current_time(&self) -> Vec<TrackPosition> {
        let current_time = self.clock.current_time();
        self.tracks
            .iter()
            .map(|track| {
                let segment = segment_at(track, current_time);
                TrackPosition {
                    id: track.id(),
                    segment,
                    distance_progress: distance_progress(track, segment),
                    marker: marker_position(track, segment),
                }
            })
            .collect()
    }
}
