/* The playback clock drives one shared "current time" across every loaded
track. It is frame driven: the host calls `PlaybackClock::step` once per
rendered frame after the clock asked for it through `FrameScheduler`. A step
that finds the clock paused does nothing and asks for nothing, so pausing is
all it takes to stop the loop.

The actual time arithmetic lives in `step`, a pure function over
`PlaybackState`, so it can be tested without a scheduler or a real clock.
*/

use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};

use crate::track::Track;

/// Simulated milliseconds per real millisecond.
pub const DEFAULT_SPEED_MULTIPLIER: f64 = 60.;

/// The union of the time spans of all loaded tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlaybackRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl PlaybackRange {
    pub fn of_tracks<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Option<Self> {
        tracks.into_iter().fold(None, |range, track| {
            let start = track.start_time();
            let end = track.end_time();
            Some(match range {
                None => PlaybackRange {
                    min: start,
                    max: end,
                },
                Some(PlaybackRange { min, max }) => PlaybackRange {
                    min: min.min(start),
                    max: max.max(end),
                },
            })
        })
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.min <= time && time <= self.max
    }

    pub fn clamp(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        time.max(self.min).min(self.max)
    }
}

pub trait FrameScheduler {
    /// Ask the host to call `PlaybackClock::step` on the next frame.
    fn request_next_step(&mut self);
}

/// A scheduler for hosts that poll: the render loop checks `take_request`
/// every frame and steps the clock if it returns true.
pub struct ManualScheduler {
    pending: bool,
    total_requests: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler {
            pending: false,
            total_requests: 0,
        }
    }

    pub fn take_request(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn total_requests(&self) -> usize {
        self.total_requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_next_step(&mut self) {
        self.pending = true;
        self.total_requests += 1;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_time: Option<DateTime<Utc>>,
    pub is_playing: bool,
    pub speed_multiplier: f64,
    pub range: Option<PlaybackRange>,
}

impl PlaybackState {
    pub fn new(speed_multiplier: f64) -> Self {
        PlaybackState {
            current_time: None,
            is_playing: false,
            speed_multiplier,
            range: None,
        }
    }

    /// Advance by `elapsed_ms` of real time. Stops exactly on `range.max`.
    pub fn advance(&self, elapsed_ms: f64) -> PlaybackState {
        if !self.is_playing {
            return *self;
        }
        let (range, current_time) = match (self.range, self.current_time) {
            (Some(range), Some(current_time)) => (range, current_time),
            _ => {
                return PlaybackState {
                    is_playing: false,
                    ..*self
                }
            }
        };

        let delta_ns = (elapsed_ms.max(0.) * self.speed_multiplier * 1_000_000.).round();
        let advanced = if delta_ns.is_finite() && delta_ns < i64::MAX as f64 {
            current_time
                .checked_add_signed(TimeDelta::nanoseconds(delta_ns as i64))
                .unwrap_or(range.max)
        } else {
            range.max
        };

        if advanced >= range.max {
            PlaybackState {
                current_time: Some(range.max),
                is_playing: false,
                ..*self
            }
        } else {
            PlaybackState {
                current_time: Some(range.clamp(advanced)),
                ..*self
            }
        }
    }

    /// The state after the set of loaded tracks changed.
    pub fn with_range(&self, range: Option<PlaybackRange>) -> PlaybackState {
        let current_time = match range {
            None => None,
            Some(range) => match self.current_time {
                Some(time) if range.contains(time) => Some(time),
                _ => Some(range.min),
            },
        };
        PlaybackState {
            current_time,
            range,
            ..*self
        }
    }
}

/// One frame worth of playback: `(now, last_tick, state) -> state`.
pub fn step(now: Instant, last_tick: Instant, state: &PlaybackState) -> PlaybackState {
    let elapsed = now.saturating_duration_since(last_tick);
    state.advance(elapsed.as_nanos() as f64 / 1_000_000.)
}

pub struct PlaybackClock<S: FrameScheduler> {
    state: PlaybackState,
    last_tick: Instant,
    scheduler: S,
}

impl<S: FrameScheduler> PlaybackClock<S> {
    pub fn new(scheduler: S, speed_multiplier: f64) -> Self {
        PlaybackClock {
            state: PlaybackState::new(speed_multiplier),
            last_tick: Instant::now(),
            scheduler,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.state.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.state.speed_multiplier
    }

    pub fn range(&self) -> Option<PlaybackRange> {
        self.state.range
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn set_speed_multiplier(&mut self, speed_multiplier: f64) -> Result<()> {
        if !speed_multiplier.is_finite() || speed_multiplier < 0. {
            bail!("Invalid playback speed {}", speed_multiplier);
        }
        self.state.speed_multiplier = speed_multiplier;
        Ok(())
    }

    /// Start or stop playback. `now` becomes the reference for the next step
    /// so toggling never jumps in time. Starting without any track is refused.
    pub fn set_playing(&mut self, playing: bool, now: Instant) {
        if playing && self.state.range.is_none() {
            warn!("Cannot start playback without any track");
            self.state.is_playing = false;
            return;
        }
        if playing == self.state.is_playing {
            return;
        }
        self.state.is_playing = playing;
        self.last_tick = now;
        if playing {
            info!("Playback started at {:?}", self.state.current_time);
            self.scheduler.request_next_step();
        } else {
            info!("Playback paused at {:?}", self.state.current_time);
        }
    }

    pub fn play(&mut self, now: Instant) {
        self.set_playing(true, now)
    }

    pub fn pause(&mut self, now: Instant) {
        self.set_playing(false, now)
    }

    pub fn toggle(&mut self, now: Instant) {
        self.set_playing(!self.state.is_playing, now)
    }

    /// Jump to `time`, clamped into the current range. Ignored without a range.
    pub fn seek(&mut self, time: DateTime<Utc>) {
        if let Some(range) = self.state.range {
            self.state.current_time = Some(range.clamp(time));
        }
    }

    pub fn set_range(&mut self, range: Option<PlaybackRange>) {
        if range != self.state.range {
            debug!("Playback range changed to {range:?}");
        }
        self.state = self.state.with_range(range);
    }

    /// Called by the host once per frame.
    pub fn step(&mut self, now: Instant) {
        if !self.state.is_playing {
            return;
        }
        self.state = step(now, self.last_tick, &self.state);
        self.last_tick = now;
        if self.state.is_playing {
            self.scheduler.request_next_step();
        } else {
            info!("Playback stopped at {:?}", self.state.current_time);
        }
    }
}
