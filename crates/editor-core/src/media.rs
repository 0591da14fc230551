//! Playback surface contract.
//!
//! The controller never polls the media element. It subscribes once and
//! receives [`MediaEvent`]s through an unbounded channel; teardown
//! unsubscribes.

use tokio::sync::mpsc::UnboundedSender;

/// Notification from the playback surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved (tick or seek), in seconds.
    PositionChanged(f64),
    /// Media metadata loaded; total duration in seconds.
    DurationChanged(f64),
    Played,
    Paused,
    Ended,
}

/// Handle returned by [`PlaybackSurface::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Anything that can play the loaded audio.
pub trait PlaybackSurface: Send {
    fn position(&self) -> f64;

    /// Total duration, `None` until metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, secs: f64);

    /// Volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f64);

    /// Drop the current media. Playback stops at zero and the duration is
    /// unknown until the next media's metadata loads.
    fn unload(&mut self);

    /// Start delivering events to `listener`.
    fn subscribe(&mut self, listener: UnboundedSender<MediaEvent>) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// In-process playback clock with no audio output.
///
/// Advances only when [`SimulatedPlayback::advance`] is called, which makes
/// it deterministic for tests and usable for a terminal preview.
#[derive(Debug, Default)]
pub struct SimulatedPlayback {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    volume: f64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, UnboundedSender<MediaEvent>)>,
}

impl SimulatedPlayback {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Simulate metadata loading.
    pub fn load_metadata(&mut self, duration: f64) {
        self.duration = Some(duration);
        self.emit(MediaEvent::DurationChanged(duration));
    }

    /// Move the playhead forward by `dt` seconds if playing.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let mut next = self.position + dt.max(0.0);
        let ended = match self.duration {
            Some(total) if next >= total => {
                next = total;
                true
            }
            _ => false,
        };
        self.position = next;
        self.emit(MediaEvent::PositionChanged(next));
        if ended {
            self.playing = false;
            self.emit(MediaEvent::Ended);
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&mut self, event: MediaEvent) {
        // Receivers that went away are dropped from the list.
        self.listeners.retain(|(_, tx)| tx.send(event).is_ok());
    }
}

impl PlaybackSurface for SimulatedPlayback {
    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.emit(MediaEvent::Played);
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.emit(MediaEvent::Paused);
        }
    }

    fn seek(&mut self, secs: f64) {
        let mut target = secs.max(0.0);
        if let Some(total) = self.duration {
            target = target.min(total);
        }
        self.position = target;
        self.emit(MediaEvent::PositionChanged(target));
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn unload(&mut self) {
        self.pause();
        self.duration = None;
        self.position = 0.0;
        self.emit(MediaEvent::PositionChanged(0.0));
    }

    fn subscribe(&mut self, listener: UnboundedSender<MediaEvent>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }
}
