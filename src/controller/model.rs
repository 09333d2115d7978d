use std::collections::VecDeque;
use std::time::Duration;

use crate::catalog::{Catalog, Direction, TrackId};
use crate::error::CatalogError;
use crate::media::{Generation, MediaEvent, MediaPrimitive, Tick};

use super::notice::Notice;
use super::session::PlaybackSession;

/// Mediates between user intents, the session and a media primitive.
pub struct PlaybackController<M: MediaPrimitive> {
    catalog: Catalog,
    session: PlaybackSession,
    media: M,
    generation: Generation,
    notices: VecDeque<Notice>,
    auto_advance: bool,
}

impl<M: MediaPrimitive> PlaybackController<M> {
    /// Create a controller with an empty session.
    pub fn new(catalog: Catalog, media: M) -> Self {
        Self {
            catalog,
            session: PlaybackSession::default(),
            media,
            generation: Generation::default(),
            notices: VecDeque::new(),
            auto_advance: false,
        }
    }

    /// Advance to the next track when the current one ends.
    pub fn with_auto_advance(mut self, on: bool) -> Self {
        self.auto_advance = on;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Copy of the session for renderers.
    pub fn snapshot(&self) -> PlaybackSession {
        self.session.clone()
    }

    /// Generation of the most recent load.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Drain notices queued since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Select `id`, reset the transport position and start playing it.
    ///
    /// Playback failures are recovered locally; only an unknown id is an error.
    pub fn select(&mut self, id: &TrackId) -> Result<(), CatalogError> {
        let track = self.catalog.get(id)?;
        let source = track.source.clone();
        let hint = track.duration;

        self.generation = self.generation.next();
        self.session = PlaybackSession {
            selected: Some(id.clone()),
            // Optimistic; corrected if the primitive refuses.
            is_playing: true,
            position: Duration::ZERO,
            duration: None,
        };
        log::debug!("select {id} ({})", self.generation);

        let started = self
            .media
            .load(&source, hint, self.generation)
            .and_then(|()| self.media.play());
        if let Err(e) = started {
            self.playback_failed(e.to_string());
        }
        Ok(())
    }

    /// Flip between playing and paused. No-op when nothing is selected.
    pub fn toggle_play_pause(&mut self) {
        if self.session.selected.is_none() {
            return;
        }

        if self.session.is_playing {
            log::debug!("pause");
            self.media.pause();
            self.session.is_playing = false;
        } else {
            log::debug!("play");
            self.session.is_playing = true;
            if let Err(e) = self.media.play() {
                self.playback_failed(e.to_string());
            }
        }
    }

    pub fn next(&mut self) {
        self.step(Direction::Next);
    }

    pub fn prev(&mut self) {
        self.step(Direction::Prev);
    }

    fn step(&mut self, direction: Direction) {
        let Some(current) = self.session.selected.as_ref() else {
            return;
        };

        let target = match self.catalog.neighbor(current, direction) {
            Ok(track) => track.id.clone(),
            Err(e) => {
                log::warn!("cannot move {direction:?}: {e}");
                return;
            }
        };
        if let Err(e) = self.select(&target) {
            log::error!("cannot move {direction:?} to {target}: {e}");
        }
    }

    /// Seek from a click at `offset_x` on a progress bar `width` units wide.
    pub fn seek(&mut self, offset_x: f64, width: f64) {
        if !(width.is_finite() && width > 0.0) || !offset_x.is_finite() {
            return;
        }
        self.seek_fraction(offset_x / width);
    }

    /// Seek to `fraction` of the track. No-op while the duration is unknown or zero.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(duration) = self.session.duration.filter(|d| !d.is_zero()) else {
            return;
        };
        if !fraction.is_finite() {
            return;
        }

        let position = duration.mul_f64(fraction.clamp(0.0, 1.0)).min(duration);
        log::debug!("seek to {position:?} of {duration:?}");
        self.session.position = position;
        self.media.seek_to(position);
    }

    /// Seek relative to the current position by `delta` of the track length.
    pub fn seek_relative(&mut self, delta: f64) {
        let current = self.session.progress();
        self.seek_fraction(current + delta);
    }

    /// Dispatch an event from the media primitive.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Tick(tick) => self.on_tick(tick),
            MediaEvent::Failed { generation, reason } => self.on_failure(generation, reason),
            MediaEvent::Ended { generation } => self.on_ended(generation),
        }
    }

    /// Periodic position report. Ticks from an older load are dropped.
    pub fn on_tick(&mut self, tick: Tick) {
        if !self.is_current(tick.generation) {
            log::trace!("dropping stale tick from {}", tick.generation);
            return;
        }

        let duration = tick.duration.filter(|d| !d.is_zero());
        self.session.duration = duration;
        self.session.position = match duration {
            Some(d) => tick.position.min(d),
            None => Duration::ZERO,
        };
    }

    /// The primitive could not start playback of `generation`.
    pub fn on_failure(&mut self, generation: Generation, reason: String) {
        if !self.is_current(generation) {
            log::trace!("dropping stale failure from {generation}: {reason}");
            return;
        }
        self.playback_failed(reason);
    }

    /// The media of `generation` played to its end.
    pub fn on_ended(&mut self, generation: Generation) {
        if !self.is_current(generation) {
            log::trace!("dropping stale end-of-media from {generation}");
            return;
        }

        self.session.is_playing = false;
        if let Some(d) = self.session.duration {
            self.session.position = d;
        }
        if self.auto_advance {
            self.next();
        }
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.session.selected.is_some() && generation == self.generation
    }

    fn playback_failed(&mut self, reason: String) {
        let track = self.session.selected.clone();
        log::warn!(
            "playback failed for {}: {reason}",
            track.as_ref().map(TrackId::as_str).unwrap_or("-")
        );
        self.session.is_playing = false;
        self.notices.push_back(Notice {
            track,
            message: format!("cannot play: {reason}"),
        });
    }
}
