use super::backend::RodioMedia;
use super::primitive::MediaPrimitive;
use super::sink::{
    MediaSink, SinkOpener, effective_duration, fade_schedule, reported_position,
};
use super::thread::MediaThread;
use super::types::{Generation, MediaEvent, Tick};
use crate::catalog::{Catalog, Track, TrackId};
use crate::controller::PlaybackController;
use crate::error::PlaybackError;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

#[test]
fn effective_duration_prefers_decoder_then_hint() {
    let secs = Duration::from_secs;
    assert_eq!(effective_duration(Some(secs(10)), Some(secs(9))), Some(secs(10)));
    assert_eq!(effective_duration(None, Some(secs(9))), Some(secs(9)));
    assert_eq!(effective_duration(None, None), None);
    // Zero-length reports mean "unknown", not "empty".
    assert_eq!(effective_duration(Some(Duration::ZERO), None), None);
}

#[test]
fn reported_position_adds_offset_and_clamps_to_duration() {
    let secs = Duration::from_secs;
    assert_eq!(reported_position(secs(30), secs(5), Some(secs(60))), secs(35));
    assert_eq!(reported_position(secs(58), secs(5), Some(secs(60))), secs(60));
    assert_eq!(reported_position(Duration::ZERO, secs(5), None), secs(5));
}

#[test]
fn fade_schedule_never_sleeps_zero() {
    assert_eq!(fade_schedule(400), (20, 20));
    assert_eq!(fade_schedule(5), (20, 1));
}

#[test]
fn generation_is_ordered_and_displayed() {
    let g1 = Generation::default().next();
    let g2 = g1.next();
    assert!(g2 > g1);
    assert_ne!(g1, g2);
    assert_eq!(g2.to_string(), "gen#2");
}

#[test]
fn events_carry_their_generation() {
    let g = Generation::default().next();
    let tick = MediaEvent::Tick(Tick {
        generation: g,
        position: Duration::ZERO,
        duration: None,
    });
    assert!(matches!(tick, MediaEvent::Tick(Tick { generation, .. }) if generation == g));
}

#[derive(Debug)]
struct SinkState {
    playing: bool,
    stopped: bool,
    pos: Duration,
    len: Duration,
    seekable: bool,
    volume: f32,
}

/// Sink whose clock the test moves by hand.
#[derive(Clone)]
struct FakeSink(Rc<RefCell<SinkState>>);

impl FakeSink {
    fn playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn run_to_end(&self) {
        let mut s = self.0.borrow_mut();
        s.pos = s.len;
    }

    fn advance(&self, by: Duration) {
        let mut s = self.0.borrow_mut();
        s.pos = (s.pos + by).min(s.len);
    }
}

impl MediaSink for FakeSink {
    fn play(&self) {
        self.0.borrow_mut().playing = true;
    }

    fn pause(&self) {
        self.0.borrow_mut().playing = false;
    }

    fn stop(&self) {
        let mut s = self.0.borrow_mut();
        s.stopped = true;
        s.playing = false;
    }

    fn empty(&self) -> bool {
        let s = self.0.borrow();
        s.stopped || s.pos >= s.len
    }

    fn get_pos(&self) -> Duration {
        self.0.borrow().pos
    }

    fn try_seek(&self, pos: Duration) -> Result<(), String> {
        // rodio accepts a seek on a drained sink and does nothing.
        if self.empty() {
            return Ok(());
        }
        let mut s = self.0.borrow_mut();
        if !s.seekable {
            return Err("seeking is not supported".into());
        }
        s.pos = pos.min(s.len);
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.0.borrow().volume
    }

    fn set_volume(&self, volume: f32) {
        self.0.borrow_mut().volume = volume;
    }
}

/// Output that opens every source as a `len`-long track unless it is broken.
#[derive(Clone)]
struct FakeOutput {
    len: Duration,
    seekable: bool,
    broken: Rc<RefCell<HashSet<PathBuf>>>,
    opened: Rc<RefCell<Vec<(Duration, FakeSink)>>>,
}

impl FakeOutput {
    fn new(len_secs: u64, seekable: bool) -> Self {
        Self {
            len: Duration::from_secs(len_secs),
            seekable,
            broken: Rc::default(),
            opened: Rc::default(),
        }
    }

    fn break_source(&self, path: &str) {
        self.broken.borrow_mut().insert(PathBuf::from(path));
    }

    fn repair_source(&self, path: &str) {
        self.broken.borrow_mut().remove(Path::new(path));
    }

    fn opens(&self) -> usize {
        self.opened.borrow().len()
    }

    fn last(&self) -> (Duration, FakeSink) {
        self.opened.borrow().last().cloned().unwrap()
    }
}

impl SinkOpener for FakeOutput {
    type Sink = FakeSink;

    fn open_at(
        &self,
        source: &Path,
        start_at: Duration,
    ) -> Result<(FakeSink, Option<Duration>), PlaybackError> {
        if self.broken.borrow().contains(source) {
            return Err(PlaybackError::Open {
                path: source.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let sink = FakeSink(Rc::new(RefCell::new(SinkState {
            playing: false,
            stopped: false,
            pos: Duration::ZERO,
            len: self.len.saturating_sub(start_at),
            seekable: self.seekable,
            volume: 1.0,
        })));
        self.opened.borrow_mut().push((start_at, sink.clone()));
        Ok((sink, Some(self.len)))
    }
}

const SONG: &str = "/music/song.mp3";

fn media_thread(
    len_secs: u64,
    seekable: bool,
) -> (MediaThread<FakeOutput>, FakeOutput, Receiver<MediaEvent>) {
    let output = FakeOutput::new(len_secs, seekable);
    let (tx, rx) = mpsc::channel();
    (MediaThread::new(output.clone(), tx), output, rx)
}

fn drain(rx: &Receiver<MediaEvent>) -> Vec<MediaEvent> {
    rx.try_iter().collect()
}

fn tick_position(event: &MediaEvent) -> Option<Duration> {
    match event {
        MediaEvent::Tick(t) => Some(t.position),
        _ => None,
    }
}

/// Load and play `SONG`, then let it run to the end.
fn play_to_end(
    thread: &mut MediaThread<FakeOutput>,
    output: &FakeOutput,
    rx: &Receiver<MediaEvent>,
    generation: Generation,
) {
    thread.load(PathBuf::from(SONG), None, generation);
    thread.play();
    output.last().1.run_to_end();
    thread.on_timeout();
    assert_eq!(drain(rx), vec![MediaEvent::Ended { generation }]);
}

#[test]
fn play_after_failed_load_reports_the_failure_again() {
    let (mut thread, output, rx) = media_thread(100, true);
    let g = Generation::default().next();
    output.break_source(SONG);

    thread.load(PathBuf::from(SONG), None, g);
    assert!(matches!(drain(&rx)[..], [MediaEvent::Failed { generation, .. }] if generation == g));

    thread.play();
    assert!(matches!(drain(&rx)[..], [MediaEvent::Failed { generation, .. }] if generation == g));
    assert_eq!(output.opens(), 0);

    // Once the file is readable again, play picks it up.
    output.repair_source(SONG);
    thread.play();
    assert!(drain(&rx).is_empty());
    assert!(output.last().1.playing());
}

#[test]
fn failed_restart_after_end_is_reported() {
    let (mut thread, output, rx) = media_thread(100, true);
    let g = Generation::default().next();
    play_to_end(&mut thread, &output, &rx, g);

    output.break_source(SONG);
    thread.play();
    assert!(matches!(drain(&rx)[..], [MediaEvent::Failed { generation, .. }] if generation == g));

    thread.play();
    assert_eq!(drain(&rx).len(), 1);
}

#[test]
fn seek_after_end_plays_from_the_target() {
    let (mut thread, output, rx) = media_thread(100, true);
    let g = Generation::default().next();
    play_to_end(&mut thread, &output, &rx, g);

    thread.seek_to(Duration::from_secs(40));
    let events = drain(&rx);
    assert_eq!(events.len(), 1);
    assert_eq!(tick_position(&events[0]), Some(Duration::from_secs(40)));

    let (start_at, sink) = output.last();
    assert_eq!(start_at, Duration::from_secs(40));
    assert!(!sink.playing());

    thread.play();
    assert_eq!(output.last().0, Duration::from_secs(40));
    assert!(sink.playing());

    sink.advance(Duration::from_secs(5));
    thread.on_timeout();
    let events = drain(&rx);
    assert_eq!(tick_position(&events[0]), Some(Duration::from_secs(45)));
}

#[test]
fn play_after_end_restarts_from_the_top() {
    let (mut thread, output, rx) = media_thread(100, true);
    let g = Generation::default().next();
    play_to_end(&mut thread, &output, &rx, g);

    thread.play();
    let (start_at, sink) = output.last();
    assert_eq!(start_at, Duration::ZERO);
    assert!(sink.playing());

    thread.on_timeout();
    assert_eq!(tick_position(&drain(&rx)[0]), Some(Duration::ZERO));
}

#[test]
fn ended_is_reported_once_per_drain() {
    let (mut thread, output, rx) = media_thread(100, true);
    let g = Generation::default().next();
    play_to_end(&mut thread, &output, &rx, g);

    thread.on_timeout();
    thread.on_timeout();
    assert!(drain(&rx).is_empty());
}

#[test]
fn seek_rebuilds_the_sink_when_the_decoder_cannot_seek() {
    let (mut thread, output, rx) = media_thread(100, false);
    let g = Generation::default().next();
    thread.load(PathBuf::from(SONG), None, g);
    thread.play();
    let first = output.last().1;

    thread.seek_to(Duration::from_secs(30));
    let (start_at, sink) = output.last();
    assert_eq!(start_at, Duration::from_secs(30));
    assert!(sink.playing());
    assert!(!first.playing());
    assert_eq!(tick_position(&drain(&rx)[0]), Some(Duration::from_secs(30)));
}

#[test]
fn seek_in_place_when_supported() {
    let (mut thread, output, rx) = media_thread(100, true);
    thread.load(PathBuf::from(SONG), None, Generation::default().next());
    thread.play();

    thread.seek_to(Duration::from_secs(20));
    assert_eq!(output.opens(), 1);
    assert_eq!(tick_position(&drain(&rx)[0]), Some(Duration::from_secs(20)));
}

#[test]
fn missing_output_device_refuses_play_with_a_notice() {
    let (media, _events) = RodioMedia::without_output("no default device");
    let catalog = Catalog::load(vec![Track::new("a", "A", SONG)]).unwrap();
    let mut controller = PlaybackController::new(catalog, media);

    controller.select(&TrackId::new("a")).unwrap();
    assert!(!controller.session().is_playing);
    let notices = controller.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("no default device"));

    controller.toggle_play_pause();
    assert!(!controller.session().is_playing);
    assert_eq!(controller.take_notices().len(), 1);
}

#[test]
fn silent_backend_rejects_direct_commands() {
    let (mut media, _events) = RodioMedia::without_output("none");
    assert!(matches!(
        media.load(Path::new(SONG), None, Generation::default()),
        Err(PlaybackError::NoOutputDevice(_))
    ));
    assert!(matches!(media.play(), Err(PlaybackError::NoOutputDevice(_))));
    media.quit_softly(Duration::ZERO);
}
