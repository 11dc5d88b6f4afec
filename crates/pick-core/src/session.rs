//! Picker session: refresh scheduler state machine + event channel.
//!
//! A `Session` owns the pixel buffer and the window exclusion set and
//! drives one picker invocation from window creation to termination.
//! Everything runs cooperatively on the caller's thread: each tick polls
//! the cursor, conditionally captures, repositions the host window and
//! requests a redraw. There is no reentrancy and no overlapping capture;
//! a tick that overruns its period delays the next tick.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::config::{ConfigError, PickerConfig};
use crate::reporter;
use crate::{CaptureRegion, Point, WindowExclusionSet, WindowHandle};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, host window not yet registered.
    Idle,
    /// Ticking.
    Running,
    /// Terminal state; the result can be collected.
    Stopped,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Terminal user input ending a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalInput {
    /// Escape or host window destroyed: end without reporting.
    Cancel,
    /// Enter, Space, mouse button up or click: report the sampled color.
    Confirm,
}

/// Events emitted by a session, for embeddings that subscribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// The session entered `Running`.
    Started,
    /// A capture succeeded; the current center color.
    Updated { color: Color },
    /// The session ended; `None` when cancelled.
    Ended { result: Option<Color> },
}

/// Polls the OS cursor position (implemented by pick-platform).
pub trait CursorTracker {
    fn position(&mut self) -> Point;
}

/// Captures a screen region into a pixel buffer (implemented by
/// pick-platform).
///
/// Contract: `region` dimensions must equal the buffer's. On failure the
/// implementation returns `false` and leaves `out` untouched, so the
/// previous frame stays visible.
pub trait ScreenSampler {
    fn capture(
        &mut self,
        region: &CaptureRegion,
        excluded: &WindowExclusionSet,
        out: &mut PixelBuffer,
    ) -> bool;
}

/// The host window collaborator, specified only at this boundary.
pub trait HostWindow {
    /// Platform identity for exclusion registration.
    fn handle(&self) -> WindowHandle;
    /// Move the window so its center sits at `center`.
    fn move_center_to(&mut self, center: Point);
    /// Redraw the preview from the latest buffer contents.
    fn redraw(&mut self, buffer: &PixelBuffer);
    /// Terminal input since the last poll, if any.
    fn poll_input(&mut self) -> Option<TerminalInput>;
}

/// One picker invocation, from start to cancel/confirm.
pub struct Session {
    config: PickerConfig,
    buffer: PixelBuffer,
    excluded: WindowExclusionSet,
    state: SessionState,
    tick_counter: u32,
    suppressed: bool,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
}

impl Session {
    /// Validate the configuration and allocate the session's buffer.
    pub fn new(config: PickerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffer = PixelBuffer::new(config.bound_width, config.bound_height);
        let (event_tx, event_rx) = bounded(256);
        Ok(Self {
            config,
            buffer,
            excluded: WindowExclusionSet::new(),
            state: SessionState::Idle,
            tick_counter: 0,
            suppressed: false,
            event_tx,
            event_rx,
        })
    }

    /// Subscribe to session events (`Started` / `Updated` / `Ended`).
    pub fn events(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn excluded(&self) -> &WindowExclusionSet {
        &self.excluded
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Register the host window for exclusion and start ticking.
    pub fn start(&mut self, host_window: WindowHandle) {
        if self.state != SessionState::Idle {
            warn!(state = ?self.state, "start ignored, session already started");
            return;
        }
        self.excluded.insert(host_window);
        self.transition(SessionState::Running);
        self.emit(SessionEvent::Started);
    }

    /// One scheduler tick.
    ///
    /// Capture runs on 1 of every `capture_ratio` ticks (the first tick
    /// always captures); window repositioning and redraw happen on every
    /// tick regardless.
    pub fn tick<C, S, H>(&mut self, cursor: &mut C, sampler: &mut S, host: &mut H)
    where
        C: CursorTracker + ?Sized,
        S: ScreenSampler + ?Sized,
        H: HostWindow + ?Sized,
    {
        if self.state != SessionState::Running {
            return;
        }

        let position = cursor.position();

        if self.tick_counter == 0 {
            let region = CaptureRegion::centered(
                position,
                self.buffer.width(),
                self.buffer.height(),
            );
            if sampler.capture(&region, &self.excluded, &mut self.buffer) {
                self.emit(SessionEvent::Updated {
                    color: reporter::center_color(&self.buffer),
                });
            } else {
                // Stale frame is not an error; the next capture recovers.
                debug!(?region, "capture failed, keeping previous frame");
            }
        }
        self.tick_counter = (self.tick_counter + 1) % self.config.capture_ratio;

        host.move_center_to(position);
        host.redraw(&self.buffer);
    }

    /// End the session on terminal input.
    pub fn terminate(&mut self, input: TerminalInput) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.suppressed = matches!(input, TerminalInput::Cancel);
        info!(?input, "session terminated");
        self.transition(SessionState::Stopped);
    }

    /// Consume the session, emit `Ended` and return the result.
    pub fn finish(mut self) -> Option<Color> {
        if self.state != SessionState::Stopped {
            self.transition(SessionState::Stopped);
        }
        let result = reporter::emit(&self.buffer, self.suppressed);
        self.emit(SessionEvent::Ended { result });
        result
    }

    fn transition(&mut self, new_state: SessionState) {
        if self.state != new_state {
            debug!(old = ?self.state, new = ?new_state, "state transition");
            self.state = new_state;
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.event_tx.try_send(event).is_err() {
            debug!("event channel full or disconnected, event dropped");
        }
    }
}

/// Drive a session synchronously at its configured tick frequency.
///
/// Returns the confirmed color, or `None` when the session was cancelled.
/// The loop owns the timing: ticks are scheduled on a fixed
/// `1 / refresh_frequency` period, and an overlong tick pushes the
/// schedule back instead of running ticks concurrently.
pub fn run_session<C, S, H>(
    mut session: Session,
    cursor: &mut C,
    sampler: &mut S,
    host: &mut H,
) -> Option<Color>
where
    C: CursorTracker,
    S: ScreenSampler,
    H: HostWindow,
{
    session.start(host.handle());

    let period = session.config().tick_period();
    let mut next_tick = Instant::now() + period;

    while session.state() == SessionState::Running {
        session.tick(cursor, sampler, host);

        if let Some(input) = host.poll_input() {
            session.terminate(input);
            break;
        }

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
            next_tick += period;
        } else {
            next_tick = now + period;
        }
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Sample;

    struct FixedCursor(Point);

    impl CursorTracker for FixedCursor {
        fn position(&mut self) -> Point {
            self.0
        }
    }

    /// Sampler filling the whole frame with one sample per capture, with
    /// optional scripted failures (1-based capture call indices).
    struct FakeSampler {
        fill: Sample,
        fail_on: Vec<usize>,
        calls: usize,
        capture_ticks: Vec<usize>,
        ticks_seen: usize,
    }

    impl FakeSampler {
        fn filling(fill: Sample) -> Self {
            Self { fill, fail_on: Vec::new(), calls: 0, capture_ticks: Vec::new(), ticks_seen: 0 }
        }
    }

    impl ScreenSampler for FakeSampler {
        fn capture(
            &mut self,
            region: &CaptureRegion,
            _excluded: &WindowExclusionSet,
            out: &mut PixelBuffer,
        ) -> bool {
            self.calls += 1;
            self.capture_ticks.push(self.ticks_seen);
            if self.fail_on.contains(&self.calls) {
                return false;
            }
            assert_eq!(region.width, out.width());
            assert_eq!(region.height, out.height());
            let frame = vec![self.fill; (out.width() * out.height()) as usize];
            assert!(out.fill_from(&frame));
            true
        }
    }

    /// Host recording repositions/redraws; yields `None` from `poll_input`
    /// until the scripted poll count is reached, then the scripted input.
    struct RecordingHost {
        moves: Vec<Point>,
        redraws: usize,
        polls: usize,
        input_after: Option<(usize, TerminalInput)>,
    }

    impl RecordingHost {
        fn new() -> Self {
            Self { moves: Vec::new(), redraws: 0, polls: 0, input_after: None }
        }

        fn with_input_after(polls: usize, input: TerminalInput) -> Self {
            let mut host = Self::new();
            host.input_after = Some((polls, input));
            host
        }
    }

    impl HostWindow for RecordingHost {
        fn handle(&self) -> WindowHandle {
            WindowHandle(0xABCD)
        }
        fn move_center_to(&mut self, center: Point) {
            self.moves.push(center);
        }
        fn redraw(&mut self, _buffer: &PixelBuffer) {
            self.redraws += 1;
        }
        fn poll_input(&mut self) -> Option<TerminalInput> {
            self.polls += 1;
            match self.input_after {
                Some((after, input)) if self.polls >= after => Some(input),
                _ => None,
            }
        }
    }

    fn config_with_ratio(capture_ratio: u32) -> PickerConfig {
        PickerConfig { capture_ratio, ..PickerConfig::default() }
    }

    fn run_ticks(
        session: &mut Session,
        sampler: &mut FakeSampler,
        host: &mut RecordingHost,
        ticks: usize,
    ) {
        let mut cursor = FixedCursor(Point::new(50, 60));
        for tick in 1..=ticks {
            sampler.ticks_seen = tick;
            session.tick(&mut cursor, sampler, host);
        }
    }

    #[test]
    fn test_start_registers_host_window() {
        let mut session = Session::new(PickerConfig::default()).unwrap();
        let events = session.events();
        session.start(WindowHandle(42));
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.excluded().contains(WindowHandle(42)));
        assert_eq!(events.try_recv(), Ok(SessionEvent::Started));
    }

    #[test]
    fn test_capture_ratio_phase() {
        // capture_ratio = 3 over 9 ticks: captures on ticks 1, 4, 7.
        let mut session = Session::new(config_with_ratio(3)).unwrap();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::new(0.0, 1.0, 0.0, 1.0));
        let mut host = RecordingHost::new();
        run_ticks(&mut session, &mut sampler, &mut host, 9);

        assert_eq!(sampler.calls, 3);
        assert_eq!(sampler.capture_ticks, vec![1, 4, 7]);
    }

    #[test]
    fn test_reposition_every_tick_regardless_of_ratio() {
        let mut session = Session::new(config_with_ratio(4)).unwrap();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::default());
        let mut host = RecordingHost::new();
        run_ticks(&mut session, &mut sampler, &mut host, 8);

        assert_eq!(host.moves.len(), 8);
        assert_eq!(host.redraws, 8);
        assert!(host.moves.iter().all(|p| *p == Point::new(50, 60)));
        assert_eq!(sampler.calls, 2);
    }

    #[test]
    fn test_failed_capture_keeps_previous_frame() {
        // Captures succeed on ticks 1-4, fail on tick 5.
        let mut session = Session::new(config_with_ratio(1)).unwrap();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::new(0.2, 0.4, 0.6, 1.0));
        sampler.fail_on = vec![5];
        let mut host = RecordingHost::new();

        run_ticks(&mut session, &mut sampler, &mut host, 4);
        let frame_at_tick_4 = session.buffer().clone();

        run_ticks(&mut session, &mut sampler, &mut host, 1);
        assert_eq!(sampler.calls, 5);
        assert_eq!(*session.buffer(), frame_at_tick_4);
    }

    #[test]
    fn test_update_events_carry_center_color() {
        let mut session = Session::new(PickerConfig::default()).unwrap();
        let events = session.events();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::new(1.0, 0.0, 0.0, 1.0));
        let mut host = RecordingHost::new();
        run_ticks(&mut session, &mut sampler, &mut host, 1);

        assert_eq!(events.try_recv(), Ok(SessionEvent::Started));
        assert_eq!(
            events.try_recv(),
            Ok(SessionEvent::Updated { color: Color::new(255, 0, 0) })
        );
    }

    #[test]
    fn test_confirm_reports_center_color() {
        let mut session = Session::new(PickerConfig::default()).unwrap();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::new(1.0, 0.0, 0.0, 1.0));
        let mut host = RecordingHost::new();
        run_ticks(&mut session, &mut sampler, &mut host, 1);

        session.terminate(TerminalInput::Confirm);
        let result = session.finish();
        assert_eq!(result.map(|c| c.to_hex()), Some("#FF0000".to_string()));
    }

    #[test]
    fn test_cancel_suppresses_result() {
        let mut session = Session::new(PickerConfig::default()).unwrap();
        let events = session.events();
        session.start(WindowHandle(1));

        let mut sampler = FakeSampler::filling(Sample::new(1.0, 1.0, 1.0, 1.0));
        let mut host = RecordingHost::new();
        run_ticks(&mut session, &mut sampler, &mut host, 3);

        session.terminate(TerminalInput::Cancel);
        assert!(session.is_suppressed());
        assert_eq!(session.finish(), None);

        let ended = events.iter().last();
        assert_eq!(ended, Some(SessionEvent::Ended { result: None }));
    }

    #[test]
    fn test_tick_is_inert_before_start_and_after_stop() {
        let mut session = Session::new(PickerConfig::default()).unwrap();
        let mut sampler = FakeSampler::filling(Sample::default());
        let mut host = RecordingHost::new();

        run_ticks(&mut session, &mut sampler, &mut host, 2);
        assert_eq!(sampler.calls, 0);

        session.start(WindowHandle(1));
        session.terminate(TerminalInput::Confirm);
        run_ticks(&mut session, &mut sampler, &mut host, 2);
        assert_eq!(sampler.calls, 0);
        assert!(host.moves.is_empty());
    }

    #[test]
    fn test_run_session_until_confirm() {
        let config = PickerConfig {
            refresh_frequency: 1000,
            ..PickerConfig::default()
        };
        let session = Session::new(config).unwrap();
        let events = session.events();

        let mut cursor = FixedCursor(Point::new(5, 5));
        let mut sampler = FakeSampler::filling(Sample::new(0.0, 0.0, 1.0, 1.0));
        let mut host = RecordingHost::with_input_after(5, TerminalInput::Confirm);

        let result = run_session(session, &mut cursor, &mut sampler, &mut host);
        assert_eq!(result.map(|c| c.to_hex()), Some("#0000FF".to_string()));
        assert_eq!(host.moves.len(), 5);

        let collected: Vec<SessionEvent> = events.try_iter().collect();
        assert_eq!(collected.first(), Some(&SessionEvent::Started));
        assert!(matches!(collected.last(), Some(SessionEvent::Ended { result: Some(_) })));
    }

    #[test]
    fn test_session_event_serializes_tagged() {
        let event = SessionEvent::Updated { color: Color::new(255, 0, 0) };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Updated\""));
    }
}
