//! Frame playback state machine and Ctrl+C handling.
//!
//! Playback is kept outside the conversion pipeline: it only knows how many
//! frames there are and which one is current.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Slowest allowed playback rate.
pub const MIN_FPS: u32 = 1;

/// Fastest allowed playback rate.
pub const MAX_FPS: u32 = 60;

/// Default playback rate.
pub const DEFAULT_FPS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
}

/// Cycles through `frame_count` frames while playing.
#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    current: usize,
    frame_count: usize,
    fps: u32,
}

impl Playback {
    /// A paused playback positioned on the first frame.
    pub fn new(frame_count: usize, fps: u32) -> Self {
        Self {
            state: PlaybackState::Paused,
            current: 0,
            frame_count,
            fps: fps.clamp(MIN_FPS, MAX_FPS),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time each frame stays on screen.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(1000 / self.fps as u64)
    }

    /// Start playing. Single-frame and empty sequences stay paused.
    pub fn start(&mut self) {
        if self.frame_count > 1 {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.stop(),
            PlaybackState::Paused => self.start(),
        }
    }

    /// Change the rate; clamped to [`MIN_FPS`]..=[`MAX_FPS`].
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
    }

    /// Advance one frame if playing.
    ///
    /// # Returns
    /// The new frame index, or `None` when paused.
    pub fn tick(&mut self) -> Option<usize> {
        if self.state != PlaybackState::Playing || self.frame_count == 0 {
            return None;
        }
        self.current = (self.current + 1) % self.frame_count;
        Some(self.current)
    }
}

static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Whether Ctrl+C has been pressed since the handler was installed.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Install a Ctrl+C handler that sets [`ctrlc_received`].
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}
