use crate::{
    core::{FrameIndex, FrameRange, Fps},
    error::{CuelineError, CuelineResult},
};

const ELEVATED_PROGRESS: f64 = 0.3;
const URGENT_PROGRESS: f64 = 0.5;
const CRITICAL_PROGRESS: f64 = 0.8;
const PANIC_WINDOW_SECONDS: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Calm,
    Elevated,
    Urgent,
    Critical,
}

impl Severity {
    fn from_progress(progress: f64) -> Self {
        if progress >= CRITICAL_PROGRESS {
            Self::Critical
        } else if progress >= URGENT_PROGRESS {
            Self::Urgent
        } else if progress >= ELEVATED_PROGRESS {
            Self::Elevated
        } else {
            Self::Calm
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CountdownState {
    pub seconds_remaining: u64,
    pub progress: f64,
    pub severity: Severity,
    pub pulse_amplitude: f64,
}

/// Derived countdown state over a window of the virtual timeline.
///
/// Everything is recomputed from `(virtual_frame, window, fps)` on each call;
/// there is no internal accumulator to drift. The displayed value is
/// `ceil(frames_left / fps)` clamped to a minimum of 1 while the window is
/// open, so a visible "0" never appears.
#[derive(Clone, Copy, Debug)]
pub struct CountdownTimer {
    window: FrameRange,
    fps: Fps,
}

impl CountdownTimer {
    pub fn new(window: FrameRange, fps: Fps) -> CuelineResult<Self> {
        if window.is_empty() {
            return Err(CuelineError::validation(
                "countdown window must be non-empty",
            ));
        }
        Ok(Self { window, fps })
    }

    pub fn window(&self) -> FrameRange {
        self.window
    }

    /// `None` outside the window; the countdown only exists while it is open.
    pub fn state(&self, virtual_frame: FrameIndex) -> Option<CountdownState> {
        if !self.window.contains(virtual_frame) {
            return None;
        }

        let frames_left = self.window.end.0 - virtual_frame.0;
        let secs_left = self.fps.frames_to_secs(frames_left);
        let seconds_remaining = (secs_left.ceil() as u64).max(1);

        let elapsed = (virtual_frame.0 - self.window.start.0) as f64;
        let progress = (elapsed / self.window.len_frames() as f64).clamp(0.0, 1.0);

        let pulse_amplitude = if secs_left <= PANIC_WINDOW_SECONDS {
            (1.0 - secs_left / PANIC_WINDOW_SECONDS).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(CountdownState {
            seconds_remaining,
            progress,
            severity: Severity::from_progress(progress),
            pulse_amplitude,
        })
    }
}
