use crate::core::{FrameIndex, Fps, PlaybackRate};

/// Converts raw narration seconds (measured against the 1x recording) into
/// timeline frames for a composition played at a fixed speed multiplier.
///
/// `frame = round(raw_seconds / rate * fps)`. Rounding to the nearest frame
/// keeps alignment timestamps that land a hair below a frame boundary (TTS
/// services quantize to milliseconds) on the frame the author hears; it is
/// monotonic in `raw_seconds` either way.
#[derive(Clone, Copy, Debug)]
pub struct PlaybackClock {
    rate: PlaybackRate,
    fps: Fps,
}

impl PlaybackClock {
    pub fn new(rate: PlaybackRate, fps: Fps) -> Self {
        Self { rate, fps }
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn frame_for(&self, raw_seconds: f64) -> FrameIndex {
        let timeline_secs = raw_seconds / self.rate.get();
        FrameIndex((timeline_secs * self.fps.as_f64()).round().max(0.0) as u64)
    }

    /// Approximate inverse of [`frame_for`](Self::frame_for), for diagnostics
    /// only. Lossy: any raw time inside the frame maps to the same index, so
    /// the round trip lands on the frame midpoint's raw time at best.
    pub fn raw_seconds_at(&self, frame: FrameIndex) -> f64 {
        self.fps.frames_to_secs(frame.0) * self.rate.get()
    }
}
