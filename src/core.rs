use crate::error::{CuelineError, CuelineResult};

pub use kurbo::{Affine, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> CuelineResult<Self> {
        if start.0 > end.0 {
            return Err(CuelineError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> CuelineResult<Self> {
        if den == 0 {
            return Err(CuelineError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CuelineError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

/// Speed multiplier applied to narration audio relative to the 1x recording.
///
/// All raw-audio timestamps are divided by this factor before frame
/// conversion; a rate of 1.85 plays 1.85 seconds of recording per timeline
/// second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    pub fn new(rate: f64) -> CuelineResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CuelineError::validation(
                "playback rate must be finite and > 0",
            ));
        }
        Ok(Self(rate))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PlaybackRate {
    type Error = CuelineError;

    fn try_from(v: f64) -> CuelineResult<Self> {
        Self::new(v)
    }
}

impl From<PlaybackRate> for f64 {
    fn from(r: PlaybackRate) -> f64 {
        r.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_range_contains_boundaries() {
        let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
        assert!(!r.contains(FrameIndex(1)));
        assert!(r.contains(FrameIndex(2)));
        assert!(r.contains(FrameIndex(4)));
        assert!(!r.contains(FrameIndex(5)));
    }

    #[test]
    fn frame_range_rejects_inverted_bounds() {
        assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    }

    #[test]
    fn playback_rate_rejects_non_positive() {
        assert!(PlaybackRate::new(0.0).is_err());
        assert!(PlaybackRate::new(-1.0).is_err());
        assert!(PlaybackRate::new(f64::NAN).is_err());
        assert_eq!(PlaybackRate::new(1.85).unwrap().get(), 1.85);
    }

    #[test]
    fn playback_rate_deserializes_through_validation() {
        let r: PlaybackRate = serde_json::from_str("1.85").unwrap();
        assert_eq!(r.get(), 1.85);
        assert!(serde_json::from_str::<PlaybackRate>("0.0").is_err());
    }
}
