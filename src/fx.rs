use crate::{
    clock::PlaybackClock,
    core::{FrameIndex, Vec2},
    ease::Ease,
    error::{CuelineError, CuelineResult},
};

const FADE_FRAMES: u64 = 12;

const SLAM_SETTLE_FRAMES: u64 = 14;
const SLAM_IMPACT_FRAME: u64 = 4;
const SLAM_START_SCALE: f64 = 2.0;
const SLAM_DROP_PX: f64 = 60.0;
const SLAM_DECAY: f64 = 0.35; // per frame
const SLAM_OMEGA: f64 = 0.9; // rad per frame

const DRAW_FADE_IN_FRAMES: u64 = 8;
const UNDERLINE_DRAW_FRAMES: u64 = 10;
const CIRCLE_DRAW_FRAMES: u64 = 14;
const SWIPE_DRAW_FRAMES: u64 = 12;

const SHAKE_FRAMES: u64 = 7;
const SHAKE_AMPLITUDE_PX: f64 = 9.0;
const SHAKE_FREQ_X: f64 = 1.3; // rad per real frame
const SHAKE_FREQ_Y: f64 = 1.7;

const ZOOM_FRAMES: u64 = 12;
const ZOOM_FROM_SCALE: f64 = 1.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Fade,
    Slam,
    Underline,
    Circle,
    HighlightSwipe,
    Shake,
    Zoom,
}

/// An authored effect cue: fires when the narration reaches
/// `timestamp_raw_seconds`, runs its kind's fixed duration profile, then
/// holds terminal state unless `display_frames` bounds it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EffectTrigger {
    pub id: String,
    pub timestamp_raw_seconds: f64,
    pub kind: EffectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_frames: Option<u64>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// Per-frame output for one active effect, in the host renderer's units:
/// opacity in [0,1], scale factor, pixel offset, draw progress in [0,1].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EffectState {
    pub id: String,
    pub kind: EffectKind,
    pub opacity: f64,
    pub scale: f64,
    pub translate: Vec2,
    pub draw_progress: f64,
    pub flash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Profile {
    Fade { frames: u64 },
    Slam,
    Draw { fade_in: u64, draw: u64 },
    Shake { frames: u64, amplitude_px: f64 },
    Zoom { frames: u64, from_scale: f64 },
}

#[derive(Clone, Debug)]
struct ResolvedTrigger {
    id: String,
    kind: EffectKind,
    appear: FrameIndex,
    display_frames: Option<u64>,
    profile: Profile,
}

/// Computes animation progress for every authored [`EffectTrigger`] as a
/// pure function of the virtual frame (and the real frame counter, which
/// only the shake oscillator reads).
#[derive(Clone, Debug)]
pub struct EffectScheduler {
    triggers: Vec<ResolvedTrigger>,
}

impl EffectScheduler {
    pub fn new(clock: &PlaybackClock, triggers: &[EffectTrigger]) -> CuelineResult<Self> {
        let triggers = triggers
            .iter()
            .map(|t| {
                Ok(ResolvedTrigger {
                    id: t.id.clone(),
                    kind: t.kind,
                    appear: clock.frame_for(t.timestamp_raw_seconds),
                    display_frames: t.display_frames,
                    profile: resolve_profile(t)?,
                })
            })
            .collect::<CuelineResult<Vec<_>>>()?;
        Ok(Self { triggers })
    }

    /// States of all effects visible at `virtual_frame`. An effect never
    /// renders before its appear frame and disappears once a display bound
    /// (if any) has elapsed.
    pub fn states(&self, virtual_frame: FrameIndex, real_frame: FrameIndex) -> Vec<EffectState> {
        self.triggers
            .iter()
            .filter_map(|t| {
                let local = virtual_frame.0.checked_sub(t.appear.0)?;
                if let Some(display) = t.display_frames
                    && local >= display
                {
                    return None;
                }
                Some(state_of(t, local, real_frame))
            })
            .collect()
    }

    /// Summed pixel offset of every shake inside its decay window at
    /// `virtual_frame`. Concurrent shakes add rather than override.
    pub fn shake_offset(&self, virtual_frame: FrameIndex, real_frame: FrameIndex) -> Vec2 {
        let mut total = Vec2::ZERO;
        for t in &self.triggers {
            let Profile::Shake {
                frames,
                amplitude_px,
            } = t.profile
            else {
                continue;
            };
            let Some(local) = virtual_frame.0.checked_sub(t.appear.0) else {
                continue;
            };
            if local >= frames {
                continue;
            }
            total += shake_sample(local, frames, amplitude_px, real_frame);
        }
        total
    }
}

fn state_of(t: &ResolvedTrigger, local: u64, real_frame: FrameIndex) -> EffectState {
    let mut state = EffectState {
        id: t.id.clone(),
        kind: t.kind,
        opacity: 1.0,
        scale: 1.0,
        translate: Vec2::ZERO,
        draw_progress: 0.0,
        flash: false,
    };

    match t.profile {
        Profile::Fade { frames } => {
            state.opacity = ratio(local, frames);
        }
        Profile::Slam => {
            if local < SLAM_SETTLE_FRAMES {
                let tf = local as f64;
                let spring = (-SLAM_DECAY * tf).exp() * (SLAM_OMEGA * tf).cos();
                state.scale = 1.0 + (SLAM_START_SCALE - 1.0) * spring;
                state.translate = Vec2::new(0.0, -SLAM_DROP_PX * spring);
            }
            state.flash = local == SLAM_IMPACT_FRAME;
        }
        Profile::Draw { fade_in, draw } => {
            state.opacity = ratio(local, fade_in);
            let drawn = local.saturating_sub(fade_in);
            state.draw_progress = Ease::OutQuad.apply(ratio(drawn, draw));
        }
        Profile::Shake {
            frames,
            amplitude_px,
        } => {
            if local < frames {
                state.translate = shake_sample(local, frames, amplitude_px, real_frame);
            }
        }
        Profile::Zoom { frames, from_scale } => {
            let t = Ease::OutCubic.apply(ratio(local, frames));
            state.scale = from_scale + (1.0 - from_scale) * t;
            state.opacity = ratio(local, frames);
        }
    }
    state
}

fn ratio(local: u64, window: u64) -> f64 {
    if window == 0 {
        return 1.0;
    }
    ((local as f64) / (window as f64)).clamp(0.0, 1.0)
}

fn shake_sample(local: u64, frames: u64, amplitude_px: f64, real_frame: FrameIndex) -> Vec2 {
    // Linear decay over the window; the oscillator runs on the real frame
    // counter so overlapping shakes never phase-lock.
    let amp = amplitude_px * (1.0 - (local as f64) / (frames as f64));
    let rf = real_frame.0 as f64;
    Vec2::new((rf * SHAKE_FREQ_X).sin() * amp, (rf * SHAKE_FREQ_Y).cos() * amp)
}

fn resolve_profile(t: &EffectTrigger) -> CuelineResult<Profile> {
    match t.kind {
        EffectKind::Fade => Ok(Profile::Fade {
            frames: opt_window(&t.params, "frames")?.unwrap_or(FADE_FRAMES),
        }),
        EffectKind::Slam => Ok(Profile::Slam),
        EffectKind::Underline => Ok(Profile::Draw {
            fade_in: DRAW_FADE_IN_FRAMES,
            draw: UNDERLINE_DRAW_FRAMES,
        }),
        EffectKind::Circle => Ok(Profile::Draw {
            fade_in: DRAW_FADE_IN_FRAMES,
            draw: CIRCLE_DRAW_FRAMES,
        }),
        EffectKind::HighlightSwipe => Ok(Profile::Draw {
            fade_in: DRAW_FADE_IN_FRAMES,
            draw: SWIPE_DRAW_FRAMES,
        }),
        EffectKind::Shake => Ok(Profile::Shake {
            frames: opt_window(&t.params, "frames")?.unwrap_or(SHAKE_FRAMES),
            amplitude_px: opt_positive(&t.params, "amplitude_px")?.unwrap_or(SHAKE_AMPLITUDE_PX),
        }),
        EffectKind::Zoom => Ok(Profile::Zoom {
            frames: opt_window(&t.params, "frames")?.unwrap_or(ZOOM_FRAMES),
            from_scale: opt_positive(&t.params, "from_scale")?.unwrap_or(ZOOM_FROM_SCALE),
        }),
    }
}

fn opt_window(params: &serde_json::Value, key: &str) -> CuelineResult<Option<u64>> {
    let Some(v) = params.get(key) else {
        return Ok(None);
    };
    let Some(n) = v.as_u64() else {
        return Err(CuelineError::validation(format!(
            "effect param '{key}' must be a non-negative integer"
        )));
    };
    if n == 0 {
        return Err(CuelineError::validation(format!(
            "effect param '{key}' must be > 0"
        )));
    }
    Ok(Some(n))
}

fn opt_positive(params: &serde_json::Value, key: &str) -> CuelineResult<Option<f64>> {
    let Some(v) = params.get(key) else {
        return Ok(None);
    };
    let Some(n) = v.as_f64() else {
        return Err(CuelineError::validation(format!(
            "effect param '{key}' must be a number"
        )));
    };
    if !n.is_finite() || n <= 0.0 {
        return Err(CuelineError::validation(format!(
            "effect param '{key}' must be finite and > 0"
        )));
    }
    Ok(Some(n))
}
