//! Cueline maps speech timings onto frame-indexed video timelines.
//!
//! A narrated composition starts from per-character timestamps produced by a
//! text-to-speech alignment service. Cueline turns those timestamps into a
//! deterministic, frame-indexed schedule for everything that must stay in
//! sync with the narration: captions, per-word emphasis, text effects,
//! screen shakes, option-scan animations and countdown timers, including
//! across a mid-composition cutaway that pauses the narration.
//!
//! # Pipeline overview
//!
//! 1. **Align**: alignment payload -> [`TimestampedWord`] list ([`align_words`])
//! 2. **Map**: raw narration seconds -> frames ([`PlaybackClock`]), with the
//!    cutaway pause removed ([`CutawaySplicer`])
//! 3. **Schedule**: per-frame effect, caption, scan and countdown state
//! 4. **Evaluate**: `Composition + FrameIndex -> FrameState` ([`Evaluator`]),
//!    handed to a host renderer once per integer frame
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure function of frame**: evaluation has no mutable state; any frame
//!   may be computed in any order and always yields the same output.
//! - **No IO in evaluation**: timing data and content descriptors are loaded
//!   once upstream and handed in as an immutable [`Composition`].
#![forbid(unsafe_code)]

pub mod align;
pub mod captions;
pub mod clock;
pub mod core;
pub mod countdown;
pub mod dsl;
pub mod ease;
pub mod error;
pub mod eval;
pub mod fx;
pub mod model;
pub mod scan;
pub mod splice;

pub use align::{AlignmentPayload, MonotonicPolicy, TimestampedWord, align_words};
pub use captions::{CaptionLine, CaptionTrack, CaptionWord, clean_word};
pub use clock::PlaybackClock;
pub use self::core::{Affine, Fps, FrameIndex, FrameRange, PlaybackRate, Vec2};
pub use countdown::{CountdownState, CountdownTimer, Severity};
pub use dsl::CompositionBuilder;
pub use ease::Ease;
pub use error::{CuelineError, CuelineResult};
pub use eval::{CaptionState, Evaluator, FrameState};
pub use fx::{EffectKind, EffectScheduler, EffectState, EffectTrigger};
pub use model::{
    Composition, CountdownSpec, Cutaway, NarrationTrack, OptionLabel, QuestionSpec,
};
pub use scan::{Dwell, OptionScanSequencer};
pub use splice::{AudioSegment, CutawaySplicer, CutawayWindow, SegmentKind, SplicePhase};
