use std::path::Path;

use crate::{
    align::TimestampedWord,
    clock::PlaybackClock,
    core::{FrameIndex, Fps, PlaybackRate},
    error::{CuelineError, CuelineResult},
    fx::EffectTrigger,
    splice::CutawayWindow,
};

/// The narration asset every timestamp in the composition is measured
/// against: a 1x recording played back at a fixed speed multiplier.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NarrationTrack {
    pub source: String,
    pub playback_rate: PlaybackRate,
    pub duration_raw_seconds: f64,
}

/// A full-screen insert that hard-replaces the composition while the
/// narration pauses.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Cutaway {
    pub source: String,
    pub window: CutawayWindow,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OptionLabel {
    pub label: String,
    pub text: String,
    pub reveal_raw_seconds: f64,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct QuestionSpec {
    pub prompt: String,
    pub options: Vec<OptionLabel>,
    pub answer_reveal_raw_seconds: f64,
}

/// Countdown window endpoints, authored in raw narration seconds.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CountdownSpec {
    pub start_raw_seconds: f64,
    pub end_raw_seconds: f64,
}

/// The immutable content bundle a composition is evaluated from: narration
/// metadata, aligned words and every authored cue. Built once upstream,
/// then read-only; every render recomputes state from this plus the frame.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Composition {
    pub fps: Fps,
    pub narration: NarrationTrack,
    pub words: Vec<TimestampedWord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutaway: Option<Cutaway>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownSpec>,
}

impl Composition {
    pub fn clock(&self) -> PlaybackClock {
        PlaybackClock::new(self.narration.playback_rate, self.fps)
    }

    /// Timeline length: narration length at playback rate, plus the pause.
    pub fn total_frames(&self) -> FrameIndex {
        let narration_frames = self.clock().frame_for(self.narration.duration_raw_seconds);
        let pause = self
            .cutaway
            .as_ref()
            .map_or(0, |c| c.window.duration_frames);
        FrameIndex(narration_frames.0 + pause)
    }

    /// Offline authoring validation: every authored timestamp must land
    /// inside the narration, before any frame is ever evaluated. Malformed
    /// content is a build-time failure, not a render-time one.
    #[tracing::instrument(skip(self))]
    pub fn validate(&self) -> CuelineResult<()> {
        let duration = self.narration.duration_raw_seconds;
        if self.narration.source.trim().is_empty() {
            return Err(CuelineError::validation("narration source must be non-empty"));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CuelineError::validation(
                "narration duration must be finite and > 0",
            ));
        }

        let mut prev_start = 0.0f64;
        for (i, w) in self.words.iter().enumerate() {
            if w.start_seconds < prev_start || w.end_seconds < w.start_seconds {
                return Err(CuelineError::validation(format!(
                    "word {i} ('{}') breaks timestamp order",
                    w.text
                )));
            }
            prev_start = w.start_seconds;
        }
        if let Some(last) = self.words.last()
            && last.end_seconds > duration
        {
            return Err(CuelineError::authoring(format!(
                "word '{}' ends at {}s, past the narration ({duration}s)",
                last.text, last.end_seconds
            )));
        }

        let mut seen_ids = std::collections::BTreeSet::new();
        for t in &self.effects {
            if t.id.trim().is_empty() {
                return Err(CuelineError::validation("effect trigger id must be non-empty"));
            }
            if !seen_ids.insert(t.id.as_str()) {
                return Err(CuelineError::validation(format!(
                    "duplicate effect trigger id '{}'",
                    t.id
                )));
            }
            if t.timestamp_raw_seconds < 0.0 || t.timestamp_raw_seconds > duration {
                return Err(CuelineError::authoring(format!(
                    "effect '{}' fires at {}s, outside the narration (0..{duration}s)",
                    t.id, t.timestamp_raw_seconds
                )));
            }
        }

        if let Some(cutaway) = &self.cutaway {
            if cutaway.source.trim().is_empty() {
                return Err(CuelineError::validation("cutaway source must be non-empty"));
            }
            if cutaway.window.duration_frames == 0 {
                return Err(CuelineError::authoring("cutaway duration_frames must be > 0"));
            }
            let trigger = cutaway.window.trigger_raw_seconds;
            if trigger < 0.0 || trigger > duration {
                return Err(CuelineError::authoring(format!(
                    "cutaway triggers at {trigger}s, outside the narration (0..{duration}s)"
                )));
            }
        }

        if let Some(question) = &self.question {
            self.validate_question(question, duration)?;
        }

        if let Some(countdown) = &self.countdown {
            if countdown.start_raw_seconds >= countdown.end_raw_seconds {
                return Err(CuelineError::authoring(
                    "countdown start must precede its end",
                ));
            }
            if countdown.start_raw_seconds < 0.0 || countdown.end_raw_seconds > duration {
                return Err(CuelineError::authoring(format!(
                    "countdown ({}..{}s) exceeds the narration (0..{duration}s)",
                    countdown.start_raw_seconds, countdown.end_raw_seconds
                )));
            }
        }

        Ok(())
    }

    fn validate_question(&self, question: &QuestionSpec, duration: f64) -> CuelineResult<()> {
        if question.options.is_empty() {
            return Err(CuelineError::validation("question must have options"));
        }
        if question.options.iter().filter(|o| o.correct).count() != 1 {
            return Err(CuelineError::validation(
                "question must mark exactly one option correct",
            ));
        }
        let mut prev = 0.0f64;
        for o in &question.options {
            if o.reveal_raw_seconds < prev {
                return Err(CuelineError::authoring(format!(
                    "option '{}' reveals at {}s, before the previous option",
                    o.label, o.reveal_raw_seconds
                )));
            }
            if o.reveal_raw_seconds > duration {
                return Err(CuelineError::authoring(format!(
                    "option '{}' reveals at {}s, past the narration ({duration}s)",
                    o.label, o.reveal_raw_seconds
                )));
            }
            prev = o.reveal_raw_seconds;
        }
        if question.answer_reveal_raw_seconds < prev
            || question.answer_reveal_raw_seconds > duration
        {
            return Err(CuelineError::authoring(format!(
                "answer reveal at {}s must sit between the last option ({prev}s) and the narration end ({duration}s)",
                question.answer_reveal_raw_seconds
            )));
        }
        Ok(())
    }

    /// Resolves asset paths against `root`. A path that fails to resolve is
    /// a hard failure; silently skipping it would desynchronize narration.
    pub fn verify_assets(&self, root: &Path) -> CuelineResult<()> {
        let mut check = |source: &str| -> CuelineResult<()> {
            let path = root.join(source);
            if !path.is_file() {
                return Err(CuelineError::missing_asset(path.display().to_string()));
            }
            Ok(())
        };
        check(&self.narration.source)?;
        if let Some(cutaway) = &self.cutaway {
            check(&cutaway.source)?;
        }
        Ok(())
    }
}
