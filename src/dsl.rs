use crate::{
    align::TimestampedWord,
    core::Fps,
    error::{CuelineError, CuelineResult},
    fx::EffectTrigger,
    model::{Composition, CountdownSpec, Cutaway, NarrationTrack, QuestionSpec},
};

/// Chained construction for a [`Composition`]; `build()` runs the offline
/// authoring validation so a successfully built composition is always
/// evaluable.
pub struct CompositionBuilder {
    fps: Fps,
    narration: NarrationTrack,
    words: Vec<TimestampedWord>,
    cutaway: Option<Cutaway>,
    effects: Vec<EffectTrigger>,
    question: Option<QuestionSpec>,
    countdown: Option<CountdownSpec>,
}

impl CompositionBuilder {
    pub fn new(fps: Fps, narration: NarrationTrack) -> Self {
        Self {
            fps,
            narration,
            words: Vec::new(),
            cutaway: None,
            effects: Vec::new(),
            question: None,
            countdown: None,
        }
    }

    pub fn words(mut self, words: Vec<TimestampedWord>) -> Self {
        self.words = words;
        self
    }

    pub fn cutaway(mut self, cutaway: Cutaway) -> CuelineResult<Self> {
        if self.cutaway.is_some() {
            return Err(CuelineError::validation(
                "a composition holds at most one cutaway",
            ));
        }
        self.cutaway = Some(cutaway);
        Ok(self)
    }

    pub fn effect(mut self, trigger: EffectTrigger) -> Self {
        self.effects.push(trigger);
        self
    }

    pub fn question(mut self, question: QuestionSpec) -> Self {
        self.question = Some(question);
        self
    }

    pub fn countdown(mut self, countdown: CountdownSpec) -> Self {
        self.countdown = Some(countdown);
        self
    }

    pub fn build(self) -> CuelineResult<Composition> {
        let comp = Composition {
            fps: self.fps,
            narration: self.narration,
            words: self.words,
            cutaway: self.cutaway,
            effects: self.effects,
            question: self.question,
            countdown: self.countdown,
        };
        comp.validate()?;
        Ok(comp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::PlaybackRate, fx::EffectKind, splice::CutawayWindow};

    fn narration() -> NarrationTrack {
        NarrationTrack {
            source: "narration.mp3".to_string(),
            playback_rate: PlaybackRate::new(1.85).unwrap(),
            duration_raw_seconds: 60.0,
        }
    }

    #[test]
    fn builder_produces_a_validated_composition() {
        let comp = CompositionBuilder::new(Fps::new(30, 1).unwrap(), narration())
            .words(vec![TimestampedWord {
                text: "hi".to_string(),
                start_seconds: 0.5,
                end_seconds: 1.0,
            }])
            .effect(EffectTrigger {
                id: "z0".to_string(),
                timestamp_raw_seconds: 5.0,
                kind: EffectKind::Zoom,
                display_frames: None,
                params: serde_json::Value::Null,
            })
            .build()
            .unwrap();
        assert_eq!(comp.effects.len(), 1);
    }

    #[test]
    fn second_cutaway_is_rejected() {
        let cutaway = Cutaway {
            source: "insert.mp4".to_string(),
            window: CutawayWindow {
                trigger_raw_seconds: 10.0,
                duration_frames: 60,
            },
        };
        let builder = CompositionBuilder::new(Fps::new(30, 1).unwrap(), narration())
            .cutaway(cutaway.clone())
            .unwrap();
        assert!(builder.cutaway(cutaway).is_err());
    }

    #[test]
    fn build_surfaces_authoring_errors() {
        let result = CompositionBuilder::new(Fps::new(30, 1).unwrap(), narration())
            .effect(EffectTrigger {
                id: "late".to_string(),
                timestamp_raw_seconds: 120.0,
                kind: EffectKind::Fade,
                display_frames: None,
                params: serde_json::Value::Null,
            })
            .build();
        assert!(matches!(
            result.unwrap_err(),
            CuelineError::AuthoringTiming(_)
        ));
    }
}
