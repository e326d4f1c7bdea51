use crate::{
    captions::CaptionTrack,
    clock::PlaybackClock,
    core::{FrameIndex, FrameRange, Vec2},
    countdown::{CountdownState, CountdownTimer},
    error::{CuelineError, CuelineResult},
    fx::{EffectScheduler, EffectState},
    model::Composition,
    scan::OptionScanSequencer,
    splice::{AudioSegment, CutawaySplicer, SplicePhase},
};

/// The active caption line, ready for the host renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionState {
    pub line_index: usize,
    pub words: Vec<String>,
    pub emphasized: Option<usize>,
}

/// Everything the host renderer needs for one integer frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameState {
    pub frame: FrameIndex,
    pub virtual_frame: FrameIndex,
    pub cutaway_active: bool,
    pub caption: Option<CaptionState>,
    pub effects: Vec<EffectState>,
    pub shake_offset: Vec2,
    /// Index into the question's options.
    pub scan_highlight: Option<usize>,
    pub countdown: Option<CountdownState>,
}

/// Front-loads every schedule derived from a [`Composition`], then answers
/// per-frame queries as a pure function of the frame index.
///
/// The host invokes [`eval_frame`](Self::eval_frame) once per integer frame,
/// sequentially during preview or out-of-order across frame ranges during
/// export; the output is identical either way.
pub struct Evaluator {
    splicer: CutawaySplicer,
    captions: CaptionTrack,
    effects: EffectScheduler,
    scan: Option<OptionScanSequencer>,
    countdown: Option<CountdownTimer>,
    clock: PlaybackClock,
    total: FrameIndex,
    narration_source: String,
    insert_source: Option<String>,
}

impl Evaluator {
    pub fn new(comp: &Composition) -> CuelineResult<Self> {
        comp.validate()?;

        let clock = comp.clock();
        let splicer = CutawaySplicer::new(&clock, comp.cutaway.as_ref().map(|c| c.window))?;
        let captions = CaptionTrack::new(&clock, &comp.words);
        let effects = EffectScheduler::new(&clock, &comp.effects)?;
        let scan = comp
            .question
            .as_ref()
            .map(|q| OptionScanSequencer::new(&clock, &q.options, q.answer_reveal_raw_seconds))
            .transpose()?;
        let countdown = comp
            .countdown
            .as_ref()
            .map(|c| {
                CountdownTimer::new(
                    FrameRange::new(
                        clock.frame_for(c.start_raw_seconds),
                        clock.frame_for(c.end_raw_seconds),
                    )?,
                    comp.fps,
                )
            })
            .transpose()?;

        let total = comp.total_frames();
        tracing::debug!(
            total_frames = total.0,
            words = comp.words.len(),
            effects = comp.effects.len(),
            "composition prepared"
        );

        Ok(Self {
            splicer,
            captions,
            effects,
            scan,
            countdown,
            clock,
            total,
            narration_source: comp.narration.source.clone(),
            insert_source: comp.cutaway.as_ref().map(|c| c.source.clone()),
        })
    }

    pub fn total_frames(&self) -> FrameIndex {
        self.total
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// The audio-segment descriptors for the whole timeline, for the host
    /// mixer. Constant across frames; computed here rather than per frame.
    pub fn audio_segments(&self) -> Vec<AudioSegment> {
        self.splicer.audio_segments(
            &self.clock,
            &self.narration_source,
            self.insert_source.as_deref(),
            self.total,
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn eval_frame(&self, frame: FrameIndex) -> CuelineResult<FrameState> {
        if frame.0 >= self.total.0 {
            return Err(CuelineError::evaluation(format!(
                "frame {} is out of bounds (timeline has {} frames)",
                frame.0, self.total.0
            )));
        }

        let virtual_frame = self.splicer.virtual_frame(frame);
        let cutaway_active = self.splicer.phase(frame) == SplicePhase::During;

        let caption = self
            .captions
            .active_line(virtual_frame)
            .map(|(line_index, line)| CaptionState {
                line_index,
                words: line.words.iter().map(|w| w.text.clone()).collect(),
                emphasized: line.emphasized_word(virtual_frame),
            });

        Ok(FrameState {
            frame,
            virtual_frame,
            cutaway_active,
            caption,
            effects: self.effects.states(virtual_frame, frame),
            shake_offset: self.effects.shake_offset(virtual_frame, frame),
            scan_highlight: self
                .scan
                .as_ref()
                .and_then(|s| s.highlighted(virtual_frame)),
            countdown: self.countdown.as_ref().and_then(|c| c.state(virtual_frame)),
        })
    }
}
