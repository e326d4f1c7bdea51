use crate::{
    clock::PlaybackClock,
    core::FrameIndex,
    error::{CuelineError, CuelineResult},
    model::OptionLabel,
};

pub const SCAN_DWELL_FRAMES: u64 = 8;
pub const SCAN_PAUSE_FRAMES: u64 = 5;
pub const THINKING_DELAY_FRAMES: u64 = 12;

/// One step of the attention animation: which option is highlighted (none
/// during the pause) and for how many frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Dwell {
    pub option_index: Option<usize>,
    pub frames: u64,
}

/// The deterministic "thinking" animation played between the last option
/// reveal and the answer reveal: scan every option in order, pause, then a
/// double-take that revisits the correct option around a decoy before
/// settling on the correct one.
///
/// The whole sequence is a declarative dwell list resolved at construction;
/// highlighting is a pure lookup over `virtual_frame`, with no randomness
/// and no persisted state.
#[derive(Clone, Debug)]
pub struct OptionScanSequencer {
    thinking_start: FrameIndex,
    answer_reveal: FrameIndex,
    dwells: Vec<Dwell>,
}

impl OptionScanSequencer {
    pub fn new(
        clock: &PlaybackClock,
        options: &[OptionLabel],
        answer_reveal_raw_seconds: f64,
    ) -> CuelineResult<Self> {
        if options.is_empty() {
            return Err(CuelineError::validation(
                "option scan requires at least one option",
            ));
        }
        let correct = {
            let correct_indices: Vec<usize> = options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.correct)
                .map(|(i, _)| i)
                .collect();
            match correct_indices.as_slice() {
                [one] => *one,
                _ => {
                    return Err(CuelineError::validation(
                        "option scan requires exactly one correct option",
                    ));
                }
            }
        };

        let last_reveal = options
            .iter()
            .map(|o| o.reveal_raw_seconds)
            .fold(0.0f64, f64::max);
        let thinking_start =
            FrameIndex(clock.frame_for(last_reveal).0 + THINKING_DELAY_FRAMES);
        let answer_reveal = clock.frame_for(answer_reveal_raw_seconds);

        // The decoy is the next option in display order, wrapping, so the
        // double-take always diverts to the same wrong answer for a given
        // content descriptor.
        let decoy = (correct + 1) % options.len();

        let mut dwells = Vec::with_capacity(options.len() + 4);
        for index in 0..options.len() {
            dwells.push(Dwell {
                option_index: Some(index),
                frames: SCAN_DWELL_FRAMES,
            });
        }
        dwells.push(Dwell {
            option_index: None,
            frames: SCAN_PAUSE_FRAMES,
        });
        for index in [correct, decoy, correct] {
            dwells.push(Dwell {
                option_index: Some(index),
                frames: SCAN_DWELL_FRAMES,
            });
        }

        Ok(Self {
            thinking_start,
            answer_reveal,
            dwells,
        })
    }

    pub fn thinking_start(&self) -> FrameIndex {
        self.thinking_start
    }

    pub fn answer_reveal(&self) -> FrameIndex {
        self.answer_reveal
    }

    pub fn dwells(&self) -> &[Dwell] {
        &self.dwells
    }

    /// Index of the option highlighted at `virtual_frame`, if any. Nothing
    /// is highlighted outside `[thinking_start, answer_reveal)` or once the
    /// dwell list is exhausted.
    pub fn highlighted(&self, virtual_frame: FrameIndex) -> Option<usize> {
        if virtual_frame.0 < self.thinking_start.0 || virtual_frame.0 >= self.answer_reveal.0 {
            return None;
        }
        let mut into = virtual_frame.0 - self.thinking_start.0;
        for dwell in &self.dwells {
            if into < dwell.frames {
                return dwell.option_index;
            }
            into -= dwell.frames;
        }
        None
    }
}
