use crate::{
    clock::PlaybackClock,
    core::{FrameIndex, FrameRange},
    error::{CuelineError, CuelineResult},
};

/// A zero-or-one-per-composition pause during which a full-screen insert
/// plays and the main narration freezes.
///
/// `trigger_raw_seconds` is where the narration pauses, measured against the
/// 1x recording; the pause lasts `duration_frames` timeline frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CutawayWindow {
    pub trigger_raw_seconds: f64,
    pub duration_frames: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplicePhase {
    Before,
    During,
    After,
}

/// Maps the real frame counter onto the virtual timeline that downstream
/// schedulers consume: identity before the pause window, frozen at the
/// window start during it, shifted back by the pause length after it.
///
/// For any raw timestamp `t` with `clock.frame_for(t) >= start`, the real
/// frame `clock.frame_for(t) + duration` maps back to virtual frame
/// `clock.frame_for(t)`; every consumer relies on that equivalence.
#[derive(Clone, Copy, Debug)]
pub struct CutawaySplicer {
    pause: Option<FrameRange>,
    trigger_raw_seconds: f64,
}

impl CutawaySplicer {
    pub fn new(clock: &PlaybackClock, window: Option<CutawayWindow>) -> CuelineResult<Self> {
        let Some(window) = window else {
            return Ok(Self {
                pause: None,
                trigger_raw_seconds: 0.0,
            });
        };
        if window.duration_frames == 0 {
            return Err(CuelineError::authoring(
                "cutaway duration_frames must be > 0",
            ));
        }
        let start = clock.frame_for(window.trigger_raw_seconds);
        let end = FrameIndex(start.0 + window.duration_frames);
        Ok(Self {
            pause: Some(FrameRange::new(start, end)?),
            trigger_raw_seconds: window.trigger_raw_seconds,
        })
    }

    pub fn pause_range(&self) -> Option<FrameRange> {
        self.pause
    }

    pub fn phase(&self, frame: FrameIndex) -> SplicePhase {
        match self.pause {
            None => SplicePhase::Before,
            Some(pause) => {
                if frame.0 < pause.start.0 {
                    SplicePhase::Before
                } else if pause.contains(frame) {
                    SplicePhase::During
                } else {
                    SplicePhase::After
                }
            }
        }
    }

    pub fn virtual_frame(&self, frame: FrameIndex) -> FrameIndex {
        match self.pause {
            None => frame,
            Some(pause) => match self.phase(frame) {
                SplicePhase::Before => frame,
                SplicePhase::During => pause.start,
                SplicePhase::After => FrameIndex(frame.0 - pause.len_frames()),
            },
        }
    }

    /// The audio-segment descriptors the host needs for splicing: narration
    /// up to the pause, the insert's own audio across it, and narration
    /// resuming from the trigger timestamp at the same rate. Segment edges
    /// abut exactly; there is never an overlap.
    pub fn audio_segments(
        &self,
        clock: &PlaybackClock,
        narration_source: &str,
        insert_source: Option<&str>,
        total_frames: FrameIndex,
    ) -> Vec<AudioSegment> {
        let rate = clock.rate().get();
        let mut segments = Vec::new();
        let mut push = |seg: AudioSegment| {
            if !seg.frames.is_empty() {
                segments.push(seg);
            }
        };

        match self.pause {
            None => push(AudioSegment {
                kind: SegmentKind::Narration,
                source: narration_source.to_string(),
                playback_rate: rate,
                source_start_sec: 0.0,
                frames: FrameRange {
                    start: FrameIndex(0),
                    end: total_frames,
                },
            }),
            Some(pause) => {
                push(AudioSegment {
                    kind: SegmentKind::Narration,
                    source: narration_source.to_string(),
                    playback_rate: rate,
                    source_start_sec: 0.0,
                    frames: FrameRange {
                        start: FrameIndex(0),
                        end: FrameIndex(pause.start.0.min(total_frames.0)),
                    },
                });
                if let Some(insert) = insert_source {
                    push(AudioSegment {
                        kind: SegmentKind::CutawayInsert,
                        source: insert.to_string(),
                        playback_rate: 1.0,
                        source_start_sec: 0.0,
                        frames: FrameRange {
                            start: pause.start,
                            end: FrameIndex(pause.end.0.min(total_frames.0)),
                        },
                    });
                }
                if pause.end.0 < total_frames.0 {
                    push(AudioSegment {
                        kind: SegmentKind::Narration,
                        source: narration_source.to_string(),
                        playback_rate: rate,
                        source_start_sec: self.trigger_raw_seconds,
                        frames: FrameRange {
                            start: pause.end,
                            end: total_frames,
                        },
                    });
                }
            }
        }
        segments
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Narration,
    CutawayInsert,
}

/// One audio span for the host mixer: which source to play, at what rate,
/// from what source offset, over which timeline frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioSegment {
    pub kind: SegmentKind,
    pub source: String,
    pub playback_rate: f64,
    pub source_start_sec: f64,
    pub frames: FrameRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fps, PlaybackRate};

    fn clock() -> PlaybackClock {
        PlaybackClock::new(
            PlaybackRate::new(1.85).unwrap(),
            Fps::new(30, 1).unwrap(),
        )
    }

    fn splicer() -> CutawaySplicer {
        CutawaySplicer::new(
            &clock(),
            Some(CutawayWindow {
                trigger_raw_seconds: 11.099,
                duration_frames: 72,
            }),
        )
        .unwrap()
    }

    #[test]
    fn pause_window_is_derived_through_the_clock() {
        let s = splicer();
        let pause = s.pause_range().unwrap();
        assert_eq!(pause.start, FrameIndex(180));
        assert_eq!(pause.end, FrameIndex(252));
    }

    #[test]
    fn three_phase_mapping() {
        let s = splicer();
        assert_eq!(s.phase(FrameIndex(179)), SplicePhase::Before);
        assert_eq!(s.virtual_frame(FrameIndex(179)), FrameIndex(179));

        assert_eq!(s.phase(FrameIndex(180)), SplicePhase::During);
        assert_eq!(s.phase(FrameIndex(251)), SplicePhase::During);
        assert_eq!(s.virtual_frame(FrameIndex(251)), FrameIndex(180));

        assert_eq!(s.phase(FrameIndex(252)), SplicePhase::After);
        assert_eq!(s.virtual_frame(FrameIndex(252)), FrameIndex(180));
        assert_eq!(s.virtual_frame(FrameIndex(784)), FrameIndex(712));
    }

    #[test]
    fn timestamp_shift_equivalence() {
        // Any post-trigger timestamp delayed by the pause length lands on
        // the virtual frame the clock gives for the timestamp directly.
        let c = clock();
        let s = splicer();
        let pause = s.pause_range().unwrap();
        for t in [11.099, 20.0, 43.90, 60.0] {
            let f = c.frame_for(t);
            assert!(f >= pause.start);
            assert_eq!(s.virtual_frame(FrameIndex(f.0 + pause.len_frames())), f);
        }
    }

    #[test]
    fn no_window_is_identity() {
        let s = CutawaySplicer::new(&clock(), None).unwrap();
        assert_eq!(s.virtual_frame(FrameIndex(0)), FrameIndex(0));
        assert_eq!(s.virtual_frame(FrameIndex(999)), FrameIndex(999));
        assert_eq!(s.phase(FrameIndex(999)), SplicePhase::Before);
    }

    #[test]
    fn zero_length_window_is_an_authoring_error() {
        let err = CutawaySplicer::new(
            &clock(),
            Some(CutawayWindow {
                trigger_raw_seconds: 1.0,
                duration_frames: 0,
            }),
        )
        .unwrap_err();
        assert!(matches!(err, CuelineError::AuthoringTiming(_)));
    }

    #[test]
    fn audio_segments_abut_without_overlap() {
        let s = splicer();
        let segs = s.audio_segments(&clock(), "narration.mp3", Some("insert.mp4"), FrameIndex(900));
        assert_eq!(segs.len(), 3);

        assert_eq!(segs[0].kind, SegmentKind::Narration);
        assert_eq!(segs[0].frames.end, FrameIndex(180));
        assert_eq!(segs[0].source_start_sec, 0.0);

        assert_eq!(segs[1].kind, SegmentKind::CutawayInsert);
        assert_eq!(segs[1].frames.start, FrameIndex(180));
        assert_eq!(segs[1].frames.end, FrameIndex(252));
        assert_eq!(segs[1].playback_rate, 1.0);

        assert_eq!(segs[2].kind, SegmentKind::Narration);
        assert_eq!(segs[2].frames.start, FrameIndex(252));
        assert_eq!(segs[2].frames.end, FrameIndex(900));
        assert_eq!(segs[2].source_start_sec, 11.099);
        assert_eq!(segs[2].playback_rate, 1.85);
    }

    #[test]
    fn audio_segments_without_window_cover_the_whole_timeline() {
        let s = CutawaySplicer::new(&clock(), None).unwrap();
        let segs = s.audio_segments(&clock(), "narration.mp3", None, FrameIndex(300));
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].frames.start, FrameIndex(0));
        assert_eq!(segs[0].frames.end, FrameIndex(300));
    }
}
