use crate::{
    align::TimestampedWord,
    clock::PlaybackClock,
    core::{FrameIndex, FrameRange},
};

const MAX_LINE_WORDS: usize = 5;
const PUNCTUATED_LINE_WORDS: usize = 4;
const FLUSH_PUNCTUATION: [char; 4] = ['.', '?', '!', ','];

// Script markup that survives TTS alignment but must never reach the screen.
const MARKUP_CHARS: [char; 13] = [
    '*', '_', '~', '`', '#', '<', '>', '[', ']', '{', '}', '|', '"',
];

/// Strips markup remnants from a narrated word, keeping punctuation.
pub fn clean_word(text: &str) -> String {
    text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionWord {
    /// Cleaned display text.
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub frames: FrameRange,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionLine {
    pub words: Vec<CaptionWord>,
    /// `[first word start, last word end)` on the virtual timeline.
    pub frames: FrameRange,
}

impl CaptionLine {
    /// Index of the word whose window contains `frame`, if any.
    pub fn emphasized_word(&self, frame: FrameIndex) -> Option<usize> {
        self.words.iter().position(|w| w.frames.contains(frame))
    }
}

/// Partitions the narrated word sequence into display lines.
///
/// A line flushes at five words, or at four when the fourth's cleaned text
/// ends in sentence punctuation. Words whose cleaned text is empty are
/// dropped and never counted. Construction is O(words) and idempotent;
/// queries may arrive in any frame order.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionTrack {
    lines: Vec<CaptionLine>,
}

impl CaptionTrack {
    pub fn new(clock: &PlaybackClock, words: &[TimestampedWord]) -> Self {
        let mut lines = Vec::new();
        let mut pending: Vec<CaptionWord> = Vec::new();

        for word in words {
            let text = clean_word(&word.text);
            if text.is_empty() {
                continue;
            }
            pending.push(CaptionWord {
                text,
                start_seconds: word.start_seconds,
                end_seconds: word.end_seconds,
                frames: FrameRange {
                    start: clock.frame_for(word.start_seconds),
                    end: clock.frame_for(word.end_seconds),
                },
            });

            let flush = pending.len() == MAX_LINE_WORDS
                || (pending.len() == PUNCTUATED_LINE_WORDS
                    && ends_in_flush_punctuation(&pending[PUNCTUATED_LINE_WORDS - 1].text));
            if flush {
                push_line(&mut lines, std::mem::take(&mut pending));
            }
        }
        push_line(&mut lines, pending);

        Self { lines }
    }

    pub fn lines(&self) -> &[CaptionLine] {
        &self.lines
    }

    /// The line whose window contains `frame`. Gaps between lines are
    /// legitimate: no match means nothing is rendered.
    pub fn active_line(&self, frame: FrameIndex) -> Option<(usize, &CaptionLine)> {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.frames.contains(frame))
    }
}

fn ends_in_flush_punctuation(text: &str) -> bool {
    text.chars()
        .next_back()
        .is_some_and(|c| FLUSH_PUNCTUATION.contains(&c))
}

fn push_line(lines: &mut Vec<CaptionLine>, words: Vec<CaptionWord>) {
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return;
    };
    let frames = FrameRange {
        start: first.frames.start,
        end: last.frames.end,
    };
    lines.push(CaptionLine { words, frames });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fps, PlaybackRate};

    fn clock() -> PlaybackClock {
        PlaybackClock::new(PlaybackRate::new(1.0).unwrap(), Fps::new(30, 1).unwrap())
    }

    fn words(texts: &[&str]) -> Vec<TimestampedWord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TimestampedWord {
                text: t.to_string(),
                start_seconds: i as f64,
                end_seconds: i as f64 + 0.8,
            })
            .collect()
    }

    #[test]
    fn flushes_at_five_words() {
        let track = CaptionTrack::new(&clock(), &words(&["a", "b", "c", "d", "e", "f", "g"]));
        let lens: Vec<usize> = track.lines().iter().map(|l| l.words.len()).collect();
        assert_eq!(lens, vec![5, 2]);
    }

    #[test]
    fn flushes_at_four_words_on_sentence_punctuation() {
        let track = CaptionTrack::new(&clock(), &words(&["a", "b", "c", "done.", "e", "f"]));
        let lens: Vec<usize> = track.lines().iter().map(|l| l.words.len()).collect();
        assert_eq!(lens, vec![4, 2]);
    }

    #[test]
    fn punctuation_check_runs_on_cleaned_text() {
        // Markup wrapping must not hide the sentence-final period.
        let track = CaptionTrack::new(&clock(), &words(&["a", "b", "c", "*done.*", "e"]));
        let lens: Vec<usize> = track.lines().iter().map(|l| l.words.len()).collect();
        assert_eq!(lens, vec![4, 1]);
        assert_eq!(track.lines()[0].words[3].text, "done.");
    }

    #[test]
    fn markup_only_words_are_dropped_and_never_counted() {
        let track = CaptionTrack::new(&clock(), &words(&["a", "**", "b", "c", "d", "e"]));
        let lens: Vec<usize> = track.lines().iter().map(|l| l.words.len()).collect();
        assert_eq!(lens, vec![5]);
    }

    #[test]
    fn grouping_is_idempotent() {
        let ws = words(&["a", "b", "c", "done.", "e", "f", "g", "h", "i"]);
        let a = CaptionTrack::new(&clock(), &ws);
        let b = CaptionTrack::new(&clock(), &ws);
        assert_eq!(a, b);
    }

    #[test]
    fn active_line_respects_gaps() {
        let ws = vec![
            TimestampedWord {
                text: "early".to_string(),
                start_seconds: 0.0,
                end_seconds: 1.0,
            },
            TimestampedWord {
                text: "late".to_string(),
                start_seconds: 10.0,
                end_seconds: 11.0,
            },
        ];
        let track = CaptionTrack::new(&clock(), &ws);
        // One line spanning both words: active across the whole window.
        assert_eq!(track.lines().len(), 1);
        assert!(track.active_line(FrameIndex(15)).is_some());
        assert!(track.active_line(FrameIndex(330)).is_none());
    }

    #[test]
    fn emphasized_word_window_is_half_open() {
        let track = CaptionTrack::new(&clock(), &words(&["a", "b"]));
        let (_, line) = track.active_line(FrameIndex(0)).unwrap();
        assert_eq!(line.emphasized_word(FrameIndex(0)), Some(0));
        // "a" spans [0,24); "b" starts at 30.
        assert_eq!(line.emphasized_word(FrameIndex(23)), Some(0));
        assert_eq!(line.emphasized_word(FrameIndex(24)), None);
        assert_eq!(line.emphasized_word(FrameIndex(30)), Some(1));
    }
}
