use crate::error::{CuelineError, CuelineResult};

/// A narrated word with raw-audio timestamps, in seconds against the 1x
/// recording. Sequences are monotonically non-decreasing and immutable once
/// built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimestampedWord {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// One character of alignment output. Only an intermediate: consumed by
/// [`align_words`], then discarded.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct TimestampedCharacter {
    #[serde(rename = "character")]
    pub text: String,
    #[serde(alias = "start_time_seconds")]
    pub start: f64,
    #[serde(alias = "end_time_seconds")]
    pub end: f64,
}

/// The two wire shapes alignment services hand back for the same data:
/// one object holding parallel per-character arrays, or a flat array of
/// per-character objects each carrying its own timing.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum AlignmentPayload {
    Parallel {
        characters: Vec<String>,
        #[serde(rename = "character_start_times_seconds")]
        starts: Vec<f64>,
        #[serde(rename = "character_end_times_seconds")]
        ends: Vec<f64>,
    },
    PerCharacter(Vec<TimestampedCharacter>),
}

/// What to do with out-of-order character timestamps at load time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MonotonicPolicy {
    /// Reject the payload with [`CuelineError::NonMonotonicTimestamp`].
    #[default]
    Strict,
    /// Clamp each timestamp to the running maximum.
    Clamp,
}

const BOUNDARY_CHARS: [char; 4] = [' ', '\n', '\r', '\t'];

fn is_boundary(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| BOUNDARY_CHARS.contains(&c))
}

/// Groups per-character alignment timings into words.
///
/// A word's start/end are its first/last non-boundary character's timestamps.
/// Both payload shapes normalize to the same output for the same underlying
/// text and timings.
pub fn align_words(
    payload: &AlignmentPayload,
    policy: MonotonicPolicy,
) -> CuelineResult<Vec<TimestampedWord>> {
    let chars = characters_of(payload)?;
    let chars = enforce_monotonic(chars, policy)?;

    let mut words = Vec::new();
    let mut current: Option<TimestampedWord> = None;
    for ch in &chars {
        if is_boundary(&ch.text) {
            if let Some(w) = current.take() {
                words.push(w);
            }
            continue;
        }
        match &mut current {
            Some(w) => {
                w.text.push_str(&ch.text);
                w.end_seconds = ch.end;
            }
            None => {
                current = Some(TimestampedWord {
                    text: ch.text.clone(),
                    start_seconds: ch.start,
                    end_seconds: ch.end,
                });
            }
        }
    }
    if let Some(w) = current.take() {
        words.push(w);
    }
    Ok(words)
}

fn characters_of(payload: &AlignmentPayload) -> CuelineResult<Vec<TimestampedCharacter>> {
    match payload {
        AlignmentPayload::Parallel {
            characters,
            starts,
            ends,
        } => {
            if characters.len() != starts.len() || characters.len() != ends.len() {
                return Err(CuelineError::AlignmentLengthMismatch {
                    characters: characters.len(),
                    starts: starts.len(),
                    ends: ends.len(),
                });
            }
            Ok(characters
                .iter()
                .zip(starts.iter().zip(ends.iter()))
                .map(|(text, (&start, &end))| TimestampedCharacter {
                    text: text.clone(),
                    start,
                    end,
                })
                .collect())
        }
        AlignmentPayload::PerCharacter(chars) => Ok(chars.clone()),
    }
}

fn enforce_monotonic(
    mut chars: Vec<TimestampedCharacter>,
    policy: MonotonicPolicy,
) -> CuelineResult<Vec<TimestampedCharacter>> {
    let mut high_water = 0.0f64;
    for (index, ch) in chars.iter_mut().enumerate() {
        if ch.start < high_water || ch.end < ch.start {
            match policy {
                MonotonicPolicy::Strict => {
                    return Err(CuelineError::NonMonotonicTimestamp {
                        index,
                        prev: high_water,
                        next: ch.start.min(ch.end),
                    });
                }
                MonotonicPolicy::Clamp => {
                    ch.start = ch.start.max(high_water);
                    ch.end = ch.end.max(ch.start);
                }
            }
        }
        high_water = high_water.max(ch.start);
    }
    Ok(chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_char(chars: &[(&str, f64, f64)]) -> AlignmentPayload {
        AlignmentPayload::PerCharacter(
            chars
                .iter()
                .map(|&(text, start, end)| TimestampedCharacter {
                    text: text.to_string(),
                    start,
                    end,
                })
                .collect(),
        )
    }

    #[test]
    fn groups_characters_into_words() {
        let payload = per_char(&[
            ("h", 0.0, 0.1),
            ("i", 0.1, 0.2),
            (" ", 0.2, 0.3),
            ("y", 0.3, 0.4),
            ("o", 0.4, 0.5),
        ]);
        let words = align_words(&payload, MonotonicPolicy::Strict).unwrap();
        assert_eq!(
            words,
            vec![
                TimestampedWord {
                    text: "hi".to_string(),
                    start_seconds: 0.0,
                    end_seconds: 0.2,
                },
                TimestampedWord {
                    text: "yo".to_string(),
                    start_seconds: 0.3,
                    end_seconds: 0.5,
                },
            ]
        );
    }

    #[test]
    fn both_payload_shapes_normalize_identically() {
        let parallel: AlignmentPayload = serde_json::from_str(
            r#"{
                "characters": ["o", "k", "\n", "g", "o"],
                "character_start_times_seconds": [0.0, 0.1, 0.2, 0.5, 0.6],
                "character_end_times_seconds": [0.1, 0.2, 0.5, 0.6, 0.7]
            }"#,
        )
        .unwrap();
        let per_character: AlignmentPayload = serde_json::from_str(
            r#"[
                {"character": "o", "start": 0.0, "end": 0.1},
                {"character": "k", "start": 0.1, "end": 0.2},
                {"character": "\n", "start": 0.2, "end": 0.5},
                {"character": "g", "start": 0.5, "end": 0.6},
                {"character": "o", "start": 0.6, "end": 0.7}
            ]"#,
        )
        .unwrap();

        let a = align_words(&parallel, MonotonicPolicy::Strict).unwrap();
        let b = align_words(&per_character, MonotonicPolicy::Strict).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].text, "go");
    }

    #[test]
    fn parallel_length_mismatch_is_rejected() {
        let payload = AlignmentPayload::Parallel {
            characters: vec!["a".to_string(), "b".to_string()],
            starts: vec![0.0, 0.1],
            ends: vec![0.1],
        };
        let err = align_words(&payload, MonotonicPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CuelineError::AlignmentLengthMismatch {
                characters: 2,
                starts: 2,
                ends: 1
            }
        ));
    }

    #[test]
    fn strict_policy_rejects_out_of_order_starts() {
        let payload = per_char(&[("a", 0.0, 0.1), ("b", 0.5, 0.6), ("c", 0.3, 0.7)]);
        let err = align_words(&payload, MonotonicPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CuelineError::NonMonotonicTimestamp { index: 2, .. }
        ));
    }

    #[test]
    fn clamp_policy_raises_to_running_maximum() {
        let payload = per_char(&[("a", 0.0, 0.1), ("b", 0.5, 0.6), ("c", 0.3, 0.7)]);
        let words = align_words(&payload, MonotonicPolicy::Clamp).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].start_seconds, 0.0);
        assert_eq!(words[0].end_seconds, 0.7);
    }

    #[test]
    fn leading_and_repeated_boundaries_produce_no_empty_words() {
        let payload = per_char(&[
            (" ", 0.0, 0.1),
            ("a", 0.1, 0.2),
            (" ", 0.2, 0.3),
            ("\t", 0.3, 0.4),
            ("b", 0.4, 0.5),
            (" ", 0.5, 0.6),
        ]);
        let words = align_words(&payload, MonotonicPolicy::Strict).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "a");
        assert_eq!(words[1].text, "b");
    }

    #[test]
    fn empty_payload_yields_no_words() {
        let words = align_words(&per_char(&[]), MonotonicPolicy::Strict).unwrap();
        assert!(words.is_empty());
    }
}
