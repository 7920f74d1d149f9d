//! Time-stamped Annotations List (TAL) decoding.
//!
//! One annotation-channel record holds zero or more TALs followed by NUL
//! padding:
//!
//! ```text
//! onset [0x15 duration] 0x14 [note 0x14]* 0x00
//! ```
//!
//! The block is scanned byte by byte. [`transition`] is the pure state
//! function, and [`decode_tal_block`] applies the actions it emits to the
//! annotation being built.

use log::trace;

use crate::types::Annotation;

/// Terminates the onset, duration and every note.
pub const TAL_FIELD_END: u8 = 0x14;
/// Separates the onset from a following duration.
pub const TAL_DURATION_MARK: u8 = 0x15;
/// Ends one TAL. Two in a row end the block.
pub const TAL_END: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalState {
    Onset,
    Duration,
    Notes,
    /// A TAL just ended on a NUL byte.
    Done,
}

/// What to do with the text between the last marker and the current byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TalAction {
    /// Ordinary text byte, keep scanning.
    None,
    /// Start a new annotation with the pending text as onset.
    Onset,
    /// Pending text is the duration.
    Duration,
    /// Pending text is one note.
    Note,
    /// Emit the annotation under construction.
    Flush,
    /// Second NUL in a row: the rest of the block is padding.
    Stop,
}

/// Next state and action for `byte` read in `state`.
pub fn transition(state: TalState, byte: u8) -> (TalState, TalAction) {
    match (state, byte) {
        (TalState::Done, TAL_END) => (TalState::Done, TalAction::Stop),
        (_, TAL_END) => (TalState::Done, TalAction::Flush),
        // The first byte after a NUL belongs to the next onset.
        (TalState::Done, byte) => transition(TalState::Onset, byte),
        (TalState::Onset, TAL_DURATION_MARK) => (TalState::Duration, TalAction::Onset),
        (TalState::Onset, TAL_FIELD_END) => (TalState::Notes, TalAction::Onset),
        (TalState::Duration, TAL_FIELD_END) => (TalState::Notes, TalAction::Duration),
        (TalState::Notes, TAL_FIELD_END) => (TalState::Notes, TalAction::Note),
        (state, _) => (state, TalAction::None),
    }
}

/// Decodes the TALs of one annotation-channel record.
///
/// # Examples
///
/// ```rust
/// use edfdecode::annotation::decode_tal_block;
///
/// let annotations = decode_tal_block(b"2.0\x1530.0\x14Seizure\x14\x00\x00");
/// assert_eq!(annotations.len(), 1);
/// assert_eq!(annotations[0].onset, 2.0);
/// assert_eq!(annotations[0].duration, Some(30.0));
/// assert_eq!(annotations[0].notes, vec!["Seizure".to_string()]);
/// ```
pub fn decode_tal_block(block: &[u8]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut state = TalState::Onset;
    let mut segment_start = 0;
    let mut pending: Option<Annotation> = None;

    for (position, &byte) in block.iter().enumerate() {
        let (next, action) = transition(state, byte);
        state = next;

        let segment = || segment_text(&block[segment_start..position]);

        match action {
            TalAction::None => continue,
            TalAction::Stop => break,
            TalAction::Onset => {
                let mut annotation = Annotation::default();
                if let Some(text) = segment() {
                    annotation.onset = parse_seconds(&text);
                }
                pending = Some(annotation);
            }
            TalAction::Duration => {
                if let (Some(text), Some(annotation)) = (segment(), pending.as_mut()) {
                    annotation.duration = Some(parse_seconds(&text));
                }
            }
            TalAction::Note => {
                if let (Some(text), Some(annotation)) = (segment(), pending.as_mut()) {
                    annotation.notes.push(text);
                }
            }
            TalAction::Flush => {
                if let Some(annotation) = pending.take() {
                    trace!(
                        "TAL onset={} duration={:?} notes={:?}",
                        annotation.onset,
                        annotation.duration,
                        annotation.notes
                    );
                    annotations.push(annotation);
                }
            }
        }

        segment_start = position + 1;
    }

    annotations
}

/// Trimmed text of a segment, `None` when empty.
fn segment_text(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Onsets carry an explicit sign (`+1.5`, `-0.065`). `NaN` marks a
/// value that is not a number.
fn parse_seconds(text: &str) -> f64 {
    text.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use TalAction as A;
        use TalState as S;

        assert_eq!(transition(S::Onset, b'+'), (S::Onset, A::None));
        assert_eq!(transition(S::Onset, 0x15), (S::Duration, A::Onset));
        assert_eq!(transition(S::Onset, 0x14), (S::Notes, A::Onset));
        assert_eq!(transition(S::Duration, 0x14), (S::Notes, A::Duration));
        assert_eq!(transition(S::Duration, 0x15), (S::Duration, A::None));
        assert_eq!(transition(S::Notes, 0x14), (S::Notes, A::Note));
        assert_eq!(transition(S::Notes, 0x15), (S::Notes, A::None));
        assert_eq!(transition(S::Notes, 0x00), (S::Done, A::Flush));
        assert_eq!(transition(S::Onset, 0x00), (S::Done, A::Flush));
        assert_eq!(transition(S::Done, 0x00), (S::Done, A::Stop));
        assert_eq!(transition(S::Done, b'+'), (S::Onset, A::None));
        assert_eq!(transition(S::Done, 0x14), (S::Notes, A::Onset));
    }

    #[test]
    fn test_onset_without_duration() {
        let annotations = decode_tal_block(b"+1.5\x14Event A\x14\x00\x00");
        assert_eq!(
            annotations,
            vec![Annotation {
                onset: 1.5,
                duration: None,
                notes: vec!["Event A".to_string()],
            }]
        );
        assert_eq!(annotations[0].duration_secs(), 0.0);
    }

    #[test]
    fn test_onset_with_duration() {
        let annotations = decode_tal_block(b"2.0\x1530.0\x14Seizure\x14\x00\x00");
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].onset, 2.0);
        assert_eq!(annotations[0].duration, Some(30.0));
        assert_eq!(annotations[0].notes, vec!["Seizure"]);
    }

    #[test]
    fn test_two_tals_then_padding() {
        let block = b"+0\x14\x14\x00+3.25\x150.5\x14Arousal\x14Snore\x14\x00\x00\x00\x00";
        let annotations = decode_tal_block(block);

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].onset, 0.0);
        assert!(annotations[0].is_time_keeping());
        assert_eq!(annotations[1].onset, 3.25);
        assert_eq!(annotations[1].duration, Some(0.5));
        assert_eq!(annotations[1].notes, vec!["Arousal", "Snore"]);
    }

    #[test]
    fn test_empty_notes_are_skipped() {
        let annotations = decode_tal_block(b"+5\x14\x14Lights off\x14\x14\x00");
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].notes, vec!["Lights off"]);
    }

    #[test]
    fn test_empty_block() {
        assert!(decode_tal_block(b"\x00\x00+1\x14x\x14\x00").is_empty());
        assert!(decode_tal_block(b"").is_empty());
        assert!(decode_tal_block(&[0u8; 16]).is_empty());
    }

    #[test]
    fn test_negative_and_malformed_onset() {
        let annotations = decode_tal_block(b"-0.065\x14Pre\x14\x00abc\x14Bad\x14\x00");
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].onset, -0.065);
        assert!(annotations[1].onset.is_nan());
        assert_eq!(annotations[1].notes, vec!["Bad"]);
    }

    #[test]
    fn test_unterminated_tal_is_dropped() {
        // No closing NUL: the annotation is never flushed.
        let annotations = decode_tal_block(b"+1\x14Ok\x14\x00+2\x14Cut");
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].notes, vec!["Ok"]);
    }
}
