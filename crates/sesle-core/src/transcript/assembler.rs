//! Restructures the engine's lazy segment sequence into a stable result.

use crate::error::Result;
use crate::transcript::{RawSegment, Segment, TranscriptInfo, TranscriptionResult, Word};

/// Materialize the segment sequence into an ordered [`TranscriptionResult`].
///
/// The sequence is consumed exactly once, in order, which forces the
/// underlying recognition to run to completion before this returns.
/// Segments are appended as received; the engine contract guarantees
/// non-decreasing `start` values and this function does not re-sort.
pub fn assemble(
    segments: impl IntoIterator<Item = Result<RawSegment>>,
    info: TranscriptInfo,
) -> Result<TranscriptionResult> {
    let mut out = Vec::new();

    for segment in segments {
        out.push(materialize(segment?));
    }

    Ok(TranscriptionResult {
        language: info.language,
        language_probability: info.language_probability,
        duration: info.duration,
        segments: out,
    })
}

fn materialize(raw: RawSegment) -> Segment {
    let words = raw
        .words
        .into_iter()
        .map(|w| Word {
            start: w.start,
            end: w.end,
            word: w.word,
            // Some engine versions omit per-word confidence; the
            // contract pins the default at exactly 1.0.
            probability: w.probability.unwrap_or(1.0),
        })
        .collect();

    Segment {
        id: raw.id,
        seek: raw.seek,
        start: raw.start,
        end: raw.end,
        text: raw.text.trim().to_string(),
        tokens: Vec::new(),
        temperature: raw.temperature,
        avg_logprob: raw.avg_logprob,
        compression_ratio: raw.compression_ratio,
        no_speech_prob: raw.no_speech_prob,
        words,
    }
}
