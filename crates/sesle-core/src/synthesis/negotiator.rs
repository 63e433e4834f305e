//! Strategy negotiation for synthesis sessions.
//!
//! Two invocation strategies are tried per call, in fixed priority
//! order. Selection is never cached on the session: a session may
//! exhibit both behaviors across the process lifetime.

use std::path::Path;

use tracing::debug;

use crate::audio::PcmBuffer;
use crate::error::{Error, Result};
use crate::synthesis::{StrategyError, SynthesisControls, SynthesisRequest, VoiceSession};

/// Output of a successful negotiation.
#[derive(Debug, Clone)]
pub enum SynthesizedAudio {
    /// Strategy A result: raw PCM that still needs a container.
    Pcm(PcmBuffer),
    /// Strategy B result: a complete WAV container read back from the
    /// sink, passed through without re-encoding.
    Container(Vec<u8>),
}

/// Produce audio for `request` against an already-loaded session.
///
/// Strategy A (chunked) is tried first; a capability mismatch falls
/// through to Strategy B (sink writer). A hard engine failure in
/// either strategy aborts immediately. Both strategies reporting
/// "unsupported" is a [`Error::SynthesisFailed`].
pub fn synthesize(session: &dyn VoiceSession, request: &SynthesisRequest) -> Result<SynthesizedAudio> {
    match chunked_strategy(session, &request.text, &request.controls) {
        Ok(pcm) => return Ok(SynthesizedAudio::Pcm(pcm)),
        Err(StrategyError::Failed(err)) => return Err(err),
        Err(StrategyError::Unsupported(reason)) => {
            debug!(%reason, "chunked synthesis unavailable, trying sink writer");
        }
    }

    match sink_strategy(session, &request.text, &request.controls) {
        Ok(container) => Ok(SynthesizedAudio::Container(container)),
        Err(StrategyError::Failed(err)) => Err(err),
        Err(StrategyError::Unsupported(reason)) => Err(Error::SynthesisFailed(format!(
            "no supported invocation strategy: {reason}"
        ))),
    }
}

/// Strategy A: consume the chunk stream once, in order. The first
/// chunk's format is authoritative for the whole utterance.
fn chunked_strategy(
    session: &dyn VoiceSession,
    text: &str,
    controls: &SynthesisControls,
) -> std::result::Result<PcmBuffer, StrategyError> {
    let chunks = session.synthesize_chunked(text, controls)?;

    let mut samples = Vec::new();
    let mut format: Option<(u32, u16)> = None;

    for chunk in chunks {
        let chunk = chunk.map_err(StrategyError::Failed)?;
        let Some(pcm16) = chunk.pcm16 else {
            // A chunk without the raw PCM accessor means this library
            // version streams something else entirely; abandon the
            // strategy rather than guess.
            return Err(StrategyError::Unsupported(
                "chunk lacks a raw PCM accessor".to_string(),
            ));
        };
        if format.is_none() {
            format = Some((chunk.sample_rate, chunk.channels));
        }
        samples.extend_from_slice(&pcm16);
    }

    let Some((sample_rate, channels)) = format else {
        return Err(StrategyError::Unsupported(
            "chunk sequence was empty".to_string(),
        ));
    };

    Ok(PcmBuffer {
        samples,
        sample_rate,
        channels,
    })
}

/// Strategy B: write a complete container into a scoped temporary
/// sink and read it back. The sink file is removed on every exit
/// path, including failures, when the guard drops.
fn sink_strategy(
    session: &dyn VoiceSession,
    text: &str,
    controls: &SynthesisControls,
) -> std::result::Result<Vec<u8>, StrategyError> {
    let sink = tempfile::Builder::new()
        .prefix("sesle-tts-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| StrategyError::Failed(Error::Io(e)))?;

    match session.write_wav(text, Some(controls), sink.path()) {
        Ok(()) => {}
        Err(StrategyError::Unsupported(reason)) => {
            debug!(%reason, "sink writer rejected controls, retrying with engine defaults");
            session.write_wav(text, None, sink.path())?;
        }
        Err(err @ StrategyError::Failed(_)) => return Err(err),
    }

    std::fs::read(sink.path()).map_err(|e| StrategyError::Failed(Error::Io(e)))
}
