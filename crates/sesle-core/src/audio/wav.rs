//! Canonical WAV container assembly.
//!
//! The 44-byte header is assembled by hand rather than delegated to a
//! writer library: downstream consumers compare these bytes exactly, so
//! the field layout is a wire contract, not an implementation detail.

use crate::audio::PcmBuffer;

/// Size of the canonical RIFF/WAVE PCM header.
pub const HEADER_LEN: usize = 44;

/// Wrap raw 16-bit PCM in a canonical 44-byte RIFF/WAVE header.
///
/// Pure and infallible for well-formed input; identical input always
/// produces identical bytes.
pub fn encode(pcm: &PcmBuffer) -> Vec<u8> {
    let data_len = pcm.samples.len() as u32;
    let byte_rate = pcm.sample_rate * pcm.channels as u32 * 2;
    let block_align = pcm.channels * 2;

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.samples.len());

    // RIFF chunk
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk: 16-byte PCM format block
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&pcm.channels.to_le_bytes());
    out.extend_from_slice(&pcm.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&pcm.samples);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    fn pcm(len: usize, sample_rate: u32, channels: u16) -> PcmBuffer {
        PcmBuffer {
            samples: (0..len).map(|i| (i % 251) as u8).collect(),
            sample_rate,
            channels,
        }
    }

    #[test]
    fn header_magic_and_sizes() {
        for &(len, rate, channels) in &[
            (0usize, 22_050u32, 1u16),
            (2, 8_000, 1),
            (4410, 22_050, 1),
            (9600, 48_000, 2),
            (96, 16_000, 4),
        ] {
            let wav = encode(&pcm(len, rate, channels));
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(&wav[12..16], b"fmt ");
            assert_eq!(&wav[36..40], b"data");
            assert_eq!(u32_at(&wav, 4), 36 + len as u32, "RIFF size for len={len}");
            assert_eq!(u32_at(&wav, 40), len as u32, "data size for len={len}");
            assert_eq!(wav.len(), HEADER_LEN + len);
        }
    }

    #[test]
    fn fmt_fields_round_trip() {
        let wav = encode(&pcm(4410, 22_050, 1));
        assert_eq!(u32_at(&wav, 16), 16); // fmt chunk size
        assert_eq!(u16_at(&wav, 20), 1); // PCM tag
        assert_eq!(u16_at(&wav, 22), 1); // channels
        assert_eq!(u32_at(&wav, 24), 22_050); // sample rate
        assert_eq!(u32_at(&wav, 28), 22_050 * 2); // byte rate
        assert_eq!(u16_at(&wav, 32), 2); // block align
        assert_eq!(u16_at(&wav, 34), 16); // bits per sample
    }

    #[test]
    fn stereo_fmt_fields() {
        let wav = encode(&pcm(9600, 48_000, 2));
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u32_at(&wav, 28), 48_000 * 2 * 2);
        assert_eq!(u16_at(&wav, 32), 4);
    }

    #[test]
    fn payload_follows_header_unmodified() {
        let input = pcm(2, 8_000, 1);
        let wav = encode(&input);
        assert_eq!(&wav[HEADER_LEN..], &input.samples[..]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let input = pcm(128, 22_050, 1);
        assert_eq!(encode(&input), encode(&input));
    }

    #[test]
    fn hound_parses_produced_container() {
        let input = pcm(4410 * 2, 22_050, 1);
        let reader = hound::WavReader::new(std::io::Cursor::new(encode(&input))).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len() as usize, input.samples.len() / 2);
    }
}
