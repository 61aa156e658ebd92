//! Speech clip decoding.
//!
//! The speech generator returns raw 16-bit little-endian mono PCM at 24 kHz,
//! base64-encoded, with no container header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::DecodeError;
use crate::model::AudioData;

/// Native output rate of the speech generator.
pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;

/// Decoded, playable mono buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// One second of silence at the generator's rate.
    #[must_use]
    pub fn silence() -> Self {
        Self::new(vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE)
    }

    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn channels(&self) -> u16 {
        CHANNELS
    }

    #[must_use]
    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }
}

/// Decode a base64 PCM clip.
///
/// A trailing odd byte is dropped before the bytes are read as `i16` samples.
///
/// # Errors
///
/// Returns `DecodeError::Base64` for malformed input and `DecodeError::Empty`
/// when fewer than two bytes of PCM remain.
pub fn decode_pcm16(audio: &AudioData) -> Result<AudioBuffer, DecodeError> {
    let bytes = STANDARD.decode(audio.as_str().trim())?;
    let even = bytes.len() - bytes.len() % 2;
    if even == 0 {
        return Err(DecodeError::Empty);
    }

    let samples = bytes[..even]
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    Ok(AudioBuffer::new(samples, SAMPLE_RATE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(bytes: &[u8]) -> AudioData {
        AudioData::new(STANDARD.encode(bytes))
    }

    #[test]
    fn odd_length_payload_drops_trailing_byte() {
        let bytes = vec![0x10_u8; 10_001];
        let buffer = decode_pcm16(&encode(&bytes)).unwrap();
        assert_eq!(buffer.frames(), 5_000);
        assert_eq!(buffer.sample_rate(), SAMPLE_RATE);
    }

    #[test]
    fn samples_are_normalized() {
        let mut bytes = Vec::new();
        for sample in [i16::MIN, 0, 16_384, i16::MAX] {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        let buffer = decode_pcm16(&encode(&bytes)).unwrap();
        assert_eq!(buffer.samples()[0], -1.0);
        assert_eq!(buffer.samples()[1], 0.0);
        assert_eq!(buffer.samples()[2], 0.5);
        assert!(buffer.samples()[3] < 1.0);
    }

    #[test]
    fn garbage_is_an_error() {
        let err = decode_pcm16(&AudioData::new("%%% not base64 %%%")).unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn single_byte_is_empty() {
        let err = decode_pcm16(&encode(&[7])).unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[test]
    fn silence_is_one_second() {
        let silence = AudioBuffer::silence();
        assert_eq!(silence.frames(), 24_000);
        assert!(silence.samples().iter().all(|s| *s == 0.0));
        assert_eq!(silence.duration(), std::time::Duration::from_secs(1));
    }
}
