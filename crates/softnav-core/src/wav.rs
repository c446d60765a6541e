#![forbid(unsafe_code)]

//! Microphone capture framing.
//!
//! The capture node posts `f32` sample chunks to the main thread in delivery
//! order; [`RecordingBuffer`] accumulates one session's chunks and
//! [`encode_wav_pcm16`] frames them as a mono 16-bit PCM RIFF/WAVE file the
//! chat endpoint accepts as an audio payload.

/// Canonical PCM header size: RIFF chunk descriptor + fmt chunk + data
/// chunk header.
pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// MIME type of the encoded payload.
pub const WAV_MIME: &str = "audio/wav";

/// Ordered sample accumulator for one recording session.
#[derive(Debug, Clone)]
pub struct RecordingBuffer {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl RecordingBuffer {
    #[must_use]
    pub const fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    /// Append one delivered chunk. Chunks arrive in order within a session;
    /// the buffer just concatenates.
    pub fn push_chunk(&mut self, chunk: &[f32]) {
        self.samples.extend_from_slice(chunk);
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Captured duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Frame the buffered samples as a WAV file.
    #[must_use]
    pub fn encode_wav(&self) -> Vec<u8> {
        encode_wav_pcm16(&self.samples, self.sample_rate)
    }
}

/// Encode `f32` samples (nominally in `[-1, 1]`, clamped otherwise) as a
/// mono 16-bit PCM RIFF/WAVE byte vector.
#[must_use]
pub fn encode_wav_pcm16(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() * usize::from(BITS_PER_SAMPLE / 8);
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * u32::from(block_align);

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let quantized = (clamped * f32::from(i16::MAX)) as i16;
        out.extend_from_slice(&quantized.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_canonical() {
        let wav = encode_wav_pcm16(&[0.0; 4], 16_000);
        assert_eq!(wav.len(), WAV_HEADER_LEN + 8);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");
        // RIFF size covers everything after the first 8 bytes.
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 8);
        // fmt: PCM, mono, 16 kHz, 16-bit.
        assert_eq!(u16::from_le_bytes(wav[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(wav[24..28].try_into().unwrap()),
            16_000
        );
        assert_eq!(
            u32::from_le_bytes(wav[28..32].try_into().unwrap()),
            32_000
        );
        assert_eq!(u16::from_le_bytes(wav[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 8);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let wav = encode_wav_pcm16(&[2.0, -2.0], 8_000);
        let hi = i16::from_le_bytes(wav[44..46].try_into().unwrap());
        let lo = i16::from_le_bytes(wav[46..48].try_into().unwrap());
        assert_eq!(hi, i16::MAX);
        assert_eq!(lo, -i16::MAX);
    }

    #[test]
    fn buffer_concatenates_chunks_in_order() {
        let mut buffer = RecordingBuffer::new(8_000);
        buffer.push_chunk(&[0.1, 0.2]);
        buffer.push_chunk(&[0.3]);
        assert_eq!(buffer.sample_count(), 3);
        assert!(!buffer.is_empty());
        let wav = buffer.encode_wav();
        assert_eq!(wav.len(), WAV_HEADER_LEN + 6);
    }

    #[test]
    fn duration_tracks_sample_rate() {
        let mut buffer = RecordingBuffer::new(16_000);
        buffer.push_chunk(&vec![0.0; 16_000]);
        assert!((buffer.duration_secs() - 1.0).abs() < f64::EPSILON);
        assert_eq!(RecordingBuffer::new(0).duration_secs(), 0.0);
    }
}
