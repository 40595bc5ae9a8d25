use crate::codec::ToneCodec;
use crate::error::{Result, ToneWaveError};
use crate::format::WaveFormat;
use crate::runs::{extract_tone_runs, group_runs};
use crate::synth::ToneSegment;

/// Frequency that represents a 0 bit
pub const BFSK_FREQ_LOW: f64 = 300.0;

/// Frequency that represents a 1 bit
pub const BFSK_FREQ_HIGH: f64 = 1000.0;

/// Bit groups this short (in samples) are treated as noise
const BFSK_NOISE_SAMPLES: usize = 10;

const BITS_PER_CHAR: usize = 8;

/// Binary frequency-shift keying over 8-bit ASCII
///
/// Each character is sent MSB first, one tone per bit for `bit_duration`
/// seconds. The decoder needs no timing information: it thresholds the
/// per-period frequency estimate at the duration-weighted mean and takes the
/// shortest run of equal bits as one bit long.
///
/// Limitations:
/// - The message must contain an isolated bit somewhere (a `010` or `101`),
///   otherwise the inferred bit length is a multiple of the real one
/// - A payload whose bits are all equal has no usable threshold
pub struct BfskCodec {
    format: WaveFormat,
    /// Seconds per bit; `None` for a codec that only decodes
    bit_duration: Option<f64>,
}

impl BfskCodec {
    pub fn new(bit_duration: f64) -> Result<Self> {
        Self::with_format(WaveFormat::default(), bit_duration)
    }

    pub fn with_format(format: WaveFormat, bit_duration: f64) -> Result<Self> {
        format.validate()?;
        format.samples_for_duration(bit_duration)?;
        Ok(Self {
            format,
            bit_duration: Some(bit_duration),
        })
    }

    /// Decode-only codec: the bit length is inferred from the signal, so
    /// none is stored and `encode` fails with `InvalidParameter`
    pub fn decoder() -> Self {
        Self {
            format: WaveFormat::default(),
            bit_duration: None,
        }
    }

    /// Binary ASCII representation of `message`, 8 bits per character
    pub fn bit_string(message: &str) -> Result<String> {
        message
            .chars()
            .map(|ch| {
                if ch.is_ascii() {
                    Ok(format!("{:08b}", ch as u8))
                } else {
                    Err(ToneWaveError::UnknownCharacter(ch))
                }
            })
            .collect()
    }

    /// Recover the bit string from a waveform
    pub fn extract_bits(&self, samples: &[f32]) -> Result<String> {
        let runs = extract_tone_runs(samples, self.format.sample_rate);
        let total_samples: usize = runs.iter().map(|run| run.samples).sum();
        if total_samples == 0 {
            return Err(ToneWaveError::DegenerateThreshold);
        }

        let weighted: f64 = runs
            .iter()
            .map(|run| run.frequency as f64 * run.samples as f64)
            .sum();
        let threshold = weighted / total_samples as f64;

        let classified: Vec<(bool, usize)> = runs
            .iter()
            .map(|run| (run.frequency as f64 > threshold, run.samples))
            .collect();
        let highs = classified.iter().filter(|(bit, _)| *bit).count();
        if highs == 0 || highs == classified.len() {
            return Err(ToneWaveError::DegenerateThreshold);
        }

        let groups = group_runs(classified, BFSK_NOISE_SAMPLES);
        let samples_per_bit = groups
            .iter()
            .map(|&(_, len)| len)
            .min()
            .ok_or(ToneWaveError::DegenerateThreshold)?;

        log::debug!(
            "bfsk: {} periods, threshold {:.1} Hz, {} groups, {} samples per bit",
            runs.len(),
            threshold,
            groups.len(),
            samples_per_bit
        );

        let mut bits = String::new();
        for (bit, len) in groups {
            let count = (len as f64 / samples_per_bit as f64).round() as usize;
            let symbol = if bit { '1' } else { '0' };
            bits.extend(std::iter::repeat(symbol).take(count));
        }
        Ok(bits)
    }
}

impl ToneCodec for BfskCodec {
    type Payload = str;
    type Decoded = String;

    fn format(&self) -> &WaveFormat {
        &self.format
    }

    fn plan(&self, message: &str) -> Result<Vec<ToneSegment>> {
        if message.is_empty() {
            return Err(ToneWaveError::InvalidParameter(
                "message must not be empty".into(),
            ));
        }
        let bits = Self::bit_string(message)?;
        log::info!("Binary ASCII: \"{}\"", bits);

        let bit_duration = self.bit_duration.ok_or_else(|| {
            ToneWaveError::InvalidParameter("decode-only codec has no bit duration".into())
        })?;
        let samples_per_bit = self.format.samples_for_duration(bit_duration)?;
        Ok(bits
            .chars()
            .map(|bit| {
                let frequency = if bit == '1' {
                    BFSK_FREQ_HIGH
                } else {
                    BFSK_FREQ_LOW
                };
                ToneSegment::tone(frequency, samples_per_bit)
            })
            .collect())
    }

    fn classify(&self, samples: &[f32]) -> Result<String> {
        let bits = self.extract_bits(samples)?;
        log::info!("Binary ASCII: \"{}\"", bits);

        if bits.len() % BITS_PER_CHAR != 0 {
            return Err(ToneWaveError::MisalignedBitStream(bits.len()));
        }

        let bytes = bits.as_bytes();
        Ok(bytes
            .chunks(BITS_PER_CHAR)
            .map(|chunk| {
                let value = chunk
                    .iter()
                    .fold(0u8, |acc, &bit| (acc << 1) | (bit - b'0'));
                char::from(value)
            })
            .collect())
    }
}
