use crate::error::{Result, ToneWaveError};

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default multiplier applied when quantizing [-1, 1] samples to PCM
pub const DEFAULT_AMPLITUDE: f32 = 32000.0;

/// The only PCM width the containers read and write
pub const BITS_PER_SAMPLE: u16 = 16;

/// Fixed waveform parameters shared by the synthesizer, the codecs and the
/// WAV container.
///
/// A waveform written with one `WaveFormat` can only be decoded with the same
/// one: the WAV reader rejects files whose header disagrees with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveFormat {
    pub sample_rate: u32,
    pub amplitude: f32,
    pub bits_per_sample: u16,
}

impl WaveFormat {
    pub fn new(sample_rate: u32, amplitude: f32) -> Result<Self> {
        let format = Self {
            sample_rate,
            amplitude,
            bits_per_sample: BITS_PER_SAMPLE,
        };
        format.validate()?;
        Ok(format)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneWaveError::InvalidParameter(
                "sample rate must be positive".into(),
            ));
        }
        if self.bits_per_sample != BITS_PER_SAMPLE {
            return Err(ToneWaveError::InvalidParameter(format!(
                "only {}-bit PCM is supported, got {}",
                BITS_PER_SAMPLE, self.bits_per_sample
            )));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= i16::MAX as f32) {
            return Err(ToneWaveError::InvalidParameter(format!(
                "amplitude {} outside (0, {}]",
                self.amplitude,
                i16::MAX
            )));
        }
        Ok(())
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate as f64
    }

    /// Number of samples covering `seconds`, rounded to the nearest sample
    pub fn samples_for_duration(&self, seconds: f64) -> Result<usize> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ToneWaveError::InvalidParameter(format!(
                "duration must be positive, got {}",
                seconds
            )));
        }
        let samples = (self.sample_rate_hz() * seconds).round() as usize;
        if samples == 0 {
            return Err(ToneWaveError::InvalidParameter(format!(
                "duration {}s is shorter than one sample",
                seconds
            )));
        }
        Ok(samples)
    }

    pub fn samples_for_millis(&self, millis: u32) -> usize {
        (self.sample_rate_hz() * millis as f64 / 1000.0).round() as usize
    }

    /// Scale a [-1, 1] sample to PCM, truncating toward zero
    pub fn quantize(&self, sample: f32) -> i16 {
        let clamped = sample.clamp(-1.0, 1.0);
        (clamped * self.amplitude) as i16
    }

    pub fn normalize(&self, value: i16) -> f32 {
        value as f32 / self.amplitude
    }
}

impl Default for WaveFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }
}
