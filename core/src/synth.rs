use crate::error::{Result, ToneWaveError};
use crate::format::WaveFormat;
use std::f64::consts::TAU;

/// One entry of a tone plan: `samples` samples of a sine at `frequency` Hz.
/// A frequency of zero is silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment {
    pub frequency: f64,
    pub samples: usize,
}

impl ToneSegment {
    pub fn tone(frequency: f64, samples: usize) -> Self {
        Self { frequency, samples }
    }

    pub fn silence(samples: usize) -> Self {
        Self {
            frequency: 0.0,
            samples,
        }
    }

    pub fn is_silence(&self) -> bool {
        self.frequency == 0.0
    }
}

/// Generate `num_samples` samples of a sine at `frequency`, resuming at
/// `start_phase` as if the sinusoid had been running since time 0.
///
/// Returns the samples and the phase at sample `num_samples`, which should be
/// passed as `start_phase` of the next segment. Silence always returns phase 0.
pub fn generate(
    format: &WaveFormat,
    frequency: f64,
    num_samples: usize,
    start_phase: f64,
) -> Result<(Vec<f32>, f64)> {
    if !frequency.is_finite() || frequency < 0.0 {
        return Err(ToneWaveError::InvalidParameter(format!(
            "frequency must be non-negative, got {}",
            frequency
        )));
    }
    if num_samples == 0 {
        return Err(ToneWaveError::InvalidParameter(
            "segment must contain at least one sample".into(),
        ));
    }
    if !(0.0..TAU).contains(&start_phase) {
        return Err(ToneWaveError::InvalidParameter(format!(
            "start phase {} outside [0, 2π)",
            start_phase
        )));
    }

    if frequency == 0.0 {
        return Ok((vec![0.0; num_samples], 0.0));
    }

    let sample_rate = format.sample_rate_hz();
    // Sample offset that puts sample 0 at `start_phase`
    let offset = (sample_rate / frequency) * (start_phase / TAU);
    let phase_at = |i: f64| (TAU * frequency * (i + offset) / sample_rate) % TAU;

    let samples = (0..num_samples)
        .map(|i| phase_at(i as f64).sin() as f32)
        .collect();

    Ok((samples, phase_at(num_samples as f64)))
}

/// Render a whole tone plan, threading the phase from each segment into the
/// next so consecutive tones join without a discontinuity.
pub fn synthesize(format: &WaveFormat, plan: &[ToneSegment]) -> Result<Vec<f32>> {
    let total: usize = plan.iter().map(|segment| segment.samples).sum();
    let mut samples = Vec::with_capacity(total);
    let mut phase = 0.0;

    for segment in plan {
        let (chunk, next_phase) = generate(format, segment.frequency, segment.samples, phase)?;
        samples.extend_from_slice(&chunk);
        phase = next_phase;
    }

    log::debug!(
        "synthesized {} segments into {} samples",
        plan.len(),
        samples.len()
    );
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_resets_phase() {
        let format = WaveFormat::default();
        let (samples, phase) = generate(&format, 0.0, 100, 1.5).unwrap();
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|&s| s == 0.0));
        assert_eq!(phase, 0.0);
    }

    #[test]
    fn test_tone_starts_at_zero_phase() {
        let format = WaveFormat::default();
        let (samples, _) = generate(&format, 300.0, 147, 0.0).unwrap();
        assert_eq!(samples[0], 0.0);
        // A quarter period in, the sine should be near its peak
        assert!(samples[37] > 0.99);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_end_phase_matches_continuous_sine() {
        let format = WaveFormat::default();
        let (_, phase) = generate(&format, 1000.0, 100, 0.0).unwrap();
        let expected = (TAU * 1000.0 * 100.0 / 44100.0) % TAU;
        assert!((phase - expected).abs() < 1e-9);
    }

    #[test]
    fn test_resume_equals_single_call() {
        let format = WaveFormat::default();
        let (whole, _) = generate(&format, 440.0, 300, 0.0).unwrap();
        let (first, phase) = generate(&format, 440.0, 120, 0.0).unwrap();
        let (second, _) = generate(&format, 440.0, 180, phase).unwrap();

        let joined: Vec<f32> = first.into_iter().chain(second).collect();
        for (a, b) in whole.iter().zip(joined.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_phase_continuity_across_frequencies() {
        let format = WaveFormat::default();
        let plan = [
            ToneSegment::tone(300.0, 2205),
            ToneSegment::tone(1000.0, 2205),
            ToneSegment::tone(1500.0, 44),
            ToneSegment::tone(2300.0, 44),
            ToneSegment::tone(1200.0, 441),
        ];
        let samples = synthesize(&format, &plan).unwrap();

        let mut boundary = 0;
        for pair in plan.windows(2) {
            boundary += pair[0].samples;
            let max_freq = pair[0].frequency.max(pair[1].frequency);
            let max_step = (TAU * max_freq / 44100.0) as f32 + 1e-4;
            let jump = (samples[boundary] - samples[boundary - 1]).abs();
            assert!(
                jump <= max_step,
                "jump {} at sample {} exceeds {}",
                jump,
                boundary,
                max_step
            );
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let format = WaveFormat::default();
        assert!(matches!(
            generate(&format, -5.0, 10, 0.0),
            Err(ToneWaveError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate(&format, 300.0, 0, 0.0),
            Err(ToneWaveError::InvalidParameter(_))
        ));
        assert!(matches!(
            generate(&format, 300.0, 10, 7.0),
            Err(ToneWaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_synthesize_length() {
        let format = WaveFormat::default();
        let plan = [ToneSegment::silence(10), ToneSegment::tone(300.0, 20)];
        let samples = synthesize(&format, &plan).unwrap();
        assert_eq!(samples.len(), 30);
        assert!(samples[..10].iter().all(|&s| s == 0.0));
        assert!(plan[0].is_silence());
    }
}
