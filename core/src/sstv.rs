use crate::codec::ToneCodec;
use crate::error::{Result, ToneWaveError};
use crate::format::WaveFormat;
use crate::runs::{extract_tone_runs, group_runs};
use crate::synth::ToneSegment;
use image::{GrayImage, Luma};

// Robot-style black and white mode, 160x120
//
// Header:
// - 300ms 1900Hz leader, 10ms 1200Hz break, 300ms 1900Hz leader
// VIS:
// - 30ms 1200Hz start, 8 bits of 30ms (1100Hz = 1, 1300Hz = 0), 30ms 1200Hz stop
// Scan lines (x120):
// - 10ms 1200Hz sync, then 160 pixels of 1ms (1500Hz black, 2300Hz white)

pub const SSTV_WIDTH: u32 = 160;
pub const SSTV_HEIGHT: u32 = 120;

pub const FREQ_LEADER: f64 = 1900.0;
pub const FREQ_SYNC: f64 = 1200.0;
pub const FREQ_VIS_ONE: f64 = 1100.0;
pub const FREQ_VIS_ZERO: f64 = 1300.0;
pub const FREQ_BLACK: f64 = 1500.0;
pub const FREQ_WHITE: f64 = 2300.0;

const LEADER_MS: u32 = 300;
const BREAK_MS: u32 = 10;
const VIS_BIT_MS: u32 = 30;
const HSYNC_MS: u32 = 10;
const PIXEL_MS: u32 = 1;

/// Mode bits (B/W, 160x120, Robot) with even parity
pub const VIS_SIGNATURE: [u8; 8] = [0, 1, 0, 0, 0, 0, 0, 1];

/// Pixel intensities at or above this are sent as white
const WHITE_CUTOFF: u8 = 128;

/// Upper bounds of the sync and black bands
const SYNC_BAND_MAX: u32 = 1450;
const BLACK_BAND_MAX: u32 = 1900;

/// Groups this short (in samples) are treated as noise
const SSTV_NOISE_SAMPLES: usize = 2;

/// Lines produced by the header and VIS before the first scan line
const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Sync,
    Black,
    White,
}

impl Band {
    fn of(frequency: u32) -> Self {
        if frequency < SYNC_BAND_MAX {
            Band::Sync
        } else if frequency < BLACK_BAND_MAX {
            Band::Black
        } else {
            Band::White
        }
    }
}

/// Scan-line image codec for 160x120 8-bit grayscale images, sent as 1-bit
///
/// Decoding ignores the header and VIS content; it only counts sync pulses.
/// Pixel boundaries snap to zero crossings, so an edge can land one column
/// away from where it was sent.
pub struct SstvCodec {
    format: WaveFormat,
}

impl SstvCodec {
    pub fn new() -> Self {
        Self {
            format: WaveFormat::default(),
        }
    }

    pub fn with_format(format: WaveFormat) -> Result<Self> {
        format.validate()?;
        Ok(Self { format })
    }

    pub fn check_image(image: &GrayImage) -> Result<()> {
        if image.dimensions() != (SSTV_WIDTH, SSTV_HEIGHT) {
            return Err(ToneWaveError::UnsupportedImage(format!(
                "expected {}x{}, got {}x{}",
                SSTV_WIDTH,
                SSTV_HEIGHT,
                image.width(),
                image.height()
            )));
        }
        Ok(())
    }

    fn pixel_samples(&self) -> usize {
        self.format.samples_for_millis(PIXEL_MS)
    }

    /// Rebuild scan lines (white = true) from a waveform, header lines included
    pub fn scan_lines(&self, samples: &[f32]) -> Vec<Vec<bool>> {
        let runs = extract_tone_runs(samples, self.format.sample_rate);
        let groups = group_runs(
            runs.iter().map(|run| (Band::of(run.frequency), run.samples)),
            SSTV_NOISE_SAMPLES,
        );
        let unit = self.pixel_samples() as f64;

        let mut lines = Vec::new();
        let mut line = Vec::new();
        for (band, len) in groups {
            match band {
                Band::Sync => lines.push(std::mem::take(&mut line)),
                Band::Black | Band::White => {
                    let count = (len as f64 / unit).round() as usize;
                    line.extend(std::iter::repeat(band == Band::White).take(count));
                }
            }
        }
        lines.push(line);

        log::debug!(
            "sstv: {} periods, {} lines including header",
            runs.len(),
            lines.len()
        );
        lines
    }
}

/// Pad a line by repeating its last pixel, then cut it to the image width
fn fit_line(mut line: Vec<bool>) -> Vec<bool> {
    let width = SSTV_WIDTH as usize;
    let fill = line.last().copied().unwrap_or(false);
    line.resize(width, fill);
    line
}

impl Default for SstvCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneCodec for SstvCodec {
    type Payload = GrayImage;
    type Decoded = GrayImage;

    fn format(&self) -> &WaveFormat {
        &self.format
    }

    fn plan(&self, image: &GrayImage) -> Result<Vec<ToneSegment>> {
        Self::check_image(image)?;
        let ms = |millis| self.format.samples_for_millis(millis);

        let mut plan = vec![
            ToneSegment::tone(FREQ_LEADER, ms(LEADER_MS)),
            ToneSegment::tone(FREQ_SYNC, ms(BREAK_MS)),
            ToneSegment::tone(FREQ_LEADER, ms(LEADER_MS)),
            ToneSegment::tone(FREQ_SYNC, ms(VIS_BIT_MS)),
        ];
        for &bit in &VIS_SIGNATURE {
            let frequency = if bit == 1 { FREQ_VIS_ONE } else { FREQ_VIS_ZERO };
            plan.push(ToneSegment::tone(frequency, ms(VIS_BIT_MS)));
        }
        plan.push(ToneSegment::tone(FREQ_SYNC, ms(VIS_BIT_MS)));

        let pixel = ms(PIXEL_MS);
        for row in image.rows() {
            plan.push(ToneSegment::tone(FREQ_SYNC, ms(HSYNC_MS)));
            for &Luma([value]) in row {
                let frequency = if value >= WHITE_CUTOFF {
                    FREQ_WHITE
                } else {
                    FREQ_BLACK
                };
                plan.push(ToneSegment::tone(frequency, pixel));
            }
        }
        Ok(plan)
    }

    fn classify(&self, samples: &[f32]) -> Result<GrayImage> {
        let lines: Vec<Vec<bool>> = self
            .scan_lines(samples)
            .into_iter()
            .skip(HEADER_LINES)
            .take(SSTV_HEIGHT as usize)
            .map(fit_line)
            .collect();
        if lines.len() < SSTV_HEIGHT as usize {
            return Err(ToneWaveError::IncompleteImage(lines.len()));
        }

        Ok(GrayImage::from_fn(SSTV_WIDTH, SSTV_HEIGHT, |x, y| {
            let white = lines[y as usize][x as usize];
            Luma([if white { 255 } else { 0 }])
        }))
    }
}
