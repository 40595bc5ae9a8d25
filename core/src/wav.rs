use crate::error::{Result, ToneWaveError};
use crate::format::WaveFormat;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Read, Seek, Write};
use std::path::Path;

fn wav_spec(format: &WaveFormat) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: SampleFormat::Int,
    }
}

/// Write normalized samples as mono 16-bit PCM
pub fn write_wav_to<W: Write + Seek>(writer: W, samples: &[f32], format: &WaveFormat) -> Result<()> {
    format.validate()?;
    let mut writer = WavWriter::new(writer, wav_spec(format))?;
    for &sample in samples {
        writer.write_sample(format.quantize(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], format: &WaveFormat) -> Result<()> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_wav_to(file, samples, format)
}

/// Read raw PCM samples, rejecting anything but the exact format we write
pub fn read_wav_raw_from<R: Read>(reader: R, format: &WaveFormat) -> Result<Vec<i16>> {
    let mut reader = match WavReader::new(reader) {
        Ok(reader) => reader,
        Err(hound::Error::Unsupported) => {
            return Err(ToneWaveError::ContainerFormatMismatch(
                "unsupported WAV encoding".into(),
            ))
        }
        Err(err) => return Err(err.into()),
    };

    let spec = reader.spec();
    let expected = wav_spec(format);
    if spec != expected {
        return Err(ToneWaveError::ContainerFormatMismatch(format!(
            "expected {} channel, {} Hz, {}-bit {:?}, got {} channels, {} Hz, {}-bit {:?}",
            expected.channels,
            expected.sample_rate,
            expected.bits_per_sample,
            expected.sample_format,
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    log::debug!("read {} samples at {} Hz", samples.len(), spec.sample_rate);
    Ok(samples)
}

/// Read samples and scale them back to [-1, 1]
pub fn read_wav_from<R: Read>(reader: R, format: &WaveFormat) -> Result<Vec<f32>> {
    let raw = read_wav_raw_from(reader, format)?;
    Ok(raw.into_iter().map(|value| format.normalize(value)).collect())
}

pub fn read_wav_raw<P: AsRef<Path>>(path: P, format: &WaveFormat) -> Result<Vec<i16>> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_wav_raw_from(file, format)
}

pub fn read_wav<P: AsRef<Path>>(path: P, format: &WaveFormat) -> Result<Vec<f32>> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_wav_from(file, format)
}
