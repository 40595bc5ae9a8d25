use crate::codec::ToneCodec;
use crate::error::{Result, ToneWaveError};
use crate::format::WaveFormat;
use crate::runs::extract_on_off_blocks;
use crate::synth::ToneSegment;
use std::collections::BTreeSet;

/// Keying frequency
pub const MORSE_FREQ: f64 = 300.0;

/// Calibration word sent ahead of every message.
///
/// `VVV` followed by a word gap contains dots, dashes and all three gap
/// lengths, so the decoder always sees the five block classes it needs.
pub const MORSE_PREAMBLE: &str = "VVV ";

/// Character table. A space maps to a space so that joining letter codes with
/// single spaces leaves three spaces between words.
const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    (' ', " "),
    ('.', ".-.-.-"),
    (',', "--..--"),
    (':', "---..."),
];

/// Marker used while rebuilding text from blocks
const LETTER_BREAK: char = '#';

pub fn code_for(ch: char) -> Option<&'static str> {
    MORSE_TABLE
        .iter()
        .find(|(key, _)| *key == ch)
        .map(|(_, code)| *code)
}

pub fn char_for(code: &str) -> Option<char> {
    MORSE_TABLE
        .iter()
        .find(|(_, value)| *value == code)
        .map(|(key, _)| *key)
}

/// On/off keyed Morse code
///
/// Timing, in units of `tick_length`:
/// - dot: 1 silence + 1 tone
/// - dash: 1 silence + 3 tone
/// - space in the text morse: 2 silence (3 between letters, 7 between words
///   once the next atom's leading silence is added)
pub struct MorseCodec {
    format: WaveFormat,
    /// Seconds per tick; `None` for a codec that only decodes
    tick_length: Option<f64>,
}

impl MorseCodec {
    pub fn new(tick_length: f64) -> Result<Self> {
        Self::with_format(WaveFormat::default(), tick_length)
    }

    pub fn with_format(format: WaveFormat, tick_length: f64) -> Result<Self> {
        format.validate()?;
        format.samples_for_duration(tick_length)?;
        Ok(Self {
            format,
            tick_length: Some(tick_length),
        })
    }

    /// Decode-only codec. Every length is inferred from the signal itself,
    /// so no tick is stored and `encode` fails with `InvalidParameter`
    pub fn decoder() -> Self {
        Self {
            format: WaveFormat::default(),
            tick_length: None,
        }
    }

    /// Text morse for `message`: letter codes joined by single spaces
    pub fn text_morse(message: &str) -> Result<String> {
        let codes = message
            .chars()
            .map(|ch| code_for(ch).ok_or(ToneWaveError::UnknownCharacter(ch)))
            .collect::<Result<Vec<_>>>()?;
        Ok(codes.join(" "))
    }

    /// Signed block lengths recovered from a waveform, tone positive
    pub fn blocks(&self, samples: &[f32]) -> Vec<i64> {
        extract_on_off_blocks(samples)
    }

    /// Rebuild the text morse of a waveform, with `#` between letters
    pub fn recover_text_morse(&self, samples: &[f32]) -> Result<String> {
        let blocks = self.blocks(samples);

        // Silences are negative, so sorting puts the longest gap first
        let lengths: Vec<i64> = blocks
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if lengths.len() != 5 {
            log::debug!("morse: block lengths {:?}", lengths);
            return Err(ToneWaveError::AmbiguousBlockCardinality(lengths.len()));
        }
        log::debug!(
            "morse: word gap {}, letter gap {}, symbol gap {}, dot {}, dash {}",
            lengths[0],
            lengths[1],
            lengths[2],
            lengths[3],
            lengths[4]
        );

        let mut text = String::new();
        for block in blocks {
            match lengths.iter().position(|&len| len == block) {
                Some(0) => {
                    text.push(LETTER_BREAK);
                    text.push(' ');
                    text.push(LETTER_BREAK);
                }
                Some(1) => text.push(LETTER_BREAK),
                Some(3) => text.push('.'),
                Some(4) => text.push('-'),
                _ => {}
            }
        }
        Ok(text)
    }
}

impl ToneCodec for MorseCodec {
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
        log::info!("Text morse: \"{}\"", Self::text_morse(message)?);

        let tick_length = self.tick_length.ok_or_else(|| {
            ToneWaveError::InvalidParameter("decode-only codec has no tick length".into())
        })?;
        let tick = self.format.samples_for_duration(tick_length)?;
        let text = Self::text_morse(&format!("{}{}", MORSE_PREAMBLE, message))?;

        let mut plan = Vec::with_capacity(text.len() * 2);
        for symbol in text.chars() {
            match symbol {
                ' ' => plan.push(ToneSegment::silence(2 * tick)),
                '.' => {
                    plan.push(ToneSegment::silence(tick));
                    plan.push(ToneSegment::tone(MORSE_FREQ, tick));
                }
                '-' => {
                    plan.push(ToneSegment::silence(tick));
                    plan.push(ToneSegment::tone(MORSE_FREQ, 3 * tick));
                }
                _ => {}
            }
        }
        Ok(plan)
    }

    fn classify(&self, samples: &[f32]) -> Result<String> {
        let text = self.recover_text_morse(samples)?;
        log::info!("Text morse: \"{}\"", text.replace(LETTER_BREAK, " "));

        let message = text
            .split(LETTER_BREAK)
            .map(|code| {
                char_for(code)
                    .ok_or_else(|| ToneWaveError::UnknownMorseSequence(code.to_string()))
            })
            .collect::<Result<String>>()?;

        Ok(match message.strip_prefix(MORSE_PREAMBLE) {
            Some(stripped) => stripped.to_string(),
            None => message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantized(samples: Vec<f32>) -> Vec<f32> {
        let format = WaveFormat::default();
        samples
            .into_iter()
            .map(|s| format.normalize(format.quantize(s)))
            .collect()
    }

    /// Tone plan for a raw text morse string, without the preamble
    fn plan_for(text_morse: &str, tick: usize) -> Vec<ToneSegment> {
        let mut plan = Vec::new();
        for symbol in text_morse.chars() {
            match symbol {
                ' ' => plan.push(ToneSegment::silence(2 * tick)),
                '.' => {
                    plan.push(ToneSegment::silence(tick));
                    plan.push(ToneSegment::tone(MORSE_FREQ, tick));
                }
                _ => {
                    plan.push(ToneSegment::silence(tick));
                    plan.push(ToneSegment::tone(MORSE_FREQ, 3 * tick));
                }
            }
        }
        plan
    }

    #[test]
    fn test_table_is_invertible() {
        for (ch, code) in MORSE_TABLE {
            assert_eq!(char_for(code), Some(*ch));
        }
    }

    #[test]
    fn test_text_morse() {
        let text = MorseCodec::text_morse("SOS").unwrap();
        assert_eq!(text, "... --- ...");
        assert_eq!(text.replace(' ', ""), "...---...");
        assert_eq!(MorseCodec::text_morse("E T").unwrap(), ".   -");
    }

    #[test]
    fn test_text_morse_rejects_unknown() {
        assert!(matches!(
            MorseCodec::text_morse("SOS!"),
            Err(ToneWaveError::UnknownCharacter('!'))
        ));
        assert!(matches!(
            MorseCodec::text_morse("sos"),
            Err(ToneWaveError::UnknownCharacter('s'))
        ));
    }

    #[test]
    fn test_plan_timing() {
        let codec = MorseCodec::new(0.05).unwrap();
        let plan = codec.plan("E").unwrap();
        let tick = 2205;

        // VVV then a word gap then E
        let silence: usize = plan.iter().filter(|s| s.is_silence()).map(|s| s.samples).sum();
        let tone: usize = plan.iter().filter(|s| !s.is_silence()).map(|s| s.samples).sum();
        assert_eq!(tone, (3 * (3 + 3) + 1) * tick);
        // 13 atoms each lead with a tick of silence, plus 5 spaces of 2 ticks
        assert_eq!(silence, (13 + 10) * tick);
    }

    #[test]
    fn test_round_trip_sos() {
        let codec = MorseCodec::new(0.06).unwrap();
        let samples = quantized(codec.encode("SOS").unwrap());
        assert_eq!(codec.decode(&samples).unwrap(), "SOS");
    }

    #[test]
    fn test_round_trip_without_quantization() {
        let codec = MorseCodec::new(0.05).unwrap();
        let samples = codec.encode("HELLO FRIEND").unwrap();
        assert_eq!(codec.decode(&samples).unwrap(), "HELLO FRIEND");
    }

    #[test]
    fn test_block_classes() {
        let codec = MorseCodec::new(0.06).unwrap();
        let samples = quantized(codec.encode("SOS").unwrap());
        let classes: BTreeSet<i64> = codec.blocks(&samples).into_iter().collect();
        let classes: Vec<i64> = classes.into_iter().collect();
        assert_eq!(classes, vec![-18523, -7939, -2647, 2645, 7937]);
    }

    #[test]
    fn test_decode_without_preamble() {
        // A bare transmission with all five classes decodes as is
        let format = WaveFormat::default();
        let plan = plan_for(&MorseCodec::text_morse("ET TE").unwrap(), 2205);
        let samples = crate::synth::synthesize(&format, &plan).unwrap();
        assert_eq!(MorseCodec::decoder().decode(&samples).unwrap(), "ET TE");
    }

    #[test]
    fn test_decode_unknown_letter_group() {
        // Seven dashes is not in the table; the other groups supply all five classes
        let format = WaveFormat::default();
        let samples = crate::synth::synthesize(&format, &plan_for("-------   . -", 2205)).unwrap();
        assert!(matches!(
            MorseCodec::decoder().decode(&samples),
            Err(ToneWaveError::UnknownMorseSequence(code)) if code == "-------"
        ));
    }

    #[test]
    fn test_decoder_cannot_encode() {
        assert!(matches!(
            MorseCodec::decoder().encode("SOS"),
            Err(ToneWaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_decode_ambiguous_blocks() {
        let format = WaveFormat::default();
        let samples = crate::synth::synthesize(
            &format,
            &[
                ToneSegment::silence(500),
                ToneSegment::tone(MORSE_FREQ, 500),
                ToneSegment::silence(500),
            ],
        )
        .unwrap();
        assert!(matches!(
            MorseCodec::decoder().decode(&samples),
            Err(ToneWaveError::AmbiguousBlockCardinality(_))
        ));
    }

    #[test]
    fn test_encode_rejects_empty_message() {
        let codec = MorseCodec::new(0.06).unwrap();
        assert!(matches!(
            codec.encode(""),
            Err(ToneWaveError::InvalidParameter(_))
        ));
    }
}
