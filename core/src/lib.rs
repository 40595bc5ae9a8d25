//! Acoustic payload transmission over simple tone codecs
//!
//! Text, Morse and a fixed 160x120 1-bit image are turned into phase-continuous
//! tone sequences and recovered from (near-clean) recordings of them:
//! - BFSK: 8-bit ASCII, one of two frequencies per bit
//! - Morse: on/off keying of a single tone
//! - SSTV-style scan lines: one tone per pixel plus sync pulses

pub mod error;
pub mod format;
pub mod synth;
pub mod runs;
pub mod codec;
pub mod bfsk;
pub mod morse;
pub mod sstv;
pub mod wav;
pub mod bitmap;

pub use bfsk::BfskCodec;
pub use codec::ToneCodec;
pub use error::{Result, ToneWaveError};
pub use format::WaveFormat;
pub use morse::MorseCodec;
pub use sstv::SstvCodec;
pub use synth::ToneSegment;

pub use format::{DEFAULT_AMPLITUDE, DEFAULT_SAMPLE_RATE};
