use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneWaveError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Waveform container format mismatch: {0}")]
    ContainerFormatMismatch(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Expected 5 distinct Morse block lengths, found {0}")]
    AmbiguousBlockCardinality(usize),

    #[error("Unknown Morse sequence: {0:?}")]
    UnknownMorseSequence(String),

    #[error("Character {0:?} cannot be encoded")]
    UnknownCharacter(char),

    #[error("Frequency threshold cannot separate tone runs")]
    DegenerateThreshold,

    #[error("Recovered {0} bits, not a whole number of bytes")]
    MisalignedBitStream(usize),

    #[error("Recovered only {0} image rows")]
    IncompleteImage(usize),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToneWaveError>;
