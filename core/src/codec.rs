use crate::error::Result;
use crate::format::WaveFormat;
use crate::synth::{synthesize, ToneSegment};

/// A tone protocol: how a payload maps to a sequence of tone segments, and
/// how a waveform maps back to a payload.
///
/// `encode` and `decode` are the shared driver; implementors only describe
/// their symbol-to-tone plan and their classifier.
pub trait ToneCodec {
    type Payload: ?Sized;
    type Decoded;

    fn format(&self) -> &WaveFormat;

    /// Translate a payload into tone segments
    fn plan(&self, payload: &Self::Payload) -> Result<Vec<ToneSegment>>;

    /// Recover a payload from normalized samples
    fn classify(&self, samples: &[f32]) -> Result<Self::Decoded>;

    fn encode(&self, payload: &Self::Payload) -> Result<Vec<f32>> {
        let plan = self.plan(payload)?;
        synthesize(self.format(), &plan)
    }

    fn decode(&self, samples: &[f32]) -> Result<Self::Decoded> {
        self.classify(samples)
    }
}
