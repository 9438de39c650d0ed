use crate::aggregate::RunLengthAggregator;
use crate::alphabet::Frequency;
use crate::config::ToneConfig;
use crate::decoder::{FrameDecoder, Message};
use crate::encoder::{FrameEncoder, ToneProgram};
use crate::error::Result;
use crate::payload::{Payload, PayloadKind};

/// A finished recording: one dominant-frequency reading per analyzer tick,
/// plus the wall time the ticks covered.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub samples: Vec<Frequency>,
    pub elapsed_secs: f64,
}

/// Host capability that captures a recording. Pull-once: the host records
/// until stopped, then surrenders the whole sample list.
pub trait AudioSampleSource {
    fn capture(&mut self) -> Result<Recording>;
}

/// Host capability that plays a tone schedule on some oscillator.
pub trait ToneSink {
    fn play(&mut self, program: &ToneProgram) -> Result<()>;
}

/// Session facade tying encoder, aggregator, and decoder to one shared
/// `ToneConfig`. The core stays pure; device state lives entirely in the
/// injected source and sink adapters.
pub struct ToneTransceiver {
    encoder: FrameEncoder,
    decoder: FrameDecoder,
    aggregator: RunLengthAggregator,
    tone_duration: f64,
}

impl ToneTransceiver {
    pub fn new(config: ToneConfig, tone_duration: f64) -> Result<Self> {
        Ok(Self {
            encoder: FrameEncoder::new(config)?,
            decoder: FrameDecoder::new(config)?,
            aggregator: RunLengthAggregator::new(config)?,
            tone_duration,
        })
    }

    pub fn encoder(&self) -> &FrameEncoder {
        &self.encoder
    }

    /// Tone schedule for a response frame carrying `value`.
    pub fn response_program(&self, value: &Payload) -> Result<ToneProgram> {
        let freqs = self.encoder.encode_payload(value)?;
        Ok(self.encoder.tone_program(freqs, self.tone_duration))
    }

    /// Tone schedule for a request frame asking for `kind` data.
    pub fn request_program(&self, kind: PayloadKind) -> Result<ToneProgram> {
        let freqs = self.encoder.encode_request(kind)?;
        Ok(self.encoder.tone_program(freqs, self.tone_duration))
    }

    pub fn send(&self, value: &Payload, sink: &mut impl ToneSink) -> Result<()> {
        sink.play(&self.response_program(value)?)
    }

    pub fn send_request(&self, kind: PayloadKind, sink: &mut impl ToneSink) -> Result<()> {
        sink.play(&self.request_program(kind)?)
    }

    /// Capture a recording and decode it. `expected` is the payload kind a
    /// response frame will be interpreted as.
    pub fn receive(
        &self,
        expected: PayloadKind,
        source: &mut impl AudioSampleSource,
    ) -> Result<Message> {
        let recording = source.capture()?;
        let runs = self
            .aggregator
            .aggregate(&recording.samples, recording.elapsed_secs);
        self.decoder.decode_message(&runs, expected)
    }
}
