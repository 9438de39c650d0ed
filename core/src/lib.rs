//! Acoustic FSK link for small typed payloads
//!
//! Encodes a color, integer, or short string as a sequence of discrete
//! audio tones, and decodes a recorded stream of dominant-frequency
//! readings back into the payload. The host supplies the readings (one
//! loudest-frequency scalar per analyzer tick); no FFT or peak picking
//! happens here.

pub mod aggregate;
pub mod alphabet;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod link;
pub mod payload;

pub use aggregate::{Run, RunLengthAggregator};
pub use alphabet::{FrameKind, Frequency, Symbol, ToneAlphabet};
pub use config::ToneConfig;
pub use decoder::{Frame, FrameDecoder, Message};
pub use encoder::{FrameEncoder, ToneEvent, ToneProgram};
pub use error::{Result, ToneCastError};
pub use link::{AudioSampleSource, Recording, ToneSink, ToneTransceiver};
pub use payload::{Payload, PayloadKind};

// Default (v2) wire parameters
pub const MIN_FREQUENCY: f64 = 2000.0;
pub const MAX_FREQUENCY: f64 = 4960.0;
pub const TONES_NUMBER: i32 = 17;

/// Minimum duration for a run to count as a frame boundary mark
pub const MARK_MIN_DURATION: f64 = 0.1;
/// Minimum duration for a run inside a frame to count as a data symbol
pub const DATA_MIN_DURATION: f64 = 0.3;
/// Per-tone playback duration handed to the oscillator adapter
pub const DEFAULT_TONE_DURATION: f64 = 0.5;
