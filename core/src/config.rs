use crate::error::{Result, ToneCastError};
use crate::{DATA_MIN_DURATION, MARK_MIN_DURATION, MAX_FREQUENCY, MIN_FREQUENCY, TONES_NUMBER};

/// Request-frame boundary symbol, below the data alphabet
pub const REQUEST_MARK: i32 = -2;
/// Anti-collision filler symbol, never carries data
pub const SEPARATOR: i32 = -1;

/// Versioned wire parameters shared by encoder and decoder.
///
/// Both ends of a session must be built from the same `ToneConfig`;
/// keeping every tunable in one struct is what guarantees they agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneConfig {
    /// Lower bound of the alphabet band in Hz
    pub min_frequency: f64,
    /// Upper bound of the alphabet band in Hz
    pub max_frequency: f64,
    /// Alphabet size before control symbols; the top symbol is the response mark
    pub tones_number: i32,
    /// Minimum run duration for a mark tone, seconds
    pub mark_min_duration: f64,
    /// Minimum run duration for a data tone, seconds
    pub data_min_duration: f64,
    /// Surface out-of-alphabet data symbols as errors instead of dropping them
    pub strict_alphabet: bool,
}

impl ToneConfig {
    /// Current wire format: 2000-4960 Hz, 17 tones (nibble data alphabet).
    pub fn v2() -> Self {
        Self {
            min_frequency: MIN_FREQUENCY,
            max_frequency: MAX_FREQUENCY,
            tones_number: TONES_NUMBER,
            mark_min_duration: MARK_MIN_DURATION,
            data_min_duration: DATA_MIN_DURATION,
            strict_alphabet: false,
        }
    }

    /// Earlier wideband revision: 2000-20000 Hz, 257 tones.
    pub fn v1_wideband() -> Self {
        Self {
            min_frequency: 2000.0,
            max_frequency: 20000.0,
            tones_number: 257,
            ..Self::v2()
        }
    }

    /// Quantization step in Hz. Floored, so every bucket has integral width.
    pub fn bucket_width(&self) -> f64 {
        ((self.max_frequency - self.min_frequency) / self.tones_number as f64).floor()
    }

    /// Response-frame boundary symbol, the top of the alphabet.
    pub fn response_mark(&self) -> i32 {
        self.tones_number - 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.tones_number < 2 {
            return Err(ToneCastError::InvalidConfig(format!(
                "tones_number {} cannot hold data and a response mark",
                self.tones_number
            )));
        }
        if self.bucket_width() < 1.0 {
            return Err(ToneCastError::InvalidConfig(format!(
                "band {}-{} Hz is too narrow for {} tones",
                self.min_frequency, self.max_frequency, self.tones_number
            )));
        }
        if self.mark_min_duration <= 0.0 || self.data_min_duration <= 0.0 {
            return Err(ToneCastError::InvalidConfig(
                "duration gates must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::v2()
    }
}
