use crate::config::{ToneConfig, REQUEST_MARK};
use crate::error::Result;

/// Wire symbol: a data value or one of the reserved control codes.
pub type Symbol = i32;

/// A tone frequency in Hz.
pub type Frequency = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Request,
    Response,
}

/// Mapping between wire symbols and tone frequencies.
///
/// Symbols occupy equal-width frequency buckets above `min_frequency`.
/// Encoding places each tone at its bucket midpoint; decoding quantizes any
/// measured frequency back to a bucket index, which absorbs sensor drift of
/// up to half a bucket in either direction.
#[derive(Debug, Clone, Copy)]
pub struct ToneAlphabet {
    config: ToneConfig,
    bucket_width: f64,
}

impl ToneAlphabet {
    pub fn new(config: ToneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bucket_width: config.bucket_width(),
            config,
        })
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    /// Boundary symbol for the given frame kind.
    pub fn mark_symbol(&self, kind: FrameKind) -> Symbol {
        match kind {
            FrameKind::Request => REQUEST_MARK,
            FrameKind::Response => self.config.response_mark(),
        }
    }

    /// Frequency at the midpoint of the symbol's bucket.
    pub fn symbol_to_frequency(&self, symbol: Symbol) -> Frequency {
        symbol as f64 * self.bucket_width
            + self.config.min_frequency
            + (self.bucket_width / 2.0).floor()
    }

    /// Quantize a measured frequency to its bucket index.
    ///
    /// Off-band input (noise) yields a value outside the alphabet; callers
    /// must range-check before treating the result as data.
    pub fn frequency_to_symbol(&self, freq: Frequency) -> Symbol {
        ((freq - self.config.min_frequency) / self.bucket_width).floor() as Symbol
    }

    /// Whether two measured frequencies quantize to the same bucket.
    pub fn same_bucket(&self, f1: Frequency, f2: Frequency) -> bool {
        self.frequency_to_symbol(f1) == self.frequency_to_symbol(f2)
    }

    pub fn is_request_mark(&self, freq: Frequency, duration: f64) -> bool {
        self.frequency_to_symbol(freq) == REQUEST_MARK
            && duration >= self.config.mark_min_duration
    }

    pub fn is_response_mark(&self, freq: Frequency, duration: f64) -> bool {
        self.frequency_to_symbol(freq) == self.config.response_mark()
            && duration >= self.config.mark_min_duration
    }

    /// Classify a run as a frame boundary, if it is one.
    pub fn mark_kind(&self, freq: Frequency, duration: f64) -> Option<FrameKind> {
        if self.is_request_mark(freq, duration) {
            Some(FrameKind::Request)
        } else if self.is_response_mark(freq, duration) {
            Some(FrameKind::Response)
        } else {
            None
        }
    }

    /// Whether a symbol may carry data (excludes marks and the separator).
    pub fn is_data_symbol(&self, symbol: Symbol) -> bool {
        (0..self.config.response_mark()).contains(&symbol)
    }
}
