use log::debug;

use crate::alphabet::{FrameKind, Frequency, Symbol, ToneAlphabet};
use crate::config::{ToneConfig, SEPARATOR};
use crate::error::{Result, ToneCastError};
use crate::payload::{self, Payload, PayloadKind};

/// One scheduled tone: frequency plus absolute start offset from playback
/// begin. Duration is uniform across the program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEvent {
    pub frequency: Frequency,
    pub start_offset: f64,
}

/// An ordered tone schedule for the external oscillator adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneProgram {
    pub events: Vec<ToneEvent>,
    pub tone_duration: f64,
}

impl ToneProgram {
    pub fn total_duration(&self) -> f64 {
        self.events.len() as f64 * self.tone_duration
    }
}

/// Builds the tone sequence for one frame: payload symbols mapped to bucket
/// midpoints, wrapped in the frame kind's mark tone, with a separator
/// inserted wherever two adjacent tones would otherwise be equal (run-length
/// aggregation on the receiving side would merge them into one run).
pub struct FrameEncoder {
    alphabet: ToneAlphabet,
}

impl FrameEncoder {
    pub fn new(config: ToneConfig) -> Result<Self> {
        Ok(Self {
            alphabet: ToneAlphabet::new(config)?,
        })
    }

    pub fn alphabet(&self) -> &ToneAlphabet {
        &self.alphabet
    }

    /// Encode data symbols into the frame's frequency sequence.
    pub fn encode_symbols(&self, symbols: &[Symbol], kind: FrameKind) -> Result<Vec<Frequency>> {
        for &symbol in symbols {
            if !self.alphabet.is_data_symbol(symbol) {
                return Err(ToneCastError::OutOfAlphabetSymbol(symbol));
            }
        }

        let mark = self.alphabet.symbol_to_frequency(self.alphabet.mark_symbol(kind));
        let mut freqs = Vec::with_capacity(symbols.len() + 2);
        freqs.push(mark);
        freqs.extend(symbols.iter().map(|&s| self.alphabet.symbol_to_frequency(s)));
        freqs.push(mark);

        self.insert_separators(&mut freqs);
        debug!(
            "encoded {} symbols into {} tones ({:?} frame)",
            symbols.len(),
            freqs.len(),
            kind
        );
        Ok(freqs)
    }

    /// Encode a payload as a response frame.
    pub fn encode_payload(&self, value: &Payload) -> Result<Vec<Frequency>> {
        let symbols = payload::encode(value)?;
        self.encode_symbols(&symbols, FrameKind::Response)
    }

    /// Encode a request for the given payload kind: a single request-code
    /// symbol wrapped in request marks.
    pub fn encode_request(&self, kind: PayloadKind) -> Result<Vec<Frequency>> {
        self.encode_symbols(&[kind.request_code()], FrameKind::Request)
    }

    /// Pair each frequency with its absolute start offset.
    pub fn tone_program(&self, freqs: Vec<Frequency>, tone_duration: f64) -> ToneProgram {
        let events = freqs
            .into_iter()
            .enumerate()
            .map(|(i, frequency)| ToneEvent {
                frequency,
                start_offset: i as f64 * tone_duration,
            })
            .collect();
        ToneProgram {
            events,
            tone_duration,
        }
    }

    // Single pass; stepping past each inserted separator keeps runs of three
    // or more equal tones fully disambiguated.
    fn insert_separators(&self, freqs: &mut Vec<Frequency>) {
        let separator = self.alphabet.symbol_to_frequency(SEPARATOR);
        let mut i = 0;
        while i + 1 < freqs.len() {
            if freqs[i] == freqs[i + 1] {
                freqs.insert(i + 1, separator);
                i += 2;
            } else {
                i += 1;
            }
        }
    }
}
