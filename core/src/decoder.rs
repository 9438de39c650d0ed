use log::{debug, warn};

use crate::aggregate::Run;
use crate::alphabet::{FrameKind, Symbol, ToneAlphabet};
use crate::config::{ToneConfig, SEPARATOR};
use crate::error::{Result, ToneCastError};
use crate::payload::{self, Payload, PayloadKind};

/// A decoded frame: which mark kind bounded it, and the data symbols that
/// survived separator and duration filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The sender asked us to transmit a payload of this kind.
    Request(PayloadKind),
    /// The sender transmitted a payload.
    Response(Payload),
}

/// Reconstructs one frame from an ordered run list.
///
/// Walks the runs with a two-state machine (outside / inside a frame). A
/// mark run opens the frame; the matching mark closes it. Inside, separator
/// runs and anything shorter than the data gate are discarded as filler or
/// noise, everything else is quantized to a data symbol.
pub struct FrameDecoder {
    alphabet: ToneAlphabet,
}

impl FrameDecoder {
    pub fn new(config: ToneConfig) -> Result<Self> {
        Ok(Self {
            alphabet: ToneAlphabet::new(config)?,
        })
    }

    /// Extract the single complete frame from a recording's runs.
    ///
    /// Runs after the closing mark are ignored as tail noise. A recording
    /// with no mark at all, or with an opening mark that never closes,
    /// carries no frame. A frame closed by the opposite mark kind is
    /// rejected outright.
    pub fn decode_frame(&self, runs: &[Run]) -> Result<Frame> {
        let config = self.alphabet.config();
        let mut inside: Option<FrameKind> = None;
        let mut symbols = Vec::new();

        for run in runs {
            match (self.alphabet.mark_kind(run.frequency, run.duration), inside) {
                (Some(kind), None) => {
                    debug!("frame opened by {:?} mark", kind);
                    inside = Some(kind);
                }
                (Some(kind), Some(open)) => {
                    if kind != open {
                        return Err(ToneCastError::MismatchedFrameMarks);
                    }
                    debug!("frame closed with {} data symbols", symbols.len());
                    return Ok(Frame { kind, symbols });
                }
                (None, Some(_)) => {
                    let symbol = self.alphabet.frequency_to_symbol(run.frequency);
                    if symbol == SEPARATOR || run.duration < config.data_min_duration {
                        continue;
                    }
                    if !self.alphabet.is_data_symbol(symbol) {
                        if config.strict_alphabet {
                            return Err(ToneCastError::OutOfAlphabetSymbol(symbol));
                        }
                        warn!(
                            "dropping out-of-alphabet symbol {} ({:.0} Hz, {:.2}s)",
                            symbol, run.frequency, run.duration
                        );
                        continue;
                    }
                    symbols.push(symbol);
                }
                (None, None) => {} // pre-frame noise
            }
        }

        Err(ToneCastError::NoFrameDetected)
    }

    /// Decode a recording into a message. `expected` names the payload kind
    /// the caller is prepared to receive in a response frame; request frames
    /// carry their own kind.
    pub fn decode_message(&self, runs: &[Run], expected: PayloadKind) -> Result<Message> {
        let frame = self.decode_frame(runs)?;
        match frame.kind {
            FrameKind::Request => {
                if frame.symbols.len() != 1 {
                    return Err(ToneCastError::UnrecognizedRequest);
                }
                PayloadKind::from_request_code(frame.symbols[0])
                    .map(Message::Request)
                    .ok_or(ToneCastError::UnrecognizedRequest)
            }
            FrameKind::Response => Ok(Message::Response(payload::decode(
                expected,
                &frame.symbols,
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQUEST_MARK;

    fn decoder() -> FrameDecoder {
        FrameDecoder::new(ToneConfig::v2()).unwrap()
    }

    fn strict_decoder() -> FrameDecoder {
        FrameDecoder::new(ToneConfig {
            strict_alphabet: true,
            ..ToneConfig::v2()
        })
        .unwrap()
    }

    // Runs for the given symbols at data-safe duration.
    fn runs(decoder: &FrameDecoder, symbols: &[Symbol]) -> Vec<Run> {
        symbols
            .iter()
            .map(|&s| Run {
                frequency: decoder.alphabet.symbol_to_frequency(s),
                duration: 0.5,
            })
            .collect()
    }

    #[test]
    fn test_response_frame() {
        let decoder = decoder();
        let frame = decoder
            .decode_frame(&runs(&decoder, &[16, 1, 2, 3, 16]))
            .unwrap();
        assert_eq!(frame.kind, FrameKind::Response);
        assert_eq!(frame.symbols, vec![1, 2, 3]);
    }

    #[test]
    fn test_request_frame() {
        let decoder = decoder();
        let message = decoder
            .decode_message(
                &runs(&decoder, &[REQUEST_MARK, 7, REQUEST_MARK]),
                PayloadKind::Color,
            )
            .unwrap();
        assert_eq!(message, Message::Request(PayloadKind::Integer));
    }

    #[test]
    fn test_no_marks_is_no_frame() {
        let decoder = decoder();
        match decoder.decode_frame(&runs(&decoder, &[1, 2, 3])) {
            Err(ToneCastError::NoFrameDetected) => {}
            other => panic!("Expected NoFrameDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_frame_is_no_frame() {
        let decoder = decoder();
        match decoder.decode_frame(&runs(&decoder, &[16, 1, 2])) {
            Err(ToneCastError::NoFrameDetected) => {}
            other => panic!("Expected NoFrameDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_marks_rejected() {
        let decoder = decoder();
        match decoder.decode_frame(&runs(&decoder, &[16, 1, REQUEST_MARK])) {
            Err(ToneCastError::MismatchedFrameMarks) => {}
            other => panic!("Expected MismatchedFrameMarks, got {:?}", other),
        }
    }

    #[test]
    fn test_separator_and_short_runs_dropped() {
        let decoder = decoder();
        let mut input = runs(&decoder, &[16, 4]);
        input.push(Run {
            frequency: decoder.alphabet.symbol_to_frequency(SEPARATOR),
            duration: 0.5,
        });
        input.push(Run {
            // below the 0.3s data gate
            frequency: decoder.alphabet.symbol_to_frequency(9),
            duration: 0.1,
        });
        input.extend(runs(&decoder, &[4, 16]));

        let frame = decoder.decode_frame(&input).unwrap();
        assert_eq!(frame.symbols, vec![4, 4]);
    }

    #[test]
    fn test_noise_before_and_after_frame_ignored() {
        let decoder = decoder();
        let mut input = runs(&decoder, &[3, 5]); // pre-frame chatter
        input.extend(runs(&decoder, &[16, 7, 16]));
        input.extend(runs(&decoder, &[2, 9])); // tail noise
        let frame = decoder.decode_frame(&input).unwrap();
        assert_eq!(frame.symbols, vec![7]);
    }

    #[test]
    fn test_out_of_alphabet_dropped_by_default() {
        let decoder = decoder();
        let mut input = runs(&decoder, &[16, 2]);
        input.push(Run {
            frequency: 5400.0, // bucket 19, above the alphabet
            duration: 0.5,
        });
        input.extend(runs(&decoder, &[16]));
        let frame = decoder.decode_frame(&input).unwrap();
        assert_eq!(frame.symbols, vec![2]);
    }

    #[test]
    fn test_out_of_alphabet_errors_in_strict_mode() {
        let decoder = strict_decoder();
        let mut input = runs(&decoder, &[16, 2]);
        input.push(Run {
            frequency: 5400.0,
            duration: 0.5,
        });
        input.extend(runs(&decoder, &[16]));
        match decoder.decode_frame(&input) {
            Err(ToneCastError::OutOfAlphabetSymbol(19)) => {}
            other => panic!("Expected OutOfAlphabetSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_symbol_request_rejected() {
        let decoder = decoder();
        match decoder.decode_message(
            &runs(&decoder, &[REQUEST_MARK, 7, 7, REQUEST_MARK]),
            PayloadKind::Color,
        ) {
            Err(ToneCastError::UnrecognizedRequest) => {}
            other => panic!("Expected UnrecognizedRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_request_code_rejected() {
        let decoder = decoder();
        match decoder.decode_message(
            &runs(&decoder, &[REQUEST_MARK, 3, REQUEST_MARK]),
            PayloadKind::Color,
        ) {
            Err(ToneCastError::UnrecognizedRequest) => {}
            other => panic!("Expected UnrecognizedRequest, got {:?}", other),
        }
    }
}
