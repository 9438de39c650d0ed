use crate::alphabet::Symbol;
use crate::error::{Result, ToneCastError};

/// Request codes carried as the single data symbol of a request frame.
pub const REQUEST_COLOR: Symbol = 0;
pub const REQUEST_INT: Symbol = 7;
pub const REQUEST_STR: Symbol = 15;

/// Wire size of a color response: two nibbles per channel.
pub const COLOR_SYMBOLS: usize = 6;
/// Wire size of an integer response: eight nibbles, 32 bits.
pub const INTEGER_SYMBOLS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Color,
    Integer,
    Text,
}

impl PayloadKind {
    pub fn request_code(self) -> Symbol {
        match self {
            PayloadKind::Color => REQUEST_COLOR,
            PayloadKind::Integer => REQUEST_INT,
            PayloadKind::Text => REQUEST_STR,
        }
    }

    pub fn from_request_code(code: Symbol) -> Option<Self> {
        match code {
            REQUEST_COLOR => Some(PayloadKind::Color),
            REQUEST_INT => Some(PayloadKind::Integer),
            REQUEST_STR => Some(PayloadKind::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Color([u8; 3]),
    Integer(i32),
    Text(String),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Color(_) => PayloadKind::Color,
            Payload::Integer(_) => PayloadKind::Integer,
            Payload::Text(_) => PayloadKind::Text,
        }
    }
}

/// Pack a payload into wire symbols, least-significant nibble first.
///
/// Text characters must fit in a single wire byte (U+0000..=U+00FF);
/// anything wider is rejected rather than truncated.
pub fn encode(payload: &Payload) -> Result<Vec<Symbol>> {
    match payload {
        Payload::Color(rgb) => {
            let mut symbols = Vec::with_capacity(COLOR_SYMBOLS);
            for &channel in rgb {
                symbols.extend_from_slice(&byte_to_nibbles(channel));
            }
            Ok(symbols)
        }
        Payload::Integer(value) => {
            let mut bits = *value as u32;
            let mut symbols = Vec::with_capacity(INTEGER_SYMBOLS);
            for _ in 0..INTEGER_SYMBOLS {
                symbols.push((bits & 0xf) as Symbol);
                bits >>= 4;
            }
            Ok(symbols)
        }
        Payload::Text(text) => {
            let mut symbols = Vec::with_capacity(text.len() * 2);
            for ch in text.chars() {
                let code = ch as u32;
                if code > 0xff {
                    return Err(ToneCastError::ValueOutOfRange(code));
                }
                symbols.extend_from_slice(&byte_to_nibbles(code as u8));
            }
            Ok(symbols)
        }
    }
}

/// Unpack wire symbols into a payload of the expected kind.
///
/// Color and integer payloads have fixed wire sizes; any other count is
/// malformed. Text accepts any count, pairing nibbles into bytes (a
/// trailing unpaired nibble is the low nibble of the final byte).
pub fn decode(kind: PayloadKind, symbols: &[Symbol]) -> Result<Payload> {
    for &symbol in symbols {
        if !(0..=0xf).contains(&symbol) {
            return Err(ToneCastError::OutOfAlphabetSymbol(symbol));
        }
    }

    match kind {
        PayloadKind::Color => {
            if symbols.len() != COLOR_SYMBOLS {
                return Err(ToneCastError::MalformedColorPayload {
                    actual: symbols.len(),
                });
            }
            let mut rgb = [0u8; 3];
            for (channel, pair) in rgb.iter_mut().zip(symbols.chunks(2)) {
                *channel = nibbles_to_value(pair) as u8;
            }
            Ok(Payload::Color(rgb))
        }
        PayloadKind::Integer => {
            if symbols.len() != INTEGER_SYMBOLS {
                return Err(ToneCastError::MalformedIntegerPayload {
                    actual: symbols.len(),
                });
            }
            Ok(Payload::Integer(nibbles_to_value(symbols) as i32))
        }
        PayloadKind::Text => {
            let text = symbols
                .chunks(2)
                .map(|pair| char::from(nibbles_to_value(pair) as u8))
                .collect();
            Ok(Payload::Text(text))
        }
    }
}

fn byte_to_nibbles(value: u8) -> [Symbol; 2] {
    [(value & 0xf) as Symbol, (value >> 4) as Symbol]
}

fn nibbles_to_value(nibbles: &[Symbol]) -> u32 {
    nibbles
        .iter()
        .rev()
        .fold(0u32, |value, &nibble| (value << 4) | nibble as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_wire_layout() {
        // [255, 0, 255] -> low nibble first per channel
        let symbols = encode(&Payload::Color([255, 0, 255])).unwrap();
        assert_eq!(symbols, vec![15, 15, 0, 0, 15, 15]);
    }

    #[test]
    fn test_color_round_trip() {
        for rgb in [[0, 0, 0], [255, 0, 255], [18, 52, 86], [1, 128, 254]] {
            let symbols = encode(&Payload::Color(rgb)).unwrap();
            assert_eq!(symbols.len(), COLOR_SYMBOLS);
            assert_eq!(
                decode(PayloadKind::Color, &symbols).unwrap(),
                Payload::Color(rgb)
            );
        }
    }

    #[test]
    fn test_color_wrong_count_rejected() {
        match decode(PayloadKind::Color, &[15, 15, 0, 0, 15]) {
            Err(ToneCastError::MalformedColorPayload { actual: 5 }) => {}
            other => panic!("Expected MalformedColorPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_wire_layout() {
        // 0x1234 -> nibbles 4, 3, 2, 1 then zero padding to 8
        let symbols = encode(&Payload::Integer(0x1234)).unwrap();
        assert_eq!(symbols, vec![4, 3, 2, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_integer_round_trip() {
        for value in [0, 1, 42, -1, -123456, i32::MAX, i32::MIN] {
            let symbols = encode(&Payload::Integer(value)).unwrap();
            assert_eq!(symbols.len(), INTEGER_SYMBOLS);
            assert_eq!(
                decode(PayloadKind::Integer, &symbols).unwrap(),
                Payload::Integer(value)
            );
        }
    }

    #[test]
    fn test_integer_wrong_count_rejected() {
        match decode(PayloadKind::Integer, &[1, 2, 3]) {
            Err(ToneCastError::MalformedIntegerPayload { actual: 3 }) => {}
            other => panic!("Expected MalformedIntegerPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_text_round_trip() {
        for text in ["", "a", "aa", "Hello!", "caf\u{e9}"] {
            let symbols = encode(&Payload::Text(text.into())).unwrap();
            assert_eq!(
                decode(PayloadKind::Text, &symbols).unwrap(),
                Payload::Text(text.into())
            );
        }
    }

    #[test]
    fn test_text_wide_char_rejected() {
        match encode(&Payload::Text("\u{1F600}".into())) {
            Err(ToneCastError::ValueOutOfRange(0x1F600)) => {}
            other => panic!("Expected ValueOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_text_trailing_nibble() {
        // 'a' = 0x61 -> [1, 6]; a lone trailing nibble decodes as that byte
        assert_eq!(
            decode(PayloadKind::Text, &[1, 6, 2]).unwrap(),
            Payload::Text("a\u{2}".into())
        );
    }

    #[test]
    fn test_decode_rejects_non_nibble_symbol() {
        match decode(PayloadKind::Text, &[1, 16]) {
            Err(ToneCastError::OutOfAlphabetSymbol(16)) => {}
            other => panic!("Expected OutOfAlphabetSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_request_codes() {
        assert_eq!(PayloadKind::Color.request_code(), 0);
        assert_eq!(PayloadKind::Integer.request_code(), 7);
        assert_eq!(PayloadKind::Text.request_code(), 15);
        assert_eq!(PayloadKind::from_request_code(7), Some(PayloadKind::Integer));
        assert_eq!(PayloadKind::from_request_code(3), None);
    }
}
