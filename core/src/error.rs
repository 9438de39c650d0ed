use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneCastError {
    #[error("request frame did not carry exactly one recognized request code")]
    UnrecognizedRequest,

    #[error("color response carried {actual} data symbols, expected 6")]
    MalformedColorPayload { actual: usize },

    #[error("integer response carried {actual} data symbols, expected 8")]
    MalformedIntegerPayload { actual: usize },

    #[error("no frame mark detected in recording")]
    NoFrameDetected,

    #[error("frame opened by one mark kind was closed by the other")]
    MismatchedFrameMarks,

    #[error("symbol {0} is outside the configured alphabet")]
    OutOfAlphabetSymbol(i32),

    #[error("character U+{0:04X} does not fit in a single wire byte")]
    ValueOutOfRange(u32),

    #[error("invalid tone configuration: {0}")]
    InvalidConfig(String),

    #[error("audio adapter failure: {0}")]
    Adapter(String),
}

pub type Result<T> = std::result::Result<T, ToneCastError>;
