use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdfError {
    #[error("Read of {requested} bytes at offset {offset} exceeds the {remaining} remaining bytes")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    #[error("Malformed number in {field}{}: {text:?}", signal_suffix(.signal))]
    MalformedNumber {
        field: &'static str,
        signal: Option<usize>,
        text: String,
    },

    #[error("Digital min equals digital max for signal {signal} ({label:?})")]
    DegenerateScale { signal: usize, label: String },

    #[error("Header truncated while reading {field}{}", signal_suffix(.signal))]
    TruncatedHeader {
        field: &'static str,
        signal: Option<usize>,
    },

    #[error("Data records truncated at record {record}, signal {signal}")]
    TruncatedRecords { record: usize, signal: usize },

    #[error("Signal index {0} out of range")]
    InvalidSignalIndex(usize),
}

fn signal_suffix(signal: &Option<usize>) -> String {
    match signal {
        Some(index) => format!(" of signal {}", index),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, EdfError>;
