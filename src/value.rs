use std::num::ParseFloatError;
use std::str::Utf8Error;

use thiserror::Error;
use tracing::{debug, warn};


/// Returned when a payload cannot be turned into a number.
pub const SENTINEL: f64 = 0.0;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("payload is empty")]
    Empty,
    #[error("payload {text:?} is not a number: {source}")]
    Number {
        text: String,
        source: ParseFloatError,
    },
}

/// Characteristic values are sent as plain decimal text, e.g. `b" 72.5\n"`.
pub fn try_parse(payload: &[u8]) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(payload)?.trim();
    debug!("raw payload: {text:?}");

    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    text.parse::<f64>().map_err(|source| DecodeError::Number {
        text: text.to_string(),
        source,
    })
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    /// The device answered but the payload did not decode.
    Unparseable,
    /// Every attempt failed or came back empty.
    Unavailable,
}

impl Reading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(value) => Some(*value),
            _ => None,
        }
    }

    pub fn value_or_sentinel(&self) -> f64 {
        self.value().unwrap_or(SENTINEL)
    }
}

/// Never fails: a payload that does not decode is logged and reads as the sentinel.
pub fn parse(payload: &[u8]) -> Reading {
    match try_parse(payload) {
        Ok(value) => Reading::Value(value),
        Err(err) => {
            warn!("parse error: {err}");
            Reading::Unparseable
        }
    }
}
