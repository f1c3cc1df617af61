//! # Error Types

use core::fmt::Display;
use std::path::Path;

use crate::regex::ErrorWrapper;

/// Errors from bytebpe operations.
#[derive(Debug, thiserror::Error)]
pub enum BpeError {
    /// A payload was defined twice in a vocabulary.
    #[error("payload {payload:?} is already defined as token {token}")]
    DuplicatePayload {
        /// The repeated payload bytes.
        payload: Vec<u8>,

        /// The token that already owns the payload.
        token: u64,
    },

    /// Decoded bytes were not valid UTF-8.
    #[error("decoded bytes are not valid utf-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// A tokenizer artifact was missing or malformed.
    #[error("failed to load {path}: {reason}")]
    Load {
        /// The artifact path.
        path: String,

        /// What was wrong with it.
        reason: String,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Parse error (integer, bridged token string, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// Regex pattern failed to compile.
    #[error("regex error: {0}")]
    Regex(#[from] ErrorWrapper),

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// Vocabulary or merge data is inconsistent.
    #[error("{0}")]
    VocabConflict(String),

    /// A pair counting worker failed; the training run is abandoned.
    #[error("pair counting worker failed: {0}")]
    WorkerFailure(String),

    /// The counting thread pool could not be built.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BpeError {
    /// Wrap a failure as a [`BpeError::Load`] for `path`.
    pub fn load<P: AsRef<Path>, R: Display>(
        path: P,
        reason: R,
    ) -> Self {
        Self::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for bytebpe operations.
pub type BpeResult<T> = core::result::Result<T, BpeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_message() {
        let err = BpeError::load("saved/vocab.json", "missing");
        assert_eq!(err.to_string(), "failed to load saved/vocab.json: missing");
    }

    #[test]
    fn test_duplicate_payload_message() {
        let err = BpeError::DuplicatePayload {
            payload: b"ab".to_vec(),
            token: 260,
        };
        assert_eq!(
            err.to_string(),
            "payload [97, 98] is already defined as token 260"
        );
    }
}
