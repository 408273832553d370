use thiserror::Error;

use crate::NodeKind;

/// Errors raised while turning a tree document back into nodes.
///
/// Runtime failures are never errors: they are [`crate::Status::Failure`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("no leaf factory registered for type `{0}`")]
    UnknownLeaf(String),

    #[error("{kind} node has no leaf type tag")]
    MissingLeafTag { kind: NodeKind },

    #[error("{kind} node accepts at most {max} children, got {got}")]
    TooManyChildren {
        kind: NodeKind,
        max: usize,
        got: usize,
    },

    #[error("missing parameter `{key}`")]
    MissingParam { key: String },

    #[error("parameter `{key}` is not a valid {expected}")]
    InvalidParam { key: String, expected: &'static str },

    #[error("parameter `{key}` is not a finite number")]
    NonFiniteParam { key: String },

    #[error("malformed tree document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
