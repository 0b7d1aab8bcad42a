//! Decoding errors.

use diamond_core::Selector;
use thiserror::Error;

/// The input is not a well-formed encoding of the expected types.
///
/// Encoding never fails; every error here comes from decoding untrusted
/// call input or return data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A read ran past the end of the input.
    #[error("input too short: need {needed} bytes at offset {offset}, have {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A length, offset or integer does not fit its declared width.
    #[error("value in word at offset {offset} is out of range")]
    Overflow { offset: usize },

    /// Bytes outside a value's declared width are not zero.
    #[error("non-zero padding in word at offset {offset}")]
    DirtyPadding { offset: usize },

    /// Offsets reuse the same words, so decoding would yield more values
    /// than the input holds.
    #[error("value at offset {offset} decodes past the size of the input")]
    Amplified { offset: usize },

    #[error("invalid bool in word at offset {offset}")]
    InvalidBool { offset: usize },

    #[error("string at offset {offset} is not valid utf-8")]
    InvalidUtf8 { offset: usize },

    #[error("invalid facet cut action {0}")]
    InvalidAction(u64),

    /// The call input is addressed to a different function.
    #[error("expected selector {expected}, found {found:?}")]
    SelectorMismatch {
        expected: Selector,
        found: Option<Selector>,
    },

    /// Decoded tokens do not have the shape the typed helper expects.
    #[error("decoded value has unexpected shape")]
    ShapeMismatch,
}
