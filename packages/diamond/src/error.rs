//! Error types for the diamond.

use std::fmt;

use bytes::Bytes;
use diamond_abi::calls;
use diamond_abi::AbiError;
use diamond_core::{FacetAddress, FacetCutAction, Selector};
use thiserror::Error;

use crate::config::ConfigError;

/// A failure signalled by facet code, carrying its raw output.
///
/// The router relays a facet's revert to the caller byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revert {
    data: Bytes,
}

impl Revert {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// A revert with no output.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A revert carrying an `Error(string)` reason.
    pub fn message(reason: &str) -> Self {
        Self {
            data: calls::encode_error_string(reason),
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// The reason string, if the output is an `Error(string)` payload.
    pub fn reason(&self) -> Option<String> {
        calls::decode_error_string(&self.data)
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "reverted: {}", reason),
            None if self.data.is_empty() => write!(f, "reverted without data"),
            None => write!(f, "reverted with {} bytes of data", self.data.len()),
        }
    }
}

impl std::error::Error for Revert {}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed batch entry or call.
    Validation,
    /// A change collides with current routing.
    Conflict,
    /// A referenced selector has no owner.
    NotFound,
    /// The post-cut initializer failed.
    Initialization,
    /// Facet code failed; its output is passed through.
    Reverted,
}

/// Errors from cuts and dispatched calls.
///
/// Every error aborts the invocation it occurred in and rolls back all state
/// written since that invocation began.
#[derive(Debug, Error)]
pub enum Error {
    #[error("diamond cut has no changes")]
    EmptyCut,

    #[error("change {index}: no selectors given")]
    EmptySelectors { index: usize },

    #[error("change {index}: {action} requires a non-zero facet address")]
    ZeroFacet {
        index: usize,
        action: FacetCutAction,
    },

    #[error("change {index}: remove must target the zero address, got {facet}")]
    NonZeroRemoveFacet { index: usize, facet: FacetAddress },

    #[error("change {index}: facet {facet} has no code")]
    NoCode { index: usize, facet: FacetAddress },

    #[error("initializer is the zero address but payload has {len} bytes")]
    PayloadWithoutInit { len: usize },

    #[error("initializer {facet} has no code")]
    InitNoCode { facet: FacetAddress },

    #[error("initializer {facet} given an empty payload")]
    InitEmptyPayload { facet: FacetAddress },

    #[error("malformed call: {0}")]
    Abi(#[from] AbiError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("change {index}: selector {selector} is already routed to {owner}")]
    AlreadyRegistered {
        index: usize,
        selector: Selector,
        owner: FacetAddress,
    },

    #[error("change {index}: selector {selector} is already routed to {facet}")]
    SameFacet {
        index: usize,
        selector: Selector,
        facet: FacetAddress,
    },

    /// `change` is the batch position for cut failures, `None` for dispatch.
    #[error("selector {selector} is not registered")]
    NotFound {
        selector: Selector,
        change: Option<usize>,
    },

    #[error("call input is {len} bytes, too short for a selector")]
    MissingSelector { len: usize },

    #[error("built-in facet {facet} does not implement {selector}")]
    Unsupported {
        facet: FacetAddress,
        selector: Selector,
    },

    #[error("initializer {facet} failed: {revert}")]
    Initialization { facet: FacetAddress, revert: Revert },

    #[error("facet {0}")]
    Reverted(Revert),

    #[error("call depth limit {0} exceeded")]
    CallDepthExceeded(usize),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCut
            | Error::EmptySelectors { .. }
            | Error::ZeroFacet { .. }
            | Error::NonZeroRemoveFacet { .. }
            | Error::NoCode { .. }
            | Error::PayloadWithoutInit { .. }
            | Error::InitNoCode { .. }
            | Error::InitEmptyPayload { .. }
            | Error::Abi(_)
            | Error::Config(_) => ErrorKind::Validation,
            Error::AlreadyRegistered { .. } | Error::SameFacet { .. } => ErrorKind::Conflict,
            Error::NotFound { .. } | Error::MissingSelector { .. } | Error::Unsupported { .. } => {
                ErrorKind::NotFound
            }
            Error::Initialization { .. } => ErrorKind::Initialization,
            Error::Reverted(_) | Error::CallDepthExceeded(_) => ErrorKind::Reverted,
        }
    }

    /// The revert to hand back across a nested-call boundary.
    ///
    /// Facet reverts (and initializer reverts carrying data) cross unchanged;
    /// everything else becomes an `Error(string)` reason.
    pub fn into_revert(self) -> Revert {
        match self {
            Error::Reverted(revert) => revert,
            Error::Initialization { revert, .. } if !revert.data().is_empty() => revert,
            other => Revert::message(&format!("Diamond: {}", other)),
        }
    }
}
