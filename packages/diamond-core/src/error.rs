//! Error types for the registry layer.
//!
//! Registry errors are precondition violations only. Deciding whether a
//! violation is a conflict, a missing selector or a malformed batch belongs
//! to the cut processor above this layer.

use thiserror::Error;

use crate::address::FacetAddress;
use crate::selector::Selector;

/// A registry operation was called with its precondition unmet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `register` on a selector that already has an owner.
    #[error("selector {selector} is already registered to {facet}")]
    AlreadyRegistered {
        selector: Selector,
        facet: FacetAddress,
    },

    /// `reassign` or `unregister` on a selector with no owner.
    #[error("selector {0} is not registered")]
    NotRegistered(Selector),

    /// `reassign` to the facet that already owns the selector.
    #[error("selector {selector} is already routed to {facet}")]
    SameFacet {
        selector: Selector,
        facet: FacetAddress,
    },

    /// The null address cannot own selectors.
    #[error("the zero address cannot own selector {0}")]
    ZeroFacet(Selector),
}

/// Failure to parse a hex selector or address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} bytes of hex, found {found}")]
    Length { expected: usize, found: usize },

    #[error("invalid hex digit '{digit}' at position {position}")]
    InvalidDigit { digit: char, position: usize },
}

/// An internal consistency check failed. Only produced by
/// [`Registry::check_invariants`](crate::Registry::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("selector {selector} maps to {facet} but is missing from its set")]
    MissingMember {
        selector: Selector,
        facet: FacetAddress,
    },

    #[error("selector {selector} is listed under {listed} but routed to {routed:?}")]
    Misrouted {
        selector: Selector,
        listed: FacetAddress,
        routed: Option<FacetAddress>,
    },

    #[error("facet {0} is listed but owns no selectors")]
    EmptyFacetListed(FacetAddress),

    #[error("facet {0} owns selectors but is not listed")]
    UnlistedFacet(FacetAddress),

    #[error("dense index out of sync at position {0}")]
    IndexDrift(usize),
}
