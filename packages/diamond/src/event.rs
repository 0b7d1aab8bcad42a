//! Audit records.

use bytes::Bytes;
use diamond_core::{FacetAddress, FacetCut};

/// Emitted once per successful diamond cut, never on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiamondCutEvent {
    pub changes: Vec<FacetCut>,
    pub init: FacetAddress,
    pub payload: Bytes,
}
