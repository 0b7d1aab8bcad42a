//! Diamond core: the selector routing table.
//!
//! This is the bottom layer of the diamond stack. It knows nothing about
//! executing code, encoding calls or validating batches:
//! - `Selector`: 4-byte identifier of a callable entry point
//! - `FacetAddress`: 20-byte identifier of a unit of code (`ZERO` = none)
//! - `FacetCut` / `Facet`: batch change records and loupe records
//! - `Registry`: selector → facet routing with swap-and-pop membership
//!
//! # Example
//!
//! ```rust
//! use diamond_core::{FacetAddress, Registry, Selector};
//!
//! let mut registry = Registry::new();
//! let facet = FacetAddress::from_low_u64(1);
//! registry.register(Selector::from_u32(0xa9059cbb), facet).unwrap();
//! assert_eq!(registry.owner_of(Selector::from_u32(0xa9059cbb)), Some(facet));
//! ```

mod address;
mod cut;
mod dense;
mod error;
mod hex;
mod registry;
mod selector;

pub use address::FacetAddress;
pub use cut::{Facet, FacetCut, FacetCutAction};
pub use dense::DenseSet;
pub use error::{InvariantViolation, ParseError, RegistryError};
pub use registry::Registry;
pub use selector::Selector;
