//! Diamond: an upgradeable selector-dispatch proxy.
//!
//! A [`Diamond`] owns a registry routing 4-byte selectors to facet
//! addresses. Calls are dispatched by their leading selector and run in the
//! diamond's own context through an [`Executor`]. A diamond cut adds,
//! replaces or removes routes in one atomic batch, optionally followed by an
//! initializer call.
//!
//! # Example
//!
//! ```rust
//! use diamond::{Bytes, Diamond, DiamondConfig, FacetAddress, FacetCut, MemoryHost, Selector};
//!
//! let counter = FacetAddress::from_low_u64(0x101);
//! let increment = Selector::from_u32(0xd09de08a);
//!
//! let mut host = MemoryHost::new();
//! host.deploy_fn(counter, |ctx, _input| {
//!     let n = ctx.load(b"count").map_or(0, |v| v[0]) + 1;
//!     ctx.store(&b"count"[..], vec![n]);
//!     Ok(Bytes::from(vec![n]))
//! });
//!
//! let mut diamond = Diamond::new(DiamondConfig::new(FacetAddress::from_low_u64(0xd1)), host).unwrap();
//! diamond
//!     .cut(&[FacetCut::add(counter, vec![increment])], FacetAddress::ZERO, &[])
//!     .unwrap();
//!
//! assert_eq!(&diamond.call(increment.as_bytes()).unwrap()[..], &[1]);
//! assert_eq!(diamond.loupe().facet_address(increment), counter);
//! ```

mod builtin;
mod config;
mod context;
mod cut;
mod diamond;
mod error;
mod event;
mod host;
mod journal;
mod loupe;

pub use builtin::BuiltinFacets;
pub use config::{ConfigError, ConstructorFacet, DiamondConfig};
pub use context::{Executor, InPlace, MAX_CALL_DEPTH};
pub use diamond::Diamond;
pub use error::{Error, ErrorKind, Revert};
pub use event::DiamondCutEvent;
pub use host::{FacetCode, MemoryHost};
pub use loupe::Loupe;

pub use diamond_abi::{calls, AbiError, Bytes};
pub use diamond_core::{
    Facet, FacetAddress, FacetCut, FacetCutAction, Registry, RegistryError, Selector,
};
