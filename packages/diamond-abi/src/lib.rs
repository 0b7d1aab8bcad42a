//! Diamond ABI: the bit-exact encoding of the diamond call surface.
//!
//! Values are laid out in 32-byte words. Call input is a 4-byte selector
//! followed by the encoded arguments; return data is the encoded results.
//!
//! Two levels are exposed:
//! - `Token` / `ParamType` with [`encode`] and [`decode`] for arbitrary shapes
//! - typed helpers in [`calls`] for the cut, loupe and revert surfaces
//!
//! # Example
//!
//! ```rust
//! use diamond_abi::calls::{self, DiamondCutCall};
//! use diamond_core::{FacetAddress, FacetCut, Selector};
//!
//! let call = DiamondCutCall::new(
//!     vec![FacetCut::add(FacetAddress::from_low_u64(5), vec![Selector::from_u32(0xa9059cbb)])],
//!     FacetAddress::ZERO,
//!     diamond_abi::Bytes::new(),
//! );
//! let input = call.encode();
//! assert_eq!(&input[..4], calls::DIAMOND_CUT.as_bytes());
//! assert_eq!(DiamondCutCall::decode(&input).unwrap(), call);
//! ```

pub use bytes::Bytes;

pub mod calls;
mod codec;
mod error;
mod token;

pub use codec::{decode, encode};
pub use error::AbiError;
pub use token::{ParamType, Token, WORD};
