//! Facets whose code is native to the diamond.
//!
//! The cut, loupe and introspection entry points are registered like any
//! other facet, so a cut can replace or remove them. When the router lands
//! on one of their addresses the call is decoded and served here instead of
//! going to the host.

use bytes::Bytes;
use diamond_abi::calls::{self, DiamondCutCall};
use diamond_core::{FacetAddress, Selector};
use serde::{Deserialize, Serialize};

use crate::context::InPlace;
use crate::error::Error;

/// Addresses the built-in facets are registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinFacets {
    pub cut: FacetAddress,
    pub loupe: FacetAddress,
    pub introspection: FacetAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Cut,
    Loupe,
    Introspection,
}

impl BuiltinFacets {
    pub(crate) fn kind_of(&self, facet: FacetAddress) -> Option<Builtin> {
        if facet.is_zero() {
            None
        } else if facet == self.cut {
            Some(Builtin::Cut)
        } else if facet == self.loupe {
            Some(Builtin::Loupe)
        } else if facet == self.introspection {
            Some(Builtin::Introspection)
        } else {
            None
        }
    }

    /// Each built-in facet with the selectors it serves.
    pub fn selectors(&self) -> [(FacetAddress, Vec<Selector>); 3] {
        [
            (self.cut, vec![calls::DIAMOND_CUT]),
            (self.loupe, calls::LOUPE_SELECTORS.to_vec()),
            (self.introspection, vec![calls::SUPPORTS_INTERFACE]),
        ]
    }

    /// Interface ids declared when the built-ins are installed.
    pub fn interfaces() -> [[u8; 4]; 3] {
        [
            calls::ERC165_INTERFACE,
            calls::DIAMOND_CUT_INTERFACE,
            calls::DIAMOND_LOUPE_INTERFACE,
        ]
    }
}

pub(crate) fn handle(
    ctx: &mut InPlace<'_>,
    kind: Builtin,
    facet: FacetAddress,
    input: &[u8],
) -> Result<Bytes, Error> {
    let selector =
        Selector::from_input(input).ok_or(Error::MissingSelector { len: input.len() })?;
    let unsupported = Error::Unsupported { facet, selector };

    match (kind, selector) {
        (Builtin::Cut, calls::DIAMOND_CUT) => {
            let call = DiamondCutCall::decode(input)?;
            ctx.diamond_cut(&call.changes, call.init, &call.payload)?;
            Ok(Bytes::new())
        }
        (Builtin::Loupe, calls::FACETS) => {
            calls::decode_call(selector, input, &[])?;
            Ok(calls::encode_facets(&ctx.loupe().facets()))
        }
        (Builtin::Loupe, calls::FACET_ADDRESSES) => {
            calls::decode_call(selector, input, &[])?;
            Ok(calls::encode_addresses(ctx.loupe().facet_addresses()))
        }
        (Builtin::Loupe, calls::FACET_FUNCTION_SELECTORS) => {
            let facet = calls::decode_address_arg(selector, input)?;
            Ok(calls::encode_selectors(
                ctx.loupe().facet_function_selectors(facet),
            ))
        }
        (Builtin::Loupe, calls::FACET_ADDRESS) => {
            let queried = calls::decode_selector_arg(selector, input)?;
            Ok(calls::encode_address(ctx.loupe().facet_address(queried)))
        }
        (Builtin::Introspection, calls::SUPPORTS_INTERFACE) => {
            let id = calls::decode_selector_arg(selector, input)?;
            Ok(calls::encode_bool(ctx.supports_interface(*id.as_bytes())))
        }
        _ => Err(unsupported),
    }
}
