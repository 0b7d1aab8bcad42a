//! Batch change records and loupe records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::FacetAddress;
use crate::selector::Selector;

/// What a single [`FacetCut`] does to its selectors.
///
/// The discriminants are the wire values of the cut call surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FacetCutAction {
    Add = 0,
    Replace = 1,
    Remove = 2,
}

impl FacetCutAction {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FacetCutAction::Add),
            1 => Some(FacetCutAction::Replace),
            2 => Some(FacetCutAction::Remove),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FacetCutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacetCutAction::Add => "add",
            FacetCutAction::Replace => "replace",
            FacetCutAction::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// One entry of a diamond cut batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
    /// Destination facet for Add/Replace; must be the zero address for Remove.
    pub facet_address: FacetAddress,
    pub action: FacetCutAction,
    pub function_selectors: Vec<Selector>,
}

impl FacetCut {
    pub fn add(facet: FacetAddress, selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: facet,
            action: FacetCutAction::Add,
            function_selectors: selectors,
        }
    }

    pub fn replace(facet: FacetAddress, selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: facet,
            action: FacetCutAction::Replace,
            function_selectors: selectors,
        }
    }

    /// A removal. The facet field is the zero address.
    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            facet_address: FacetAddress::ZERO,
            action: FacetCutAction::Remove,
            function_selectors: selectors,
        }
    }
}

/// A facet together with the selectors it currently owns, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub facet_address: FacetAddress,
    pub function_selectors: Vec<Selector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_values() {
        assert_eq!(FacetCutAction::Add.as_u8(), 0);
        assert_eq!(FacetCutAction::Replace.as_u8(), 1);
        assert_eq!(FacetCutAction::Remove.as_u8(), 2);
        assert_eq!(FacetCutAction::from_u8(2), Some(FacetCutAction::Remove));
        assert_eq!(FacetCutAction::from_u8(3), None);
    }

    #[test]
    fn remove_targets_zero_address() {
        let cut = FacetCut::remove(vec![Selector::from_u32(1)]);
        assert!(cut.facet_address.is_zero());
        assert_eq!(cut.action, FacetCutAction::Remove);
    }

    #[test]
    fn cut_serializes_with_hex_fields() {
        let cut = FacetCut::add(FacetAddress::from_low_u64(7), vec![Selector::from_u32(0xabcdef01)]);
        let json = serde_json::to_value(&cut).unwrap();
        assert_eq!(json["action"], "add");
        assert_eq!(json["function_selectors"][0], "0xabcdef01");
        assert_eq!(
            json["facet_address"],
            "0x0000000000000000000000000000000000000007"
        );
    }
}
