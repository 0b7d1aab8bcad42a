//! 4-byte function selectors.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::hex;

/// An opaque 4-byte identifier naming a callable entry point.
///
/// Selectors compare by value and have no ordering of their own; the order in
/// which a facet's selectors are listed is the registry's swap-and-pop order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    pub const LEN: usize = 4;

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// The selector at the front of call input, if the input is long enough.
    ///
    /// ```rust
    /// use diamond_core::Selector;
    ///
    /// let input = [0x7a, 0x0e, 0xd6, 0x27, 0x00];
    /// assert_eq!(Selector::from_input(&input), Some(Selector::from_u32(0x7a0ed627)));
    /// assert_eq!(Selector::from_input(&input[..3]), None);
    /// ```
    pub fn from_input(input: &[u8]) -> Option<Self> {
        let head: [u8; 4] = input.get(..Self::LEN)?.try_into().ok()?;
        Some(Self(head))
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hex::write_prefixed(f, &self.0)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self)
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode_fixed(s).map(Self)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Parse a selector literal, panicking on malformed input.
#[macro_export]
macro_rules! selector {
    ($hex:expr) => {
        $hex.parse::<$crate::Selector>().unwrap()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_prefixed() {
        assert_eq!(Selector::from_u32(0x01FFC9A7).to_string(), "0x01ffc9a7");
    }

    #[test]
    fn parse_accepts_display_output() {
        let s = Selector::new([0xcd, 0xff, 0xac, 0xc6]);
        assert_eq!(s.to_string().parse::<Selector>().unwrap(), s);
        assert_eq!(selector!("cdffacc6"), s);
    }

    #[test]
    fn parse_rejects_address_sized_input() {
        assert!("0x0000000000000000000000000000000000000000"
            .parse::<Selector>()
            .is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let s = Selector::from_u32(0x52ef6b2c);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"0x52ef6b2c\"");
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(serde_json::from_str::<Selector>("\"0x52ef\"").is_err());
    }

    #[test]
    fn u32_conversion_is_big_endian() {
        let s = Selector::from_u32(0xadfca15e);
        assert_eq!(s.as_bytes(), &[0xad, 0xfc, 0xa1, 0x5e]);
        assert_eq!(s.to_u32(), 0xadfca15e);
    }
}
