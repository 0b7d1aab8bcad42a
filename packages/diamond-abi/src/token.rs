//! Value and type descriptors for the codec.

use bytes::Bytes;
use diamond_core::{FacetAddress, Selector};

/// Size of one ABI word.
pub const WORD: usize = 32;

/// Shape of a value to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// `address`, left-padded.
    Address,
    /// `bytes4`, right-padded.
    Selector,
    /// `uintN` for `N <= 64`, left-padded.
    Uint(u32),
    Bool,
    /// `bytes`, length-prefixed and right-padded.
    Bytes,
    String,
    /// `T[]`.
    Array(Box<ParamType>),
    /// `(T1, T2, ...)`.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    pub fn array(inner: ParamType) -> Self {
        ParamType::Array(Box::new(inner))
    }

    /// Dynamic types are referenced by offset from their enclosing head.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::Tuple(members) => members.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Bytes this type occupies in its enclosing head.
    pub fn head_len(&self) -> usize {
        match self {
            ParamType::Tuple(members) if !self.is_dynamic() => {
                members.iter().map(ParamType::head_len).sum()
            }
            _ => WORD,
        }
    }
}

/// A decoded (or to-be-encoded) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(FacetAddress),
    Selector(Selector),
    Uint(u64),
    Bool(bool),
    Bytes(Bytes),
    String(String),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    pub fn is_dynamic(&self) -> bool {
        match self {
            Token::Bytes(_) | Token::String(_) | Token::Array(_) => true,
            Token::Tuple(members) => members.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    pub fn into_address(self) -> Option<FacetAddress> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_selector(self) -> Option<Selector> {
        match self {
            Token::Selector(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_uint(self) -> Option<u64> {
        match self {
            Token::Uint(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Token::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Token>> {
        match self {
            Token::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_tuple(self) -> Option<Vec<Token>> {
        match self {
            Token::Tuple(members) => Some(members),
            _ => None,
        }
    }
}
