//! Typed encoders and decoders for the diamond call surface.
//!
//! | function | selector |
//! |---|---|
//! | `diamondCut((address,uint8,bytes4[])[],address,bytes)` | `0x1f931c1c` |
//! | `facets()` | `0x7a0ed627` |
//! | `facetFunctionSelectors(address)` | `0xadfca15e` |
//! | `facetAddresses()` | `0x52ef6b2c` |
//! | `facetAddress(bytes4)` | `0xcdffacc6` |
//! | `supportsInterface(bytes4)` | `0x01ffc9a7` |
//! | `Error(string)` (revert reason) | `0x08c379a0` |

use bytes::Bytes;
use diamond_core::{Facet, FacetAddress, FacetCut, FacetCutAction, Selector};

use crate::codec::{decode, encode};
use crate::error::AbiError;
use crate::token::{ParamType, Token};

pub const DIAMOND_CUT: Selector = Selector::from_u32(0x1f93_1c1c);
pub const FACETS: Selector = Selector::from_u32(0x7a0e_d627);
pub const FACET_FUNCTION_SELECTORS: Selector = Selector::from_u32(0xadfc_a15e);
pub const FACET_ADDRESSES: Selector = Selector::from_u32(0x52ef_6b2c);
pub const FACET_ADDRESS: Selector = Selector::from_u32(0xcdff_acc6);
pub const SUPPORTS_INTERFACE: Selector = Selector::from_u32(0x01ff_c9a7);
pub const ERROR_STRING: Selector = Selector::from_u32(0x08c3_79a0);

/// Every loupe selector, in declaration order.
pub const LOUPE_SELECTORS: [Selector; 4] =
    [FACETS, FACET_FUNCTION_SELECTORS, FACET_ADDRESSES, FACET_ADDRESS];

/// ERC-165 interface id: the XOR of an interface's selectors.
pub const fn interface_id(selectors: &[Selector]) -> [u8; 4] {
    let mut acc = 0u32;
    let mut i = 0;
    while i < selectors.len() {
        acc ^= selectors[i].to_u32();
        i += 1;
    }
    acc.to_be_bytes()
}

pub const ERC165_INTERFACE: [u8; 4] = interface_id(&[SUPPORTS_INTERFACE]);
pub const DIAMOND_CUT_INTERFACE: [u8; 4] = interface_id(&[DIAMOND_CUT]);
pub const DIAMOND_LOUPE_INTERFACE: [u8; 4] = interface_id(&LOUPE_SELECTORS);

/// Prefix `args` with `selector`.
pub fn encode_call(selector: Selector, args: &[Token]) -> Bytes {
    let mut out = selector.as_bytes().to_vec();
    out.extend(encode(args));
    Bytes::from(out)
}

/// Check `input` is addressed to `selector` and decode its arguments.
pub fn decode_call(selector: Selector, input: &[u8], types: &[ParamType]) -> Result<Vec<Token>, AbiError> {
    let found = Selector::from_input(input);
    if found != Some(selector) {
        return Err(AbiError::SelectorMismatch {
            expected: selector,
            found,
        });
    }
    decode(types, &input[Selector::LEN..])
}

fn cut_tuple_type() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Address,
        ParamType::Uint(8),
        ParamType::array(ParamType::Selector),
    ])
}

fn facet_tuple_type() -> ParamType {
    ParamType::Tuple(vec![ParamType::Address, ParamType::array(ParamType::Selector)])
}

fn selectors_token(selectors: &[Selector]) -> Token {
    Token::Array(selectors.iter().copied().map(Token::Selector).collect())
}

fn selectors_from(token: Token) -> Result<Vec<Selector>, AbiError> {
    token
        .into_array()
        .ok_or(AbiError::ShapeMismatch)?
        .into_iter()
        .map(|t| t.into_selector().ok_or(AbiError::ShapeMismatch))
        .collect()
}

fn single(mut tokens: Vec<Token>) -> Result<Token, AbiError> {
    match tokens.len() {
        1 => tokens.pop().ok_or(AbiError::ShapeMismatch),
        _ => Err(AbiError::ShapeMismatch),
    }
}

/// Arguments of `diamondCut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiamondCutCall {
    pub changes: Vec<FacetCut>,
    pub init: FacetAddress,
    pub payload: Bytes,
}

impl DiamondCutCall {
    pub fn new(changes: Vec<FacetCut>, init: FacetAddress, payload: impl Into<Bytes>) -> Self {
        Self {
            changes,
            init,
            payload: payload.into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let changes = self
            .changes
            .iter()
            .map(|c| {
                Token::Tuple(vec![
                    Token::Address(c.facet_address),
                    Token::Uint(u64::from(c.action.as_u8())),
                    selectors_token(&c.function_selectors),
                ])
            })
            .collect();
        encode_call(
            DIAMOND_CUT,
            &[
                Token::Array(changes),
                Token::Address(self.init),
                Token::Bytes(self.payload.clone()),
            ],
        )
    }

    pub fn decode(input: &[u8]) -> Result<Self, AbiError> {
        let types = [
            ParamType::array(cut_tuple_type()),
            ParamType::Address,
            ParamType::Bytes,
        ];
        let mut args = decode_call(DIAMOND_CUT, input, &types)?.into_iter();
        let (Some(changes), Some(init), Some(payload)) = (args.next(), args.next(), args.next())
        else {
            return Err(AbiError::ShapeMismatch);
        };

        let changes = changes
            .into_array()
            .ok_or(AbiError::ShapeMismatch)?
            .into_iter()
            .map(decode_cut)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            changes,
            init: init.into_address().ok_or(AbiError::ShapeMismatch)?,
            payload: payload.into_bytes().ok_or(AbiError::ShapeMismatch)?,
        })
    }
}

fn decode_cut(token: Token) -> Result<FacetCut, AbiError> {
    let mut fields = token.into_tuple().ok_or(AbiError::ShapeMismatch)?.into_iter();
    let (Some(facet), Some(action), Some(selectors)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(AbiError::ShapeMismatch);
    };
    let raw = action.into_uint().ok_or(AbiError::ShapeMismatch)?;
    let action = u8::try_from(raw)
        .ok()
        .and_then(FacetCutAction::from_u8)
        .ok_or(AbiError::InvalidAction(raw))?;
    Ok(FacetCut {
        facet_address: facet.into_address().ok_or(AbiError::ShapeMismatch)?,
        action,
        function_selectors: selectors_from(selectors)?,
    })
}

pub fn facets_call() -> Bytes {
    encode_call(FACETS, &[])
}

pub fn facet_addresses_call() -> Bytes {
    encode_call(FACET_ADDRESSES, &[])
}

pub fn facet_function_selectors_call(facet: FacetAddress) -> Bytes {
    encode_call(FACET_FUNCTION_SELECTORS, &[Token::Address(facet)])
}

pub fn facet_address_call(selector: Selector) -> Bytes {
    encode_call(FACET_ADDRESS, &[Token::Selector(selector)])
}

pub fn supports_interface_call(interface: [u8; 4]) -> Bytes {
    encode_call(SUPPORTS_INTERFACE, &[Token::Selector(Selector::new(interface))])
}

/// The single `address` argument of a call to `selector`.
pub fn decode_address_arg(selector: Selector, input: &[u8]) -> Result<FacetAddress, AbiError> {
    single(decode_call(selector, input, &[ParamType::Address])?)?
        .into_address()
        .ok_or(AbiError::ShapeMismatch)
}

/// The single `bytes4` argument of a call to `selector`.
pub fn decode_selector_arg(selector: Selector, input: &[u8]) -> Result<Selector, AbiError> {
    single(decode_call(selector, input, &[ParamType::Selector])?)?
        .into_selector()
        .ok_or(AbiError::ShapeMismatch)
}

pub fn encode_facets(facets: &[Facet]) -> Bytes {
    let items = facets
        .iter()
        .map(|f| {
            Token::Tuple(vec![
                Token::Address(f.facet_address),
                selectors_token(&f.function_selectors),
            ])
        })
        .collect();
    Bytes::from(encode(&[Token::Array(items)]))
}

pub fn decode_facets(data: &[u8]) -> Result<Vec<Facet>, AbiError> {
    single(decode(&[ParamType::array(facet_tuple_type())], data)?)?
        .into_array()
        .ok_or(AbiError::ShapeMismatch)?
        .into_iter()
        .map(|t| {
            let mut fields = t.into_tuple().ok_or(AbiError::ShapeMismatch)?.into_iter();
            let (Some(facet), Some(selectors)) = (fields.next(), fields.next()) else {
                return Err(AbiError::ShapeMismatch);
            };
            Ok(Facet {
                facet_address: facet.into_address().ok_or(AbiError::ShapeMismatch)?,
                function_selectors: selectors_from(selectors)?,
            })
        })
        .collect()
}

pub fn encode_addresses(addresses: &[FacetAddress]) -> Bytes {
    let items = addresses.iter().copied().map(Token::Address).collect();
    Bytes::from(encode(&[Token::Array(items)]))
}

pub fn decode_addresses(data: &[u8]) -> Result<Vec<FacetAddress>, AbiError> {
    single(decode(&[ParamType::array(ParamType::Address)], data)?)?
        .into_array()
        .ok_or(AbiError::ShapeMismatch)?
        .into_iter()
        .map(|t| t.into_address().ok_or(AbiError::ShapeMismatch))
        .collect()
}

pub fn encode_selectors(selectors: &[Selector]) -> Bytes {
    Bytes::from(encode(&[selectors_token(selectors)]))
}

pub fn decode_selectors(data: &[u8]) -> Result<Vec<Selector>, AbiError> {
    selectors_from(single(decode(&[ParamType::array(ParamType::Selector)], data)?)?)
}

pub fn encode_address(address: FacetAddress) -> Bytes {
    Bytes::from(encode(&[Token::Address(address)]))
}

pub fn decode_address(data: &[u8]) -> Result<FacetAddress, AbiError> {
    single(decode(&[ParamType::Address], data)?)?
        .into_address()
        .ok_or(AbiError::ShapeMismatch)
}

pub fn encode_bool(value: bool) -> Bytes {
    Bytes::from(encode(&[Token::Bool(value)]))
}

pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    single(decode(&[ParamType::Bool], data)?)?
        .into_bool()
        .ok_or(AbiError::ShapeMismatch)
}

/// `Error(string)` revert payload.
pub fn encode_error_string(message: &str) -> Bytes {
    encode_call(ERROR_STRING, &[Token::String(message.to_string())])
}

/// The message of an `Error(string)` revert payload, if `data` is one.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    single(decode_call(ERROR_STRING, data, &[ParamType::String]).ok()?)
        .ok()?
        .into_string()
}
