//! Head/tail word encoding.
//!
//! A sequence of values is laid out as a head followed by a tail. Static
//! values sit inline in the head; dynamic values (bytes, strings, arrays and
//! tuples containing them) put a byte offset in the head, measured from the
//! start of the enclosing sequence, and their body in the tail.

use bytes::Bytes;
use diamond_core::{FacetAddress, Selector};

use crate::error::AbiError;
use crate::token::{ParamType, Token, WORD};

/// Encode `tokens` as one top-level sequence (function arguments or return
/// values).
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}

/// Decode a top-level sequence of `types` from `data`.
///
/// Trailing bytes past the last referenced value are ignored.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    Decoder::new(data).sequence(types.iter(), 0)
}

fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(inline_len).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

fn inline_len(token: &Token) -> usize {
    match token {
        Token::Tuple(members) if !token.is_dynamic() => members.iter().map(inline_len).sum(),
        _ => WORD,
    }
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(a) => {
            let mut w = vec![0u8; WORD];
            w[WORD - FacetAddress::LEN..].copy_from_slice(a.as_bytes());
            w
        }
        Token::Selector(s) => {
            let mut w = vec![0u8; WORD];
            w[..Selector::LEN].copy_from_slice(s.as_bytes());
            w
        }
        Token::Uint(n) => uint_word(*n).to_vec(),
        Token::Bool(b) => uint_word(u64::from(*b)).to_vec(),
        Token::Bytes(b) => length_prefixed(b),
        Token::String(s) => length_prefixed(s.as_bytes()),
        Token::Array(items) => {
            let mut out = uint_word(items.len() as u64).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        Token::Tuple(members) => encode_sequence(members),
    }
}

fn uint_word(n: u64) -> [u8; WORD] {
    let mut w = [0u8; WORD];
    w[WORD - 8..].copy_from_slice(&n.to_be_bytes());
    w
}

fn length_prefixed(data: &[u8]) -> Vec<u8> {
    let padded = data.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&uint_word(data.len() as u64));
    out.extend_from_slice(data);
    out.resize(WORD + padded, 0);
    out
}

/// Walks untrusted input, charging every decoded word against a budget of
/// the words actually present.
///
/// Offsets may alias, so without the budget a small input can point many
/// array items at the same body and decode to far more values than it
/// holds. A canonical encoding never reads the same word twice as a value.
struct Decoder<'d> {
    data: &'d [u8],
    budget: usize,
}

impl<'d> Decoder<'d> {
    fn new(data: &'d [u8]) -> Self {
        Self {
            data,
            budget: data.len() / WORD,
        }
    }

    fn charge(&mut self, words: usize, at: usize) -> Result<(), AbiError> {
        self.budget = self
            .budget
            .checked_sub(words)
            .ok_or(AbiError::Amplified { offset: at })?;
        Ok(())
    }

    fn sequence<'t>(
        &mut self,
        types: impl Iterator<Item = &'t ParamType>,
        base: usize,
    ) -> Result<Vec<Token>, AbiError> {
        let mut cursor = base;
        let mut out = Vec::with_capacity(types.size_hint().0);

        for ty in types {
            let token = if ty.is_dynamic() {
                let offset = read_usize(self.data, cursor)?;
                let at = base
                    .checked_add(offset)
                    .ok_or(AbiError::Overflow { offset: cursor })?;
                self.value(ty, at)?
            } else {
                self.value(ty, cursor)?
            };
            cursor += ty.head_len();
            out.push(token);
        }

        Ok(out)
    }

    fn value(&mut self, ty: &ParamType, at: usize) -> Result<Token, AbiError> {
        let data = self.data;
        match ty {
            ParamType::Address => {
                let w = word(data, at)?;
                self.charge(1, at)?;
                let (pad, body) = w.split_at(WORD - FacetAddress::LEN);
                require_zero(pad, at)?;
                FacetAddress::from_slice(body)
                    .map(Token::Address)
                    .ok_or(AbiError::ShapeMismatch)
            }
            ParamType::Selector => {
                let w = word(data, at)?;
                self.charge(1, at)?;
                let (body, pad) = w.split_at(Selector::LEN);
                require_zero(pad, at)?;
                Selector::from_input(body)
                    .map(Token::Selector)
                    .ok_or(AbiError::ShapeMismatch)
            }
            ParamType::Uint(bits) => {
                let n = read_u64(data, at)?;
                self.charge(1, at)?;
                if *bits < 64 && n >> bits != 0 {
                    return Err(AbiError::Overflow { offset: at });
                }
                Ok(Token::Uint(n))
            }
            ParamType::Bool => {
                let n = read_u64(data, at)?;
                self.charge(1, at)?;
                match n {
                    0 => Ok(Token::Bool(false)),
                    1 => Ok(Token::Bool(true)),
                    _ => Err(AbiError::InvalidBool { offset: at }),
                }
            }
            ParamType::Bytes => {
                let body = length_prefixed_body(data, at)?;
                self.charge(1 + body.len().div_ceil(WORD), at)?;
                Ok(Token::Bytes(Bytes::copy_from_slice(body)))
            }
            ParamType::String => {
                let body = length_prefixed_body(data, at)?;
                self.charge(1 + body.len().div_ceil(WORD), at)?;
                let s =
                    std::str::from_utf8(body).map_err(|_| AbiError::InvalidUtf8 { offset: at })?;
                Ok(Token::String(s.to_string()))
            }
            ParamType::Array(inner) => {
                // Zero-width items would decode without reading anything.
                if inner.head_len() == 0 {
                    return Err(AbiError::ShapeMismatch);
                }
                let len = read_usize(data, at)?;
                self.charge(1, at)?;
                let start = at + WORD;
                let room = data.len().saturating_sub(start) / inner.head_len();
                if len > room {
                    return Err(AbiError::Truncated {
                        offset: start,
                        needed: len.saturating_mul(inner.head_len()),
                        len: data.len(),
                    });
                }
                // Every item costs at least one word.
                if len > self.budget {
                    return Err(AbiError::Amplified { offset: at });
                }
                self.sequence(std::iter::repeat(&**inner).take(len), start)
                    .map(Token::Array)
            }
            ParamType::Tuple(members) => self.sequence(members.iter(), at).map(Token::Tuple),
        }
    }
}

fn slice(data: &[u8], at: usize, n: usize) -> Result<&[u8], AbiError> {
    let truncated = AbiError::Truncated {
        offset: at,
        needed: n,
        len: data.len(),
    };
    let end = at.checked_add(n).ok_or_else(|| truncated.clone())?;
    data.get(at..end).ok_or(truncated)
}

fn word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    slice(data, at, WORD)
}

fn require_zero(pad: &[u8], at: usize) -> Result<(), AbiError> {
    if pad.iter().any(|b| *b != 0) {
        return Err(AbiError::DirtyPadding { offset: at });
    }
    Ok(())
}

fn read_u64(data: &[u8], at: usize) -> Result<u64, AbiError> {
    let w = word(data, at)?;
    let (high, low) = w.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow { offset: at });
    }
    let mut be = [0u8; 8];
    be.copy_from_slice(low);
    Ok(u64::from_be_bytes(be))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    usize::try_from(read_u64(data, at)?).map_err(|_| AbiError::Overflow { offset: at })
}

fn length_prefixed_body(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, at)?;
    let padded = len
        .div_ceil(WORD)
        .checked_mul(WORD)
        .ok_or(AbiError::Overflow { offset: at })?;
    let start = at + WORD;
    let (body, pad) = slice(data, start, padded)?.split_at(len);
    require_zero(pad, start + len)?;
    Ok(body)
}
