//! Move type tags: parsing, canonical printing, and wire encoding.
//!
//! A type tag is the fully-qualified name of an on-chain type, e.g.
//! `0x2::coin::Coin<0x2::lumen::LUMEN>`. Two spellings that differ only
//! in address padding or case denote the same type, so the parser
//! normalizes and the printer emits exactly one canonical form --
//! parsing two differently-padded spellings yields equal values, and
//! printing either yields the same string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bcs::{BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;
use crate::types::address::Address;

/// Maximum generic nesting the parser will follow before failing
/// closed. A hostile string like `vector<vector<vector<...` would
/// otherwise recurse without bound.
const MAX_TYPE_NESTING: usize = 128;

/// A Move type, as used for `MoveCall` type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    /// `vector<T>`.
    Vector(Box<TypeTag>),
    /// A struct type, possibly generic.
    Struct(Box<StructTag>),
}

/// A fully-qualified struct type: defining address, module, name, and
/// generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: Address,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

/// Returns `true` if `s` is a legal Move identifier:
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl TypeTag {
    /// Parses a type-tag string. Whitespace around tokens is tolerated;
    /// the result is fully normalized.
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        let mut p = Parser::new(input);
        let tag = p.parse_type(0)?;
        p.expect_end()?;
        Ok(tag)
    }
}

impl StructTag {
    /// Parses a struct-tag string, rejecting primitive and vector types.
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        match TypeTag::parse(input)? {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(CodecError::UnsupportedTypeTag(format!(
                "'{input}' is a {other}, not a struct type"
            ))),
        }
    }
}

impl FromStr for TypeTag {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for StructTag {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::U128 => write!(f, "u128"),
            Self::U256 => write!(f, "u256"),
            Self::Address => write!(f, "address"),
            Self::Signer => write!(f, "signer"),
            Self::Vector(inner) => write!(f, "vector<{inner}>"),
            Self::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive-descent parser over the type-tag grammar:
///
/// ```text
/// type       := primitive | 'vector' '<' type '>' | struct
/// primitive  := 'bool' | 'u8' | 'u16' | 'u32' | 'u64' | 'u128' | 'u256'
///             | 'address' | 'signer'
/// struct     := address '::' ident '::' ident ('<' type (',' type)* '>')?
/// ```
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn err(&self, reason: impl fmt::Display) -> CodecError {
        CodecError::UnsupportedTypeTag(format!(
            "'{}': {} (at offset {})",
            self.input, reason, self.pos
        ))
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> Result<(), CodecError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.err(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.err(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Consumes a run of characters satisfying `pred`. Empty runs error.
    fn take_while(
        &mut self,
        what: &str,
        pred: impl Fn(char) -> bool,
    ) -> Result<&'a str, CodecError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            return Err(self.err(format!("expected {what}")));
        }
        Ok(&self.input[start..self.pos])
    }

    fn identifier(&mut self, what: &str) -> Result<&'a str, CodecError> {
        let ident = self.take_while(what, |c| c.is_ascii_alphanumeric() || c == '_')?;
        if !is_valid_identifier(ident) {
            return Err(self.err(format!("'{ident}' is not a valid {what}")));
        }
        Ok(ident)
    }

    fn expect_end(&mut self) -> Result<(), CodecError> {
        self.skip_ws();
        if self.pos != self.input.len() {
            return Err(self.err("trailing characters after type"));
        }
        Ok(())
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeTag, CodecError> {
        if depth >= MAX_TYPE_NESTING {
            return Err(self.err("generic nesting too deep"));
        }
        self.skip_ws();

        // An address token starts with a digit (`0x2`, `2`, `dead` does
        // not occur: on-chain addresses in tag strings are always
        // numeric-prefixed hex). Everything else starts with an
        // identifier.
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.parse_struct(depth),
            Some(_) => {
                let word = self.identifier("type name")?;
                match word {
                    "bool" => Ok(TypeTag::Bool),
                    "u8" => Ok(TypeTag::U8),
                    "u16" => Ok(TypeTag::U16),
                    "u32" => Ok(TypeTag::U32),
                    "u64" => Ok(TypeTag::U64),
                    "u128" => Ok(TypeTag::U128),
                    "u256" => Ok(TypeTag::U256),
                    "address" => Ok(TypeTag::Address),
                    "signer" => Ok(TypeTag::Signer),
                    "vector" => {
                        self.eat('<')?;
                        let inner = self.parse_type(depth + 1)?;
                        self.eat('>')?;
                        Ok(TypeTag::Vector(Box::new(inner)))
                    }
                    other => Err(self.err(format!("unknown type '{other}'"))),
                }
            }
            None => Err(self.err("expected a type, found end of input")),
        }
    }

    fn parse_struct(&mut self, depth: usize) -> Result<TypeTag, CodecError> {
        let addr_token = self.take_while("address", |c| c.is_ascii_alphanumeric())?;
        let address = Address::from_hex(addr_token)
            .map_err(|e| self.err(format!("bad address '{addr_token}': {e}")))?;

        self.eat(':')?;
        self.eat(':')?;
        let module = self.identifier("module name")?.to_string();
        self.eat(':')?;
        self.eat(':')?;
        let name = self.identifier("struct name")?.to_string();

        let mut type_params = Vec::new();
        self.skip_ws();
        if self.peek() == Some('<') {
            self.eat('<')?;
            loop {
                type_params.push(self.parse_type(depth + 1)?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => self.eat(',')?,
                    Some('>') => {
                        self.eat('>')?;
                        break;
                    }
                    Some(c) => {
                        return Err(self.err(format!("expected ',' or '>', found '{c}'")))
                    }
                    None => return Err(self.err("unbalanced '<' in generic parameters")),
                }
            }
        }

        Ok(TypeTag::Struct(Box::new(StructTag {
            address,
            module,
            name,
            type_params,
        })))
    }
}

// ---------------------------------------------------------------------------
// Wire encoding
// ---------------------------------------------------------------------------

// Tag values are part of the external wire contract. Never reorder.
const TAG_BOOL: u32 = 0;
const TAG_U8: u32 = 1;
const TAG_U64: u32 = 2;
const TAG_U128: u32 = 3;
const TAG_ADDRESS: u32 = 4;
const TAG_SIGNER: u32 = 5;
const TAG_VECTOR: u32 = 6;
const TAG_STRUCT: u32 = 7;
const TAG_U16: u32 = 8;
const TAG_U32: u32 = 9;
const TAG_U256: u32 = 10;

impl BcsEncode for TypeTag {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::Bool => w.write_uleb128(TAG_BOOL),
            Self::U8 => w.write_uleb128(TAG_U8),
            Self::U64 => w.write_uleb128(TAG_U64),
            Self::U128 => w.write_uleb128(TAG_U128),
            Self::Address => w.write_uleb128(TAG_ADDRESS),
            Self::Signer => w.write_uleb128(TAG_SIGNER),
            Self::Vector(inner) => {
                w.write_uleb128(TAG_VECTOR);
                inner.encode(w)?;
            }
            Self::Struct(tag) => {
                w.write_uleb128(TAG_STRUCT);
                tag.encode(w)?;
            }
            Self::U16 => w.write_uleb128(TAG_U16),
            Self::U32 => w.write_uleb128(TAG_U32),
            Self::U256 => w.write_uleb128(TAG_U256),
        }
        Ok(())
    }
}

impl BcsDecode for TypeTag {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_uleb128()?;
        match tag {
            TAG_BOOL => Ok(Self::Bool),
            TAG_U8 => Ok(Self::U8),
            TAG_U64 => Ok(Self::U64),
            TAG_U128 => Ok(Self::U128),
            TAG_ADDRESS => Ok(Self::Address),
            TAG_SIGNER => Ok(Self::Signer),
            TAG_VECTOR => {
                r.descend()?;
                let inner = Self::decode(r)?;
                r.ascend();
                Ok(Self::Vector(Box::new(inner)))
            }
            TAG_STRUCT => {
                r.descend()?;
                let tag = StructTag::decode(r)?;
                r.ascend();
                Ok(Self::Struct(Box::new(tag)))
            }
            TAG_U16 => Ok(Self::U16),
            TAG_U32 => Ok(Self::U32),
            TAG_U256 => Ok(Self::U256),
            other => Err(CodecError::malformed(format!(
                "unknown TypeTag discriminant {other}"
            ))),
        }
    }
}

impl BcsEncode for StructTag {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.address.encode(w)?;
        w.write_string(&self.module)?;
        w.write_string(&self.name)?;
        self.type_params.encode(w)
    }
}

impl BcsDecode for StructTag {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let address = Address::decode(r)?;
        let module = decode_identifier(r, "module name")?;
        let name = decode_identifier(r, "struct name")?;
        let type_params = Vec::<TypeTag>::decode(r)?;
        Ok(Self {
            address,
            module,
            name,
            type_params,
        })
    }
}

/// Reads a string field that must be a legal Move identifier. An
/// on-wire module or function name that is not one is malformed input,
/// not a valid value in an odd spelling.
pub(crate) fn decode_identifier(
    r: &mut Reader<'_>,
    what: &str,
) -> Result<String, CodecError> {
    let s = r.read_string()?;
    if !is_valid_identifier(&s) {
        return Err(CodecError::malformed(format!(
            "{what} '{s}' is not a valid identifier"
        )));
    }
    Ok(s)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
