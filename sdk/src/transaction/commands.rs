//! Commands: the steps of a programmable transaction.
//!
//! A command references inputs and the results of earlier commands
//! through [`Argument`]. The codec preserves those indices exactly and
//! validates nothing about them -- whether `Input(3)` actually exists
//! is the builder's problem, not the wire format's.

use serde::{Deserialize, Serialize};

use crate::bcs::{BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;
use crate::types::type_tag::decode_identifier;
use crate::types::{Address, TypeTag};

/// A reference to a value available to a command: the gas coin, a
/// declared input, or an earlier command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin of the transaction.
    GasCoin,
    /// The input at the given index.
    Input(u16),
    /// The (single) result of the command at the given index.
    Result(u16),
    /// One element of a multi-result command: `(command, sub-index)`.
    NestedResult(u16, u16),
}

impl Argument {
    /// Selects one element out of a multi-result command's output.
    /// Anything other than a [`Argument::Result`] is returned unchanged.
    pub fn nested(self, index: u16) -> Argument {
        match self {
            Argument::Result(command) => Argument::NestedResult(command, index),
            other => other,
        }
    }
}

/// A call into a Move function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    /// Package the module lives in.
    pub package: Address,
    /// Module name.
    pub module: String,
    /// Function name.
    pub function: String,
    /// Generic type instantiations.
    pub type_arguments: Vec<TypeTag>,
    /// Positional arguments.
    pub arguments: Vec<Argument>,
}

/// One step of a programmable transaction.
///
/// Variant order is the wire contract; appending new variants at the
/// end is the only compatible evolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Call a Move function.
    MoveCall(Box<ProgrammableMoveCall>),
    /// Transfer objects to an address; both sides are arguments.
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
    /// Split amounts off a coin, producing one new coin per amount.
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    /// Merge source coins into a destination coin.
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    /// Publish compiled modules with their transitive dependencies.
    Publish {
        modules: Vec<Vec<u8>>,
        dependencies: Vec<Address>,
    },
    /// Build a `vector<T>` from elements; the type may be inferred.
    MakeMoveVec {
        type_: Option<TypeTag>,
        elements: Vec<Argument>,
    },
    /// Upgrade a published package using an upgrade-capability ticket.
    Upgrade {
        modules: Vec<Vec<u8>>,
        dependencies: Vec<Address>,
        package: Address,
        ticket: Argument,
    },
}

// ---------------------------------------------------------------------------
// Wire encoding
// ---------------------------------------------------------------------------

impl BcsEncode for Argument {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::GasCoin => w.write_uleb128(0),
            Self::Input(i) => {
                w.write_uleb128(1);
                w.write_u16(*i);
            }
            Self::Result(i) => {
                w.write_uleb128(2);
                w.write_u16(*i);
            }
            Self::NestedResult(i, j) => {
                w.write_uleb128(3);
                w.write_u16(*i);
                w.write_u16(*j);
            }
        }
        Ok(())
    }
}

impl BcsDecode for Argument {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::GasCoin),
            1 => Ok(Self::Input(r.read_u16()?)),
            2 => Ok(Self::Result(r.read_u16()?)),
            3 => Ok(Self::NestedResult(r.read_u16()?, r.read_u16()?)),
            other => Err(CodecError::malformed(format!(
                "unknown Argument discriminant {other}"
            ))),
        }
    }
}

impl BcsEncode for ProgrammableMoveCall {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.package.encode(w)?;
        w.write_string(&self.module)?;
        w.write_string(&self.function)?;
        self.type_arguments.encode(w)?;
        self.arguments.encode(w)
    }
}

impl BcsDecode for ProgrammableMoveCall {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            package: Address::decode(r)?,
            module: decode_identifier(r, "module name")?,
            function: decode_identifier(r, "function name")?,
            type_arguments: Vec::decode(r)?,
            arguments: Vec::decode(r)?,
        })
    }
}

impl BcsEncode for Command {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::MoveCall(call) => {
                w.write_uleb128(0);
                call.encode(w)
            }
            Self::TransferObjects { objects, address } => {
                w.write_uleb128(1);
                objects.encode(w)?;
                address.encode(w)
            }
            Self::SplitCoins { coin, amounts } => {
                w.write_uleb128(2);
                coin.encode(w)?;
                amounts.encode(w)
            }
            Self::MergeCoins {
                destination,
                sources,
            } => {
                w.write_uleb128(3);
                destination.encode(w)?;
                sources.encode(w)
            }
            Self::Publish {
                modules,
                dependencies,
            } => {
                w.write_uleb128(4);
                w.write_len(modules.len())?;
                for module in modules {
                    w.write_vec_bytes(module)?;
                }
                dependencies.encode(w)
            }
            Self::MakeMoveVec { type_, elements } => {
                w.write_uleb128(5);
                type_.encode(w)?;
                elements.encode(w)
            }
            Self::Upgrade {
                modules,
                dependencies,
                package,
                ticket,
            } => {
                w.write_uleb128(6);
                w.write_len(modules.len())?;
                for module in modules {
                    w.write_vec_bytes(module)?;
                }
                dependencies.encode(w)?;
                package.encode(w)?;
                ticket.encode(w)
            }
        }
    }
}

impl BcsDecode for Command {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::MoveCall(Box::new(ProgrammableMoveCall::decode(r)?))),
            1 => Ok(Self::TransferObjects {
                objects: Vec::decode(r)?,
                address: Argument::decode(r)?,
            }),
            2 => Ok(Self::SplitCoins {
                coin: Argument::decode(r)?,
                amounts: Vec::decode(r)?,
            }),
            3 => Ok(Self::MergeCoins {
                destination: Argument::decode(r)?,
                sources: Vec::decode(r)?,
            }),
            4 => Ok(Self::Publish {
                modules: decode_module_list(r)?,
                dependencies: Vec::decode(r)?,
            }),
            5 => Ok(Self::MakeMoveVec {
                type_: Option::decode(r)?,
                elements: Vec::decode(r)?,
            }),
            6 => Ok(Self::Upgrade {
                modules: decode_module_list(r)?,
                dependencies: Vec::decode(r)?,
                package: Address::decode(r)?,
                ticket: Argument::decode(r)?,
            }),
            other => Err(CodecError::malformed(format!(
                "unknown Command discriminant {other}"
            ))),
        }
    }
}

fn decode_module_list(r: &mut Reader<'_>) -> Result<Vec<Vec<u8>>, CodecError> {
    let len = r.read_len()?;
    r.descend()?;
    let mut modules = Vec::with_capacity(len);
    for _ in 0..len {
        modules.push(r.read_vec_bytes()?);
    }
    r.ascend();
    Ok(modules)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
