//! The root transaction value and its wire encoding.
//!
//! `TransactionData` is what gets signed and submitted for execution.
//! Its encoding is bit-exact against the external validator's schema,
//! so field order here is a protocol contract: `TransactionDataV1`
//! encodes `kind`, `sender`, `gas_data`, `expiration`, in that order.
//! Never reorder without a version bump.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bcs::{self, BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;
use crate::transaction::commands::Command;
use crate::transaction::inputs::{CallArg, ObjectRef};
use crate::types::Address;

/// Structural errors caught before a transaction leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Execution requires at least one gas payment object. Only dry-run
    /// and inspection paths may omit it.
    #[error("gas payment must not be empty for execution")]
    EmptyGasPayment,
}

/// An ordered list of typed inputs and the commands that consume them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

/// What kind of transaction this is. Only programmable transactions are
/// built client-side; system transaction kinds never pass through here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

/// Validity window of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    /// Valid indefinitely.
    None,
    /// Valid until the end of the given epoch.
    Epoch(u64),
}

/// Gas payment and pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    /// Coins paying for gas, merged at execution time.
    pub payment: Vec<ObjectRef>,
    /// Owner of the payment coins (the sponsor, when distinct from the
    /// sender).
    pub owner: Address,
    /// Gas price in base units per gas unit.
    pub price: u64,
    /// Maximum gas units this transaction may burn.
    pub budget: u64,
}

/// Version 1 of the transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: Address,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

/// The root value submitted for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    /// Assembles a V1 transaction envelope.
    pub fn new_v1(
        kind: TransactionKind,
        sender: Address,
        gas_data: GasData,
        expiration: TransactionExpiration,
    ) -> Self {
        Self::V1(TransactionDataV1 {
            kind,
            sender,
            gas_data,
            expiration,
        })
    }

    /// The sender address.
    pub fn sender(&self) -> Address {
        match self {
            Self::V1(v1) => v1.sender,
        }
    }

    /// The gas section.
    pub fn gas_data(&self) -> &GasData {
        match self {
            Self::V1(v1) => &v1.gas_data,
        }
    }

    /// Checks the invariants an executable transaction must satisfy.
    /// Dry-run paths skip this and may carry an empty gas payment.
    pub fn validate_for_execution(&self) -> Result<(), ValidationError> {
        if self.gas_data().payment.is_empty() {
            return Err(ValidationError::EmptyGasPayment);
        }
        Ok(())
    }

    /// Serializes into the canonical wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let bytes = bcs::to_bytes(self)?;
        debug!(size = bytes.len(), "transaction encoded");
        Ok(bytes)
    }

    /// Deserializes from wire bytes, enforcing exact consumption and
    /// the default hardening limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        match bcs::from_bytes(bytes) {
            Ok(tx) => {
                debug!(size = bytes.len(), "transaction decoded");
                Ok(tx)
            }
            Err(err) => {
                debug!(size = bytes.len(), %err, "transaction rejected");
                Err(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wire encoding
// ---------------------------------------------------------------------------

impl BcsEncode for ProgrammableTransaction {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.inputs.encode(w)?;
        self.commands.encode(w)
    }
}

impl BcsDecode for ProgrammableTransaction {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            inputs: Vec::decode(r)?,
            commands: Vec::decode(r)?,
        })
    }
}

impl BcsEncode for TransactionKind {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::ProgrammableTransaction(pt) => {
                w.write_uleb128(0);
                pt.encode(w)
            }
        }
    }
}

impl BcsDecode for TransactionKind {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::ProgrammableTransaction(
                ProgrammableTransaction::decode(r)?,
            )),
            other => Err(CodecError::malformed(format!(
                "unknown TransactionKind discriminant {other}"
            ))),
        }
    }
}

impl BcsEncode for TransactionExpiration {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::None => w.write_uleb128(0),
            Self::Epoch(epoch) => {
                w.write_uleb128(1);
                w.write_u64(*epoch);
            }
        }
        Ok(())
    }
}

impl BcsDecode for TransactionExpiration {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::None),
            1 => Ok(Self::Epoch(r.read_u64()?)),
            other => Err(CodecError::malformed(format!(
                "unknown TransactionExpiration discriminant {other}"
            ))),
        }
    }
}

impl BcsEncode for GasData {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.payment.encode(w)?;
        self.owner.encode(w)?;
        w.write_u64(self.price);
        w.write_u64(self.budget);
        Ok(())
    }
}

impl BcsDecode for GasData {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            payment: Vec::decode(r)?,
            owner: Address::decode(r)?,
            price: r.read_u64()?,
            budget: r.read_u64()?,
        })
    }
}

impl BcsEncode for TransactionDataV1 {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.kind.encode(w)?;
        self.sender.encode(w)?;
        self.gas_data.encode(w)?;
        self.expiration.encode(w)
    }
}

impl BcsDecode for TransactionDataV1 {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            kind: TransactionKind::decode(r)?,
            sender: Address::decode(r)?,
            gas_data: GasData::decode(r)?,
            expiration: TransactionExpiration::decode(r)?,
        })
    }
}

impl BcsEncode for TransactionData {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::V1(v1) => {
                w.write_uleb128(0);
                v1.encode(w)
            }
        }
    }
}

impl BcsDecode for TransactionData {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::V1(TransactionDataV1::decode(r)?)),
            other => Err(CodecError::malformed(format!(
                "unknown TransactionData discriminant {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
