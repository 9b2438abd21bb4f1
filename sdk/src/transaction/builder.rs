//! Programmable transaction construction via the builder pattern.
//!
//! The builder owns the in-progress `inputs`/`commands` lists and hands
//! out [`Argument`] handles for everything it appends. It is strictly
//! append-only: nothing it exposes can remove or reorder what an
//! earlier caller added, which is what lets independently-authored
//! policy resolvers compose on one shared builder.
//!
//! The builder checks what the codec cannot: index space (`u16` on the
//! wire), identifier validity before a `MoveCall` is formed, and the
//! width of raw pure scalars. Whether an `Input(i)` is *used* sensibly
//! is the Move runtime's job, not ours.

use thiserror::Error;

use crate::bcs::{self, BcsEncode};
use crate::error::CodecError;
use crate::transaction::commands::{Argument, Command, ProgrammableMoveCall};
use crate::transaction::data::{
    GasData, ProgrammableTransaction, TransactionData, TransactionExpiration, TransactionKind,
};
use crate::transaction::inputs::{CallArg, ObjectArg, ObjectRef};
use crate::types::{is_valid_identifier, Address, TypeTag};

/// Errors raised while assembling a transaction, before any encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A raw pure value was asserted to be a fixed-width scalar but has
    /// the wrong byte length. Rejected here rather than silently
    /// truncated or padded at encode time.
    #[error("pure {kind} value must be {expected} bytes, got {actual}")]
    PureWidthMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A module or function name is not a legal Move identifier.
    #[error("'{0}' is not a valid Move identifier")]
    InvalidIdentifier(String),

    /// The input list outgrew the `u16` index space of the wire format.
    #[error("transaction has too many inputs (limit {})", u16::MAX)]
    TooManyInputs,

    /// The command list outgrew the `u16` index space.
    #[error("transaction has too many commands (limit {})", u16::MAX)]
    TooManyCommands,

    /// Encoding a typed pure value failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Fixed-width scalar kinds a raw pure value can assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PureKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
}

impl PureKind {
    /// Encoded width of the scalar in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::Bool | Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
            Self::U128 => 16,
            Self::U256 | Self::Address => 32,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
            Self::Address => "address",
        }
    }
}

/// Append-only builder for a [`ProgrammableTransaction`].
#[derive(Debug, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs declared so far.
    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    /// Commands appended so far.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The gas coin argument.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    // -- inputs ------------------------------------------------------------

    /// Declares a pure input from pre-encoded BCS bytes. The bytes are
    /// opaque at this layer beyond length-prefixing.
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Result<Argument, BuildError> {
        self.push_input(CallArg::Pure(bytes))
    }

    /// Declares a pure input by encoding a value.
    pub fn pure<T: BcsEncode>(&mut self, value: &T) -> Result<Argument, BuildError> {
        let bytes = bcs::to_bytes(value)?;
        self.push_input(CallArg::Pure(bytes))
    }

    /// Declares a pure input from raw bytes asserted to be a fixed-width
    /// scalar, rejecting a width mismatch before any encoding happens.
    pub fn pure_scalar(&mut self, kind: PureKind, bytes: Vec<u8>) -> Result<Argument, BuildError> {
        if bytes.len() != kind.width() {
            return Err(BuildError::PureWidthMismatch {
                kind: kind.name(),
                expected: kind.width(),
                actual: bytes.len(),
            });
        }
        self.push_input(CallArg::Pure(bytes))
    }

    /// Declares an owned/immutable object input.
    pub fn object(&mut self, obj_ref: ObjectRef) -> Result<Argument, BuildError> {
        self.obj(ObjectArg::ImmOrOwnedObject(obj_ref))
    }

    /// Declares a shared object input.
    pub fn shared_object(
        &mut self,
        object_id: Address,
        initial_shared_version: u64,
        mutable: bool,
    ) -> Result<Argument, BuildError> {
        self.obj(ObjectArg::SharedObject {
            object_id,
            initial_shared_version,
            mutable,
        })
    }

    /// Declares a receiving object input.
    pub fn receiving(&mut self, obj_ref: ObjectRef) -> Result<Argument, BuildError> {
        self.obj(ObjectArg::Receiving(obj_ref))
    }

    /// Declares an object input, reusing an existing declaration of the
    /// same object where possible. Two shared declarations of one
    /// object merge into a single input that is mutable if either was.
    pub fn obj(&mut self, arg: ObjectArg) -> Result<Argument, BuildError> {
        let id = arg.object_id();
        for (index, existing) in self.inputs.iter_mut().enumerate() {
            let CallArg::Object(existing_arg) = existing else {
                continue;
            };
            if existing_arg.object_id() != id {
                continue;
            }
            match (&mut *existing_arg, &arg) {
                (
                    ObjectArg::SharedObject { mutable, .. },
                    ObjectArg::SharedObject {
                        mutable: new_mutable,
                        ..
                    },
                ) => {
                    *mutable = *mutable || *new_mutable;
                    return Ok(Argument::Input(index as u16));
                }
                (existing_arg, arg) if *existing_arg == *arg => {
                    return Ok(Argument::Input(index as u16));
                }
                // Same object declared with a different flavor: declare
                // a second input rather than guess which one wins.
                _ => {}
            }
        }
        self.push_input(CallArg::Object(arg))
    }

    fn push_input(&mut self, input: CallArg) -> Result<Argument, BuildError> {
        if self.inputs.len() >= u16::MAX as usize {
            return Err(BuildError::TooManyInputs);
        }
        let index = self.inputs.len() as u16;
        self.inputs.push(input);
        Ok(Argument::Input(index))
    }

    // -- commands ----------------------------------------------------------

    /// Appends a command, returning the argument that refers to its
    /// result.
    pub fn command(&mut self, command: Command) -> Result<Argument, BuildError> {
        if self.commands.len() >= u16::MAX as usize {
            return Err(BuildError::TooManyCommands);
        }
        let index = self.commands.len() as u16;
        self.commands.push(command);
        Ok(Argument::Result(index))
    }

    /// Appends a `MoveCall` command.
    pub fn move_call(
        &mut self,
        package: Address,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Result<Argument, BuildError> {
        if !is_valid_identifier(module) {
            return Err(BuildError::InvalidIdentifier(module.to_string()));
        }
        if !is_valid_identifier(function) {
            return Err(BuildError::InvalidIdentifier(function.to_string()));
        }
        self.command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments,
            arguments,
        })))
    }

    /// Appends a `SplitCoins` command. The result's nested results are
    /// the new coins, one per amount.
    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: Vec<Argument>,
    ) -> Result<Argument, BuildError> {
        self.command(Command::SplitCoins { coin, amounts })
    }

    /// Appends a `MergeCoins` command.
    pub fn merge_coins(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> Result<Argument, BuildError> {
        self.command(Command::MergeCoins {
            destination,
            sources,
        })
    }

    /// Appends a `TransferObjects` command.
    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        address: Argument,
    ) -> Result<Argument, BuildError> {
        self.command(Command::TransferObjects { objects, address })
    }

    /// Appends a `MakeMoveVec` command.
    pub fn make_move_vec(
        &mut self,
        type_: Option<TypeTag>,
        elements: Vec<Argument>,
    ) -> Result<Argument, BuildError> {
        self.command(Command::MakeMoveVec { type_, elements })
    }

    /// Appends a `Publish` command.
    pub fn publish(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<Address>,
    ) -> Result<Argument, BuildError> {
        self.command(Command::Publish {
            modules,
            dependencies,
        })
    }

    /// Appends an `Upgrade` command.
    pub fn upgrade(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<Address>,
        package: Address,
        ticket: Argument,
    ) -> Result<Argument, BuildError> {
        self.command(Command::Upgrade {
            modules,
            dependencies,
            package,
            ticket,
        })
    }

    // -- completion --------------------------------------------------------

    /// Consumes the builder into the programmable transaction value.
    pub fn finish(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        }
    }

    /// Consumes the builder into a full V1 transaction envelope.
    pub fn build(
        self,
        sender: Address,
        gas_data: GasData,
        expiration: TransactionExpiration,
    ) -> TransactionData {
        TransactionData::new_v1(
            TransactionKind::ProgrammableTransaction(self.finish()),
            sender,
            gas_data,
            expiration,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Digest;

    fn obj_ref(seed: u8) -> ObjectRef {
        ObjectRef {
            object_id: Address::new([seed; 32]),
            version: 7,
            digest: Digest::new([seed; 32]),
        }
    }

    #[test]
    fn inputs_are_indexed_in_declaration_order() {
        let mut b = ProgrammableTransactionBuilder::new();
        let a = b.pure(&1u64).unwrap();
        let c = b.pure(&2u64).unwrap();
        assert_eq!(a, Argument::Input(0));
        assert_eq!(c, Argument::Input(1));
    }

    #[test]
    fn commands_return_their_result_index() {
        let mut b = ProgrammableTransactionBuilder::new();
        let amount = b.pure(&100u64).unwrap();
        let first = b.split_coins(Argument::GasCoin, vec![amount]).unwrap();
        let second = b.merge_coins(first, vec![]).unwrap();
        assert_eq!(first, Argument::Result(0));
        assert_eq!(second, Argument::Result(1));
    }

    #[test]
    fn pure_scalar_rejects_wrong_width() {
        let mut b = ProgrammableTransactionBuilder::new();
        let err = b.pure_scalar(PureKind::U64, vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            BuildError::PureWidthMismatch {
                kind: "u64",
                expected: 8,
                actual: 3
            }
        );
        assert!(b.inputs().is_empty(), "rejected value must not be declared");
    }

    #[test]
    fn pure_scalar_accepts_exact_width() {
        let mut b = ProgrammableTransactionBuilder::new();
        let arg = b
            .pure_scalar(PureKind::U64, 9u64.to_le_bytes().to_vec())
            .unwrap();
        assert_eq!(arg, Argument::Input(0));
        assert_eq!(b.inputs()[0], CallArg::Pure(9u64.to_le_bytes().to_vec()));
    }

    #[test]
    fn duplicate_object_inputs_are_deduplicated() {
        let mut b = ProgrammableTransactionBuilder::new();
        let first = b.object(obj_ref(1)).unwrap();
        let second = b.object(obj_ref(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(b.inputs().len(), 1);
    }

    #[test]
    fn shared_object_mutability_is_merged() {
        let id = Address::from_hex("0x6").unwrap();
        let mut b = ProgrammableTransactionBuilder::new();
        b.shared_object(id, 1, false).unwrap();
        let arg = b.shared_object(id, 1, true).unwrap();
        assert_eq!(arg, Argument::Input(0));
        assert_eq!(b.inputs().len(), 1);
        assert!(b.inputs()[0].is_mutable_shared());
    }

    #[test]
    fn pure_inputs_are_never_deduplicated() {
        let mut b = ProgrammableTransactionBuilder::new();
        b.pure(&1u64).unwrap();
        b.pure(&1u64).unwrap();
        assert_eq!(b.inputs().len(), 2);
    }

    #[test]
    fn move_call_validates_identifiers() {
        let mut b = ProgrammableTransactionBuilder::new();
        let err = b
            .move_call(Address::FRAMEWORK, "2bad", "new", vec![], vec![])
            .unwrap_err();
        assert_eq!(err, BuildError::InvalidIdentifier("2bad".to_string()));
        assert!(b.commands().is_empty());
    }

    #[test]
    fn build_assembles_the_envelope() {
        let sender = Address::from_hex("0xaa").unwrap();
        let mut b = ProgrammableTransactionBuilder::new();
        let recipient = b.pure(&Address::from_hex("0xbb").unwrap()).unwrap();
        let amount = b.pure(&100u64).unwrap();
        let coin = b.split_coins(Argument::GasCoin, vec![amount]).unwrap();
        b.transfer_objects(vec![coin], recipient).unwrap();

        let tx = b.build(
            sender,
            GasData {
                payment: vec![obj_ref(9)],
                owner: sender,
                price: 1000,
                budget: 1_000_000,
            },
            TransactionExpiration::None,
        );

        assert_eq!(tx.sender(), sender);
        tx.validate_for_execution().unwrap();
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(TransactionData::from_bytes(&bytes).unwrap(), tx);
    }
}
