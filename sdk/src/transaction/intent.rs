//! Intent-scoped signing messages and transaction digests.
//!
//! Raw transaction bytes are never signed directly. A 3-byte intent
//! prefix (scope, version, app id) is prepended first, so a signature
//! over a transaction can never be replayed as a signature over a
//! personal message or a checkpoint, and vice versa.
//!
//! The transaction digest is blake3 over the same prefixed bytes,
//! printed as base58. It is stable across signing, since the signature
//! never enters the hash.

use crate::error::CodecError;
use crate::transaction::data::TransactionData;
use crate::types::Digest;

/// What the signed bytes mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentScope {
    /// A transaction submitted for execution.
    TransactionData = 0,
    /// An arbitrary user message (wallet "sign message" flows).
    PersonalMessage = 3,
}

/// Version of the intent encoding itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntentVersion {
    V0 = 0,
}

/// Which application family the signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AppId {
    Lumen = 0,
}

/// The 3-byte prefix prepended to every signed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: IntentVersion,
    pub app_id: AppId,
}

impl Intent {
    /// The intent for signing transaction data: `[0, 0, 0]`.
    pub fn transaction_data() -> Self {
        Self {
            scope: IntentScope::TransactionData,
            version: IntentVersion::V0,
            app_id: AppId::Lumen,
        }
    }

    /// The intent for signing a personal message.
    pub fn personal_message() -> Self {
        Self {
            scope: IntentScope::PersonalMessage,
            version: IntentVersion::V0,
            app_id: AppId::Lumen,
        }
    }

    /// The wire form of the prefix.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.scope as u8, self.version as u8, self.app_id as u8]
    }
}

/// Prepends `intent` to `payload`, producing the exact bytes a signer
/// must sign.
pub fn signing_message(intent: Intent, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(3 + payload.len());
    message.extend_from_slice(&intent.to_bytes());
    message.extend_from_slice(payload);
    message
}

impl TransactionData {
    /// The signing message for this transaction: intent prefix plus the
    /// canonical wire bytes.
    pub fn signing_message(&self) -> Result<Vec<u8>, CodecError> {
        Ok(signing_message(
            Intent::transaction_data(),
            &self.to_bytes()?,
        ))
    }

    /// The transaction digest: blake3 over the signing message.
    pub fn digest(&self) -> Result<Digest, CodecError> {
        let message = self.signing_message()?;
        Ok(Digest::new(*blake3::hash(&message).as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::builder::ProgrammableTransactionBuilder;
    use crate::transaction::data::{GasData, TransactionExpiration};
    use crate::transaction::inputs::ObjectRef;
    use crate::types::Address;

    fn sample_tx() -> TransactionData {
        let sender = Address::from_hex("0xaa").unwrap();
        let mut b = ProgrammableTransactionBuilder::new();
        let amount = b.pure(&1_000u64).unwrap();
        let recipient = b.pure(&Address::from_hex("0xbb").unwrap()).unwrap();
        let coin = b.split_coins(b.gas(), vec![amount]).unwrap();
        b.transfer_objects(vec![coin], recipient).unwrap();
        b.build(
            sender,
            GasData {
                payment: vec![ObjectRef {
                    object_id: Address::from_hex("0xcc").unwrap(),
                    version: 1,
                    digest: Digest::ZERO,
                }],
                owner: sender,
                price: 1,
                budget: 1_000_000,
            },
            TransactionExpiration::None,
        )
    }

    #[test]
    fn transaction_intent_is_all_zero() {
        assert_eq!(Intent::transaction_data().to_bytes(), [0, 0, 0]);
    }

    #[test]
    fn signing_message_has_intent_prefix() {
        let tx = sample_tx();
        let message = tx.signing_message().unwrap();
        assert_eq!(&message[0..3], &[0, 0, 0]);
        assert_eq!(&message[3..], &tx.to_bytes().unwrap()[..]);
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(
            sample_tx().digest().unwrap(),
            sample_tx().digest().unwrap()
        );
    }

    #[test]
    fn digest_depends_on_scope() {
        let tx = sample_tx();
        let bytes = tx.to_bytes().unwrap();
        let tx_message = signing_message(Intent::transaction_data(), &bytes);
        let msg_message = signing_message(Intent::personal_message(), &bytes);
        assert_ne!(
            blake3::hash(&tx_message).as_bytes(),
            blake3::hash(&msg_message).as_bytes()
        );
    }

    #[test]
    fn digest_changes_with_content() {
        let tx1 = sample_tx();
        let mut tx2 = sample_tx();
        let TransactionData::V1(ref mut v1) = tx2;
        v1.gas_data.budget += 1;
        assert_ne!(tx1.digest().unwrap(), tx2.digest().unwrap());
    }
}
