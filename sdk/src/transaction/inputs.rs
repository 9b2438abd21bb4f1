//! Transaction inputs: pure values and object references.
//!
//! Every input to a programmable transaction is either a `Pure` blob of
//! pre-encoded BCS bytes (opaque to this layer beyond length-prefixing)
//! or a reference to an on-chain object in one of three flavors.

use serde::{Deserialize, Serialize};

use crate::bcs::{BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;
use crate::types::{Address, Digest};

/// A reference to a specific version of an on-chain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// The object's ID.
    pub object_id: Address,
    /// The version being referenced.
    pub version: u64,
    /// Digest of the object at that version.
    pub digest: Digest,
}

/// How an object input is passed to the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    /// An owned or immutable object at an exact version.
    ImmOrOwnedObject(ObjectRef),
    /// A shared object; consensus picks the version at execution time.
    SharedObject {
        object_id: Address,
        initial_shared_version: u64,
        mutable: bool,
    },
    /// An object sent to the sender, received within this transaction.
    Receiving(ObjectRef),
}

impl ObjectArg {
    /// The ID of the referenced object, whatever the flavor.
    pub fn object_id(&self) -> Address {
        match self {
            Self::ImmOrOwnedObject(r) | Self::Receiving(r) => r.object_id,
            Self::SharedObject { object_id, .. } => *object_id,
        }
    }
}

/// One declared input of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// Raw BCS-encoded bytes of a scalar or vector value.
    Pure(Vec<u8>),
    /// An object reference.
    Object(ObjectArg),
}

impl CallArg {
    /// The referenced object ID, if this is an object input.
    pub fn object_id(&self) -> Option<Address> {
        match self {
            Self::Pure(_) => None,
            Self::Object(arg) => Some(arg.object_id()),
        }
    }

    /// Returns `true` for a shared object input taken mutably.
    pub fn is_mutable_shared(&self) -> bool {
        matches!(
            self,
            Self::Object(ObjectArg::SharedObject { mutable: true, .. })
        )
    }
}

// ---------------------------------------------------------------------------
// Wire encoding
// ---------------------------------------------------------------------------

impl BcsEncode for ObjectRef {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        self.object_id.encode(w)?;
        w.write_u64(self.version);
        self.digest.encode(w)
    }
}

impl BcsDecode for ObjectRef {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            object_id: Address::decode(r)?,
            version: r.read_u64()?,
            digest: Digest::decode(r)?,
        })
    }
}

impl BcsEncode for ObjectArg {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::ImmOrOwnedObject(obj_ref) => {
                w.write_uleb128(0);
                obj_ref.encode(w)
            }
            Self::SharedObject {
                object_id,
                initial_shared_version,
                mutable,
            } => {
                w.write_uleb128(1);
                object_id.encode(w)?;
                w.write_u64(*initial_shared_version);
                w.write_bool(*mutable);
                Ok(())
            }
            Self::Receiving(obj_ref) => {
                w.write_uleb128(2);
                obj_ref.encode(w)
            }
        }
    }
}

impl BcsDecode for ObjectArg {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::ImmOrOwnedObject(ObjectRef::decode(r)?)),
            1 => Ok(Self::SharedObject {
                object_id: Address::decode(r)?,
                initial_shared_version: r.read_u64()?,
                mutable: r.read_bool()?,
            }),
            2 => Ok(Self::Receiving(ObjectRef::decode(r)?)),
            other => Err(CodecError::malformed(format!(
                "unknown ObjectArg discriminant {other}"
            ))),
        }
    }
}

impl BcsEncode for CallArg {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            Self::Pure(bytes) => {
                w.write_uleb128(0);
                w.write_vec_bytes(bytes)
            }
            Self::Object(arg) => {
                w.write_uleb128(1);
                arg.encode(w)
            }
        }
    }
}

impl BcsDecode for CallArg {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_uleb128()? {
            0 => Ok(Self::Pure(r.read_vec_bytes()?)),
            1 => Ok(Self::Object(ObjectArg::decode(r)?)),
            other => Err(CodecError::malformed(format!(
                "unknown CallArg discriminant {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    fn obj_ref(seed: u8) -> ObjectRef {
        ObjectRef {
            object_id: Address::new([seed; 32]),
            version: seed as u64 * 100,
            digest: Digest::new([seed.wrapping_add(1); 32]),
        }
    }

    #[test]
    fn object_ref_layout() {
        let r = obj_ref(5);
        let bytes = bcs::to_bytes(&r).unwrap();
        // address (32) + version (8) + digest (32), no prefixes anywhere
        assert_eq!(bytes.len(), 72);
        assert_eq!(bcs::from_bytes::<ObjectRef>(&bytes).unwrap(), r);
    }

    #[test]
    fn pure_is_length_prefixed() {
        let arg = CallArg::Pure(vec![8, 0, 0, 0, 0, 0, 0, 0]);
        let bytes = bcs::to_bytes(&arg).unwrap();
        assert_eq!(bytes[0], 0); // Pure discriminant
        assert_eq!(bytes[1], 8); // byte length
        assert_eq!(bcs::from_bytes::<CallArg>(&bytes).unwrap(), arg);
    }

    #[test]
    fn all_object_flavors_roundtrip() {
        let args = [
            CallArg::Object(ObjectArg::ImmOrOwnedObject(obj_ref(1))),
            CallArg::Object(ObjectArg::SharedObject {
                object_id: Address::from_hex("0x6").unwrap(),
                initial_shared_version: 1,
                mutable: true,
            }),
            CallArg::Object(ObjectArg::SharedObject {
                object_id: Address::from_hex("0x8").unwrap(),
                initial_shared_version: 42,
                mutable: false,
            }),
            CallArg::Object(ObjectArg::Receiving(obj_ref(9))),
        ];
        for arg in &args {
            let bytes = bcs::to_bytes(arg).unwrap();
            assert_eq!(&bcs::from_bytes::<CallArg>(&bytes).unwrap(), arg);
        }
    }

    #[test]
    fn unknown_discriminants_are_malformed() {
        assert!(matches!(
            bcs::from_bytes::<CallArg>(&[2]).unwrap_err(),
            CodecError::MalformedEncoding(_)
        ));
        assert!(matches!(
            bcs::from_bytes::<ObjectArg>(&[3]).unwrap_err(),
            CodecError::MalformedEncoding(_)
        ));
    }

    #[test]
    fn object_id_helper() {
        let id = Address::from_hex("0xabc").unwrap();
        let arg = CallArg::Object(ObjectArg::SharedObject {
            object_id: id,
            initial_shared_version: 3,
            mutable: true,
        });
        assert_eq!(arg.object_id(), Some(id));
        assert!(arg.is_mutable_shared());
        assert_eq!(CallArg::Pure(vec![1]).object_id(), None);
    }
}
