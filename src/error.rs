//! Crate-wide error taxonomy. One variant per condition in the error-handling design;
//! no two distinct failure modes share a variant.

use thiserror::Error;

use crate::bytes::ByteCodecError;
use crate::crypto::CryptoError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("carrier does not begin with the expected magic marker")]
    BadMagic,

    #[error("carrier begins with the legacy STEG marker, which this version does not support")]
    LegacyFormat,

    #[error("unsupported container version")]
    UnsupportedVersion,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unknown key-derivation function id {0:#x}")]
    UnknownKdf(u8),

    #[error("header CRC-32 mismatch")]
    HeaderCrcFailed,

    #[error("body CRC-32 mismatch")]
    PayloadCorrupt,

    #[error("authentication failed — wrong password or corrupted data")]
    AuthFailed,

    #[error("payload needs {needed} bytes but carrier only has {available}")]
    CapacityExceeded { needed: u64, available: u64 },

    #[error("carrier is encrypted but no password was supplied")]
    MissingPassword,

    #[error("encryption was requested but salt, iv, or iterations were not provided")]
    MissingCryptoParams,

    #[error("no hidden data found in carrier text")]
    NoHiddenData,

    #[error("carrier exhausted before the framer was satisfied")]
    UnexpectedEof,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ByteCodecError> for Error {
    fn from(e: ByteCodecError) -> Self {
        match e {
            ByteCodecError::UnexpectedEof { .. } => Error::UnexpectedEof,
            ByteCodecError::InvalidUtf8 => Error::MalformedHeader("invalid UTF-8".into()),
            ByteCodecError::ValueTooWide { len, width } => {
                Error::MalformedHeader(format!("value of length {len} does not fit in {width} bytes"))
            }
        }
    }
}

impl From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::EncryptionFailed => {
                Error::MalformedHeader("encryption failed".into())
            }
            CryptoError::AuthFailed => Error::AuthFailed,
        }
    }
}
