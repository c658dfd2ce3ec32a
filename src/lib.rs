//! # stegano-container — hide payloads in image pixel LSBs or emoji zero-width text
//!
//! Format guarantees:
//! - `STEGFILE` (image carrier) and `EMOJ` (text carrier) are distinct, byte-exact
//!   container formats (see [`container::stegfile`] and [`container::emoj`])
//! - All multi-byte integers on the wire are big-endian
//! - `STEGFILE` headers carry a mandatory CRC32 over every byte from `magic`
//!   through the crypto fields; `EMOJ` bodies carry a CRC32 over the body alone
//! - Encryption, when requested, is AES-256-GCM with a PBKDF2-HMAC-SHA-256
//!   derived key; decryption failure and tampering are both reported as
//!   [`error::Error::AuthFailed`]
//! - Compression is opportunistic gzip: the `COMPRESSED` flag is set only when
//!   the compressed form is strictly smaller than the input
//! - Reveal on an image carrier auto-detects LSB depth and alpha usage; there is
//!   no out-of-band metadata describing how a payload was embedded

pub mod bytes;
pub mod compression;
pub mod container;
pub mod crypto;
pub mod emoji_codec;
pub mod error;
pub mod image_codec;
pub mod pipeline;

pub use container::{CryptoParams, PayloadDescriptor};
pub use error::Error;
pub use image_codec::CarrierImage;
pub use pipeline::{
    estimate_capacity, hide_emoji, hide_image, reveal_emoji, reveal_image, reveal_image_verbose,
    CapacityEstimate, DetectionAttempt, HideEmojiOptions, HideImageOptions, RevealedPayload,
    RevealedText,
};
