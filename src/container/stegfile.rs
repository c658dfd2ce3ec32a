//! The `STEGFILE` framer: builds and parses the image-carrier container header and trailer.
//!
//! Layout (see the data model): `magic(8) version(1) flags(1) name mime orig_size(8)
//! [crypto fields] header_crc(4) body_size(4) body`. `header_crc` covers every byte from
//! `magic` through the crypto fields (or through `orig_size` when unencrypted); `body_size`
//! is a separate field sitting between the CRC and the body, not covered by the CRC itself.

use crate::bytes::{
    crc32, read_str16, read_u16_be, read_u32_be, read_u64_be, read_u8, write_str16, write_u16_be,
    write_u32_be, write_u64_be, write_u8,
};
use crate::container::{CryptoParams, FLAG_ENCRYPTED};
use crate::crypto::KDF_PBKDF2_HMAC_SHA256;
use crate::error::Error;

pub const MAGIC: &[u8; 8] = b"STEGFILE";
pub const LEGACY_MAGIC: &[u8; 4] = b"STEG";
pub const VERSION: u8 = 1;

/// The fields that actually sit on the wire, distinct from [`crate::container::PayloadDescriptor`]
/// (which also carries the caller's raw `bytes` — those are framed separately as `body`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegFileHeader {
    pub name: String,
    pub mime: String,
    pub orig_size: u64,
    pub flags: u8,
    pub crypto: Option<CryptoParams>,
}

/// Builds `header || header_crc || body_size || body`.
pub fn build(header: &StegFileHeader, body: &[u8]) -> Result<Vec<u8>, Error> {
    if header.flags & FLAG_ENCRYPTED != 0 && header.crypto.is_none() {
        return Err(Error::MissingCryptoParams);
    }

    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    write_u8(&mut out, VERSION);
    write_u8(&mut out, header.flags);
    write_str16(&mut out, &header.name)?;
    write_str16(&mut out, &header.mime)?;
    write_u64_be(&mut out, header.orig_size);

    if let Some(crypto) = &header.crypto {
        write_u16_be(&mut out, crypto.salt.len() as u16);
        out.extend_from_slice(&crypto.salt);
        write_u8(&mut out, crypto.kdf_id);
        write_u32_be(&mut out, crypto.iterations);
        write_u8(&mut out, crypto.iv.len() as u8);
        out.extend_from_slice(&crypto.iv);
    }

    let header_crc = crc32(&out);
    write_u32_be(&mut out, header_crc);
    write_u32_be(&mut out, body.len() as u32);
    out.extend_from_slice(body);
    Ok(out)
}

/// Parses a `STEGFILE` header and returns it alongside the body slice that follows.
///
/// `verify_crc` controls whether the header CRC is checked; streaming readers may skip
/// it since AES-GCM's tag transitively catches header corruption in encrypted mode.
pub fn parse(data: &[u8], verify_crc: bool) -> Result<(StegFileHeader, &[u8]), Error> {
    if data.len() >= 5 && &data[0..4] == LEGACY_MAGIC && data[4] != b'F' {
        return Err(Error::LegacyFormat);
    }
    if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
        return Err(Error::BadMagic);
    }

    let mut pos = MAGIC.len();
    let version = read_u8(data, &mut pos)?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion);
    }
    let flags = read_u8(data, &mut pos)?;
    let name = read_str16(data, &mut pos)?;
    let mime = read_str16(data, &mut pos)?;
    let orig_size = read_u64_be(data, &mut pos)?;

    let crypto = if flags & FLAG_ENCRYPTED != 0 {
        let salt_len = read_u16_be(data, &mut pos)? as usize;
        let salt = take(data, &mut pos, salt_len)?.to_vec();
        let kdf_id = read_u8(data, &mut pos)?;
        if kdf_id != KDF_PBKDF2_HMAC_SHA256 {
            return Err(Error::UnknownKdf(kdf_id));
        }
        let iterations = read_u32_be(data, &mut pos)?;
        let iv_len = read_u8(data, &mut pos)? as usize;
        let iv = take(data, &mut pos, iv_len)?.to_vec();
        Some(CryptoParams {
            salt,
            kdf_id,
            iterations,
            iv,
        })
    } else {
        None
    };

    let header_end = pos;
    let header_crc = read_u32_be(data, &mut pos)?;
    if verify_crc && crc32(&data[..header_end]) != header_crc {
        return Err(Error::HeaderCrcFailed);
    }

    let body_size = read_u32_be(data, &mut pos)? as usize;
    let body = take(data, &mut pos, body_size)?;

    Ok((
        StegFileHeader {
            name,
            mime,
            orig_size,
            flags,
            crypto,
        },
        body,
    ))
}

fn take<'a>(input: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], Error> {
    if pos.saturating_add(n) > input.len() {
        return Err(Error::UnexpectedEof);
    }
    let slice = &input[*pos..*pos + n];
    *pos += n;
    Ok(slice)
}
