//! The `EMOJ` framer: builds and parses the text-carrier container.
//!
//! Simpler than `STEGFILE`: the CRC covers only the body, there is no header CRC (the
//! emoji carrier itself is coarse enough that corruption usually shows up as garbage
//! graphemes rather than a subtly-flipped header bit), and there is no `kdf_id`/
//! `iterations` field — encrypted EMOJ bodies always use
//! [`crate::crypto::DEFAULT_ITERATIONS`], which callers must also assume on reveal.

use crate::bytes::{crc32, read_bytes8, read_u32_be, read_u8, write_bytes8, write_u32_be, write_u8};
use crate::container::{CryptoParams, FLAG_ENCRYPTED};
use crate::crypto::KDF_PBKDF2_HMAC_SHA256;
use crate::error::Error;

pub const MAGIC: &[u8; 4] = b"EMOJ";
pub const VERSION: u8 = 1;

/// Builds `magic version flags salt iv data_len crc body`.
pub fn build(flags: u8, crypto: Option<&CryptoParams>, body: &[u8]) -> Result<Vec<u8>, Error> {
    if flags & FLAG_ENCRYPTED != 0 && crypto.is_none() {
        return Err(Error::MissingCryptoParams);
    }

    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    write_u8(&mut out, VERSION);
    write_u8(&mut out, flags);

    match crypto {
        Some(c) => {
            write_bytes8(&mut out, &c.salt)?;
            write_bytes8(&mut out, &c.iv)?;
        }
        None => {
            write_bytes8(&mut out, &[])?;
            write_bytes8(&mut out, &[])?;
        }
    }

    write_u32_be(&mut out, body.len() as u32);
    write_u32_be(&mut out, crc32(body));
    out.extend_from_slice(body);
    Ok(out)
}

/// Parses an `EMOJ` container and returns `(flags, crypto_params?, body)`.
pub fn parse(data: &[u8]) -> Result<(u8, Option<CryptoParams>, &[u8]), Error> {
    if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
        return Err(Error::BadMagic);
    }
    let mut pos = MAGIC.len();
    let version = read_u8(data, &mut pos)?;
    if version != VERSION {
        return Err(Error::UnsupportedVersion);
    }
    let flags = read_u8(data, &mut pos)?;

    let salt = read_bytes8(data, &mut pos)?.to_vec();
    let iv = read_bytes8(data, &mut pos)?.to_vec();

    let crypto = if flags & FLAG_ENCRYPTED != 0 {
        Some(CryptoParams {
            salt,
            kdf_id: KDF_PBKDF2_HMAC_SHA256,
            iterations: crate::crypto::DEFAULT_ITERATIONS,
            iv,
        })
    } else {
        None
    };

    let data_len = read_u32_be(data, &mut pos)? as usize;
    let crc = read_u32_be(data, &mut pos)?;
    let body = take(data, &mut pos, data_len)?;
    if crc32(body) != crc {
        return Err(Error::PayloadCorrupt);
    }

    Ok((flags, crypto, body))
}

fn take<'a>(input: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], Error> {
    if pos.saturating_add(n) > input.len() {
        return Err(Error::UnexpectedEof);
    }
    let slice = &input[*pos..*pos + n];
    *pos += n;
    Ok(slice)
}
