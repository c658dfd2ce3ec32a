//! Byte-level primitives: CRC-32 and big-endian fixed-width integer codecs.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ByteCodecError {
    #[error("unexpected end of input: needed {needed} bytes, had {available}")]
    UnexpectedEof { needed: usize, available: usize },
    #[error("length {len} does not fit in a {width}-byte field")]
    ValueTooWide { len: usize, width: usize },
    #[error("invalid UTF-8 in length-prefixed string")]
    InvalidUtf8,
}

/// IEEE 802.3 CRC-32 (polynomial 0xEDB88320, reflected), as used by gzip, zlib, and PNG.
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

pub fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub fn read_u8(input: &[u8], pos: &mut usize) -> Result<u8, ByteCodecError> {
    let b = *input.get(*pos).ok_or(ByteCodecError::UnexpectedEof {
        needed: 1,
        available: input.len().saturating_sub(*pos),
    })?;
    *pos += 1;
    Ok(b)
}

pub fn write_u16_be(out: &mut Vec<u8>, v: u16) {
    out.write_u16::<BigEndian>(v).expect("writing to a Vec cannot fail");
}

pub fn read_u16_be(input: &[u8], pos: &mut usize) -> Result<u16, ByteCodecError> {
    let bytes = take(input, pos, 2)?;
    Cursor::new(bytes)
        .read_u16::<BigEndian>()
        .map_err(|_| ByteCodecError::UnexpectedEof { needed: 2, available: bytes.len() })
}

pub fn write_u32_be(out: &mut Vec<u8>, v: u32) {
    out.write_u32::<BigEndian>(v).expect("writing to a Vec cannot fail");
}

pub fn read_u32_be(input: &[u8], pos: &mut usize) -> Result<u32, ByteCodecError> {
    let bytes = take(input, pos, 4)?;
    Cursor::new(bytes)
        .read_u32::<BigEndian>()
        .map_err(|_| ByteCodecError::UnexpectedEof { needed: 4, available: bytes.len() })
}

pub fn write_u64_be(out: &mut Vec<u8>, v: u64) {
    out.write_u64::<BigEndian>(v).expect("writing to a Vec cannot fail");
}

pub fn read_u64_be(input: &[u8], pos: &mut usize) -> Result<u64, ByteCodecError> {
    let bytes = take(input, pos, 8)?;
    Cursor::new(bytes)
        .read_u64::<BigEndian>()
        .map_err(|_| ByteCodecError::UnexpectedEof { needed: 8, available: bytes.len() })
}

/// Writes a `u16`-length-prefixed UTF-8 string. Fails if `s` is longer than `u16::MAX` bytes.
pub fn write_str16(out: &mut Vec<u8>, s: &str) -> Result<(), ByteCodecError> {
    let len = s.len();
    if len > u16::MAX as usize {
        return Err(ByteCodecError::ValueTooWide { len, width: 2 });
    }
    write_u16_be(out, len as u16);
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

pub fn read_str16(input: &[u8], pos: &mut usize) -> Result<String, ByteCodecError> {
    let len = read_u16_be(input, pos)? as usize;
    let bytes = take(input, pos, len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| ByteCodecError::InvalidUtf8)
}

/// Writes a `u8`-length-prefixed byte string (used for EMOJ's salt/iv fields).
pub fn write_bytes8(out: &mut Vec<u8>, b: &[u8]) -> Result<(), ByteCodecError> {
    let len = b.len();
    if len > u8::MAX as usize {
        return Err(ByteCodecError::ValueTooWide { len, width: 1 });
    }
    write_u8(out, len as u8);
    out.extend_from_slice(b);
    Ok(())
}

pub fn read_bytes8<'a>(input: &'a [u8], pos: &mut usize) -> Result<&'a [u8], ByteCodecError> {
    let len = read_u8(input, pos)? as usize;
    take(input, pos, len)
}

fn take<'a>(input: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], ByteCodecError> {
    let end = pos.checked_add(n).unwrap_or(usize::MAX);
    if end > input.len() {
        return Err(ByteCodecError::UnexpectedEof {
            needed: n,
            available: input.len().saturating_sub(*pos),
        });
    }
    let slice = &input[*pos..end];
    *pos = end;
    Ok(slice)
}
