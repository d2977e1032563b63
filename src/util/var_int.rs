//! Variable length integer (CompactSize) ser/des.

use crate::util::serdes::truncated;
use crate::util::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Returns the number of bytes required for the varint.
#[must_use]
#[inline]
pub fn size(n: u64) -> usize {
    if n <= 252 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffffffff {
        5
    } else {
        9
    }
}

/// Writes the var int to bytes.
#[inline]
pub fn write(n: u64, writer: &mut dyn Write) -> io::Result<()> {
    if n <= 252 {
        writer.write_u8(n as u8)
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)
    } else if n <= 0xffffffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)
    }
}

/// Reads a var int from bytes. Non-minimal widths are accepted.
#[inline]
pub fn read(reader: &mut dyn Read) -> Result<u64> {
    let n0 = reader.read_u8().map_err(truncated("var_int marker"))?;
    let n = match n0 {
        0xff => reader.read_u64::<LittleEndian>(),
        0xfe => reader.read_u32::<LittleEndian>().map(u64::from),
        0xfd => reader.read_u16::<LittleEndian>().map(u64::from),
        _ => Ok(u64::from(n0)),
    };
    n.map_err(truncated("var_int"))
}

/// Encodes `n` in its minimal form.
#[must_use]
pub fn encode(n: u64) -> Vec<u8> {
    let mut v = Vec::with_capacity(size(n));
    // Writes into a Vec cannot fail.
    let _ = write(n, &mut v);
    v
}

/// Decodes a var int from the front of `bytes`, returning it with the bytes that follow.
pub fn decode(bytes: &[u8]) -> Result<(u64, &[u8])> {
    let mut rest = bytes;
    let n = read(&mut rest)?;
    Ok((n, rest))
}
