//! Script model and codec.
//!
//! A script is held as its program order of [`Chunk`]s: standalone opcodes and push data.
//! Scripts are never executed here; they are parsed and re-serialized so the signature hash
//! can commit to them.
//!
//! # Examples
//!
//! ```
//! use bsvtx::script::{op_codes::*, Chunk, Script};
//!
//! let script = Script::decode(&[OP_DUP, 2, 0xab, 0xcd, OP_CHECKSIG]).unwrap();
//! assert_eq!(script.chunks()[1], Chunk::Push(vec![0xab, 0xcd]));
//! assert_eq!(script.to_string(), "OP_DUP abcd OP_CHECKSIG");
//! assert_eq!(script.encode(), vec![OP_DUP, 2, 0xab, 0xcd, OP_CHECKSIG]);
//! ```

use crate::util::serdes::truncated;
use crate::util::{var_int, Error, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Read, Write};

pub mod op_codes;

use self::op_codes::{OP_0, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

/// Largest payload a direct length byte can push.
const MAX_DIRECT_PUSH: usize = 75;

/// One element of a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Chunk {
    /// A standalone opcode. Never one of the push prefixes 1..=78.
    Op(u8),
    /// Raw bytes pushed with the smallest prefix that fits their length.
    Push(Vec<u8>),
    /// Raw bytes pushed with an explicit `OP_PUSHDATA1`, `OP_PUSHDATA2` or `OP_PUSHDATA4` prefix
    /// larger than needed. Decoding keeps such pushes as they were so the script re-encodes to
    /// the same bytes.
    PushData(u8, Vec<u8>),
}

impl Chunk {
    /// Creates a push chunk, representing an empty payload as `OP_0`.
    #[must_use]
    pub fn from_data(data: &[u8]) -> Chunk {
        if data.is_empty() {
            Chunk::Op(OP_0)
        } else {
            Chunk::Push(data.to_vec())
        }
    }

    /// Returns the serialized length of the chunk in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Chunk::Op(_) => 1,
            Chunk::Push(data) => push_prefix_size(minimal_prefix(data.len())) + data.len(),
            Chunk::PushData(prefix, data) => push_prefix_size(*prefix) + data.len(),
        }
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        let (prefix, data) = match self {
            Chunk::Op(op) => return writer.write_u8(*op),
            Chunk::Push(data) => (minimal_prefix(data.len()), data),
            Chunk::PushData(prefix, data) => (*prefix, data),
        };
        let len = data.len();
        let too_long = || io::Error::new(io::ErrorKind::InvalidInput, "push data too long for its prefix");
        writer.write_u8(prefix)?;
        match prefix {
            OP_0 if len == 0 => {}
            OP_PUSHDATA1 => writer.write_u8(u8::try_from(len).map_err(|_| too_long())?)?,
            OP_PUSHDATA2 => writer.write_u16::<LittleEndian>(u16::try_from(len).map_err(|_| too_long())?)?,
            OP_PUSHDATA4 => writer.write_u32::<LittleEndian>(u32::try_from(len).map_err(|_| too_long())?)?,
            n if usize::from(n) == len && len <= MAX_DIRECT_PUSH => {}
            _ => return Err(too_long()),
        }
        writer.write_all(data)
    }
}

/// Returns the push opcode a payload of `len` bytes is written with by default.
fn minimal_prefix(len: usize) -> u8 {
    if len == 0 {
        OP_0
    } else if len <= MAX_DIRECT_PUSH {
        len as u8
    } else if len <= 0xff {
        OP_PUSHDATA1
    } else if len <= 0xffff {
        OP_PUSHDATA2
    } else {
        OP_PUSHDATA4
    }
}

fn push_prefix_size(prefix: u8) -> usize {
    match prefix {
        OP_PUSHDATA1 => 2,
        OP_PUSHDATA2 => 3,
        OP_PUSHDATA4 => 5,
        _ => 1,
    }
}

/// Transaction script, as an ordered list of chunks.
///
/// A `Chunk::Op` holding a push prefix (1..=78) does not round-trip; build pushes with
/// [`Script::append_data`] or [`Chunk::from_data`].
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<Chunk>);

impl Script {
    /// Creates a new empty script.
    #[must_use]
    #[inline]
    pub fn new() -> Script {
        Script(Vec::new())
    }

    /// Appends a single opcode. Push data must go through [`Script::append_data`].
    ///
    /// # Errors
    /// `Error::BadArgument` if `op` is a push prefix (1..=78).
    #[inline]
    pub fn append(&mut self, op: u8) -> Result<()> {
        if op_codes::is_push(op) {
            return Err(Error::BadArgument(format!("Push prefix {} appended as an opcode", op)));
        }
        self.0.push(Chunk::Op(op));
        Ok(())
    }

    /// Appends the opcodes and pushes of another script.
    pub fn append_script(&mut self, script: &Script) {
        self.0.extend_from_slice(&script.0);
    }

    /// Appends a data push.
    ///
    /// # Errors
    /// `Error::BadArgument` if the data is longer than `OP_PUSHDATA4` can describe.
    pub fn append_data(&mut self, data: &[u8]) -> Result<()> {
        if u32::try_from(data.len()).is_err() {
            return Err(Error::BadArgument(format!("Push data too long: {}", data.len())));
        }
        self.0.push(Chunk::from_data(data));
        Ok(())
    }

    /// Returns the chunks in program order.
    #[must_use]
    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        &self.0
    }

    /// Returns whether the script has no chunks.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the serialized length of the script in bytes, without a length prefix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.iter().map(Chunk::size).sum()
    }

    /// Derives a copy of the script with every standalone `op` removed.
    #[must_use]
    pub fn remove_op(&self, op: u8) -> Script {
        Script(self.0.iter().filter(|c| **c != Chunk::Op(op)).cloned().collect())
    }

    /// Parses raw script bytes up to the end of input.
    ///
    /// # Errors
    /// `Error::Truncated` if a push declares more bytes than remain.
    pub fn decode(bytes: &[u8]) -> Result<Script> {
        let mut chunks = Vec::new();
        let mut rest = bytes;
        while let Some((&op, tail)) = rest.split_first() {
            rest = tail;
            let len = match op {
                1..=75 => usize::from(op),
                OP_PUSHDATA1 => usize::from(rest.read_u8().map_err(truncated("OP_PUSHDATA1 length"))?),
                OP_PUSHDATA2 => usize::from(
                    rest.read_u16::<LittleEndian>().map_err(truncated("OP_PUSHDATA2 length"))?,
                ),
                OP_PUSHDATA4 => {
                    rest.read_u32::<LittleEndian>().map_err(truncated("OP_PUSHDATA4 length"))? as usize
                }
                _ => {
                    chunks.push(Chunk::Op(op));
                    continue;
                }
            };
            if len > rest.len() {
                return Err(Error::Truncated("script push data"));
            }
            let (data, tail) = rest.split_at(len);
            if op == minimal_prefix(len) {
                chunks.push(Chunk::Push(data.to_vec()));
            } else {
                chunks.push(Chunk::PushData(op, data.to_vec()));
            }
            rest = tail;
        }
        Ok(Script(chunks))
    }

    /// Serializes the script to raw bytes, without a length prefix.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.size());
        // Writes into a Vec only fail for pushes append_data would have refused.
        let res = self.write_raw(&mut v);
        debug_assert!(res.is_ok(), "script push does not fit its prefix");
        v
    }

    /// Writes the raw script bytes, without a length prefix.
    pub fn write_raw(&self, writer: &mut dyn Write) -> io::Result<()> {
        for chunk in &self.0 {
            chunk.write(writer)?;
        }
        Ok(())
    }
}

/// Reads and writes the script with a var int length prefix, as embedded in inputs and outputs.
impl Serializable<Script> for Script {
    fn read(reader: &mut dyn Read) -> Result<Script> {
        let len = var_int::read(reader)?;
        let mut bytes = Vec::new();
        reader.take(len).read_to_end(&mut bytes)?;
        if (bytes.len() as u64) < len {
            return Err(Error::Truncated("script"));
        }
        Script::decode(&bytes)
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.size() as u64, writer)?;
        self.write_raw(writer)
    }
}

impl From<Vec<Chunk>> for Script {
    fn from(chunks: Vec<Chunk>) -> Self {
        Script(chunks)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, chunk) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match chunk {
                Chunk::Op(op) => match op_codes::name(*op) {
                    Some(name) => f.write_str(name)?,
                    None => write!(f, "OP_UNKNOWN{}", op)?,
                },
                Chunk::Push(data) => f.write_str(&hex::encode(data))?,
                Chunk::PushData(prefix, data) => {
                    let name = match *prefix {
                        OP_PUSHDATA1 => "OP_PUSHDATA1",
                        OP_PUSHDATA2 => "OP_PUSHDATA2",
                        _ => "OP_PUSHDATA4",
                    };
                    write!(f, "{} {}", name, hex::encode(data))?
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", self)
    }
}
