//! Binary serialization/deserialization trait for transaction objects.
use crate::util::{Error, Result};
use std::io;
use std::io::{Read, Write};

/// An object that may be serialized and deserialized.
pub trait Serializable<T> {
    /// Reads the object from serialized form.
    ///
    /// # Errors
    /// `Error::Truncated` naming the field that ran out of input, or `Error::BadData`.
    fn read(reader: &mut dyn Read) -> Result<T>
    where
        Self: Sized;

    /// Writes the object to serialized form.
    ///
    /// # Errors
    /// IO errors.
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;

    /// Decodes the object from the front of `bytes`, returning it with the bytes that follow.
    ///
    /// # Errors
    /// Same as [`Serializable::read`].
    fn from_bytes(bytes: &[u8]) -> Result<(T, &[u8])>
    where
        Self: Sized,
    {
        let mut rest = bytes;
        let value = Self::read(&mut rest)?;
        Ok((value, rest))
    }

    /// Encodes the object into a fresh byte vector.
    #[must_use]
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        // Writes into a Vec cannot fail.
        let res = self.write(&mut v);
        debug_assert!(res.is_ok(), "write into Vec failed");
        v
    }
}

/// Maps a short read into `Error::Truncated` for `field`.
pub(crate) fn truncated(field: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated(field)
        } else {
            Error::IOError(e)
        }
    }
}

/// Reads exactly `buf.len()` bytes for `field`.
pub(crate) fn read_field(reader: &mut dyn Read, buf: &mut [u8], field: &'static str) -> Result<()> {
    reader.read_exact(buf).map_err(truncated(field))
}

impl Serializable<[u8; 32]> for [u8; 32] {
    fn read(reader: &mut dyn Read) -> Result<[u8; 32]> {
        let mut d = [0; 32];
        read_field(reader, &mut d, "32-byte array")?;
        Ok(d)
    }
    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(self)
    }
}
