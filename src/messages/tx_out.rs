//! Transaction output.

use crate::script::Script;
use crate::util::serdes::truncated;
use crate::util::{var_int, Error, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Maximum number of satoshis possible (21M coins).
pub const MAX_SATOSHIS: i64 = 21_000_000 * 100_000_000;

/// Transaction output.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis to spend.
    pub satoshis: i64,
    /// Public key script to claim the output.
    pub lock_script: Script,
}

impl TxOut {
    /// Placeholder for outputs ahead of the signed one in a legacy SIGHASH_SINGLE preimage.
    /// Never valid in a broadcast transaction.
    #[must_use]
    pub(crate) fn sighash_single_placeholder() -> TxOut {
        TxOut {
            satoshis: -1,
            lock_script: Script::new(),
        }
    }

    /// Returns the size of the transaction output in bytes.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        let script_len = self.lock_script.size();
        8 + var_int::size(script_len as u64) + script_len
    }

    /// Validates the output's value for broadcast.
    ///
    /// # Errors
    /// `Error::BadData` if satoshis are negative or exceed `MAX_SATOSHIS`.
    pub fn validate(&self) -> Result<()> {
        if self.satoshis < 0 {
            return Err(Error::BadData("Negative satoshis".to_string()));
        }
        if self.satoshis > MAX_SATOSHIS {
            return Err(Error::BadData("Satoshis exceeds max".to_string()));
        }
        Ok(())
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let satoshis = reader.read_i64::<LittleEndian>().map_err(truncated("satoshis"))?;
        let lock_script = Script::read(reader)?;
        Ok(TxOut {
            satoshis,
            lock_script,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_i64::<LittleEndian>(self.satoshis)?;
        self.lock_script.write(writer)
    }
}
