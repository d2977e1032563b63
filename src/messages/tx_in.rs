//! Transaction input.
use crate::messages::out_point::OutPoint;
use crate::script::Script;
use crate::util::serdes::truncated;
use crate::util::{var_int, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Transaction input.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxIn {
    /// The previous output transaction reference.
    pub prev_output: OutPoint,
    /// Script satisfying the spent output's lock script.
    pub unlock_script: Script,
    /// Sequence number, used for replacement and relative lock time.
    pub sequence: u32,
}

impl TxIn {
    /// Returns the size of the transaction input in bytes.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        let script_len = self.unlock_script.size();
        OutPoint::SIZE + var_int::size(script_len as u64) + script_len + 4
    }
}

impl Serializable<TxIn> for TxIn {
    fn read(reader: &mut dyn Read) -> Result<TxIn> {
        let prev_output = OutPoint::read(reader)?;
        let unlock_script = Script::read(reader)?;
        let sequence = reader.read_u32::<LittleEndian>().map_err(truncated("sequence"))?;
        Ok(TxIn {
            prev_output,
            unlock_script,
            sequence,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_output.write(writer)?;
        self.unlock_script.write(writer)?;
        writer.write_u32::<LittleEndian>(self.sequence)
    }
}
