//! Standard error and result types for the library.
use hex::FromHexError;
use secp256k1::Error as Secp256k1Error;
use std::io;
use thiserror::Error as ThisError;

/// Standard error type used in the library
#[derive(Debug, ThisError)]
pub enum Error {
    /// An argument provided is invalid
    #[error("Bad argument: {0}")]
    BadArgument(String),
    /// The data given is not valid
    #[error("Bad data: {0}")]
    BadData(String),
    /// Input ended before the named field could be read
    #[error("Truncated input reading {0}")]
    Truncated(&'static str),
    /// Hex string could not be decoded
    #[error("Hex decoding error: {0}")]
    FromHexError(#[from] FromHexError),
    /// Input index is not an index into the transaction inputs
    #[error("Input index {index} out of range for {inputs} inputs")]
    InputOutOfRange {
        /// Requested input index
        index: usize,
        /// Number of inputs in the transaction
        inputs: usize,
    },
    /// Legacy SIGHASH_SINGLE with no output at the signed input's index
    #[error("SIGHASH_SINGLE input {index} has no matching output ({outputs} outputs)")]
    SingleOutputOutOfRange {
        /// Signed input index
        index: usize,
        /// Number of outputs in the transaction
        outputs: usize,
    },
    /// Low bits of the sighash flag are not ALL, NONE or SINGLE
    #[error("Invalid sighash type: {0:#04x}")]
    InvalidSigHashType(u8),
    /// Standard library IO error
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    /// Error in the Secp256k1 library, raised for malformed public keys
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] Secp256k1Error),
}

impl Error {
    /// Returns whether the error was caused by malformed or truncated input bytes.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Error::BadData(_) | Error::Truncated(_) | Error::FromHexError(_) | Error::Secp256k1Error(_)
        )
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display() {
        assert_eq!(Error::Truncated("sequence").to_string(), "Truncated input reading sequence");
        assert_eq!(Error::InvalidSigHashType(0x44).to_string(), "Invalid sighash type: 0x44");
        let e = Error::InputOutOfRange { index: 3, inputs: 2 };
        assert_eq!(e.to_string(), "Input index 3 out of range for 2 inputs");
    }

    #[test]
    fn classify() {
        assert!(Error::Truncated("index").is_decode_error());
        assert!(Error::BadData("x".to_string()).is_decode_error());
        assert!(!Error::InvalidSigHashType(0).is_decode_error());
        assert!(!Error::SingleOutputOutOfRange { index: 1, outputs: 1 }.is_decode_error());
    }
}
