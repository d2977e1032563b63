//! Transaction records and their binary codecs.
//!
//! All integers are little-endian. Scripts are prefixed by their byte length as a var int.

mod out_point;
mod tx;
mod tx_in;
mod tx_out;

pub use self::out_point::{COINBASE_OUTPOINT_HASH, COINBASE_OUTPOINT_INDEX, OutPoint};
pub use self::tx::Tx;
pub use self::tx_in::TxIn;
pub use self::tx_out::{MAX_SATOSHIS, TxOut};
