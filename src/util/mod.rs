//! Miscellaneous helpers: hashing, varints and the serialization trait.

mod hash160;
mod hash256;
mod result;
pub(crate) mod serdes;
pub mod var_int;

pub use self::hash160::{Hash160, hash160};
pub use self::hash256::{Hash256, sha256d};
pub use self::result::{Error, Result};
pub use self::serdes::Serializable;
