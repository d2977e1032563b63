//! Pay-to-Public-Key-Hash (P2PKH) script templates.
use crate::script::op_codes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use crate::script::{Chunk, Script};
use crate::util::{Error, Hash160, Result};

/// Creates P2PKH lock script (DUP HASH160 [hash] EQUALVERIFY CHECKSIG).
#[must_use]
#[inline]
pub fn create_lock_script(address: &Hash160) -> Script {
    Script(vec![
        Chunk::Op(OP_DUP),
        Chunk::Op(OP_HASH160),
        Chunk::Push(address.0.to_vec()),
        Chunk::Op(OP_EQUALVERIFY),
        Chunk::Op(OP_CHECKSIG),
    ])
}

/// Creates P2PKH unlock script (push sig + pubkey).
///
/// # Errors
/// `Error::BadArgument` if either push is too long to encode.
pub fn create_unlock_script(sig: &[u8], public_key: &[u8]) -> Result<Script> {
    let mut script = Script::new();
    script.append_data(sig)?;
    script.append_data(public_key)?;
    Ok(script)
}

/// Checks if script is a P2PKH lock.
#[must_use]
pub fn check_lock_script(lock_script: &Script) -> bool {
    matches!(
        lock_script.chunks(),
        [
            Chunk::Op(OP_DUP),
            Chunk::Op(OP_HASH160),
            Chunk::Push(hash),
            Chunk::Op(OP_EQUALVERIFY),
            Chunk::Op(OP_CHECKSIG),
        ] if hash.len() == 20
    )
}

/// Extracts hash160 from a P2PKH lock.
///
/// # Errors
/// `Error::BadData` if the script is not a P2PKH lock.
pub fn extract_pubkeyhash(lock_script: &Script) -> Result<Hash160> {
    match lock_script.chunks() {
        [_, _, Chunk::Push(hash), _, _] if check_lock_script(lock_script) => {
            let mut hash160 = Hash160([0; 20]);
            hash160.0.copy_from_slice(hash);
            Ok(hash160)
        }
        _ => Err(Error::BadData("Not P2PKH lock".to_string())),
    }
}
