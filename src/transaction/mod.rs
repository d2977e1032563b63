//! Transaction signing and signature verification.
//!
//! Signatures are DER-encoded ECDSA with the sighash flag byte appended, the form embedded in
//! unlock scripts.
//!
//! # Examples
//!
//! Sign a P2PKH input and check the signature:
//!
//! ```
//! use bsvtx::messages::{Tx, TxIn, TxOut};
//! use bsvtx::transaction::{p2pkh, sign, verify};
//! use bsvtx::transaction::sighash::SIGHASH_DEFAULT;
//! use bsvtx::util::hash160;
//! use secp256k1::{PublicKey, Secp256k1, SecretKey};
//!
//! let private_key = [1; 32];
//! let secp = Secp256k1::new();
//! let public_key = PublicKey::from_secret_key(&secp, &SecretKey::from_slice(&private_key).unwrap()).serialize();
//!
//! let spent = TxOut { satoshis: 1000, lock_script: p2pkh::create_lock_script(&hash160(&public_key)) };
//! let mut tx = Tx { inputs: vec![TxIn::default()], ..Default::default() };
//! let signature = sign(&tx, 0, &spent, &private_key, SIGHASH_DEFAULT).unwrap();
//! assert!(verify(&signature, &tx, 0, &spent, &public_key).unwrap());
//! tx.inputs[0].unlock_script = p2pkh::create_unlock_script(&signature, &public_key).unwrap();
//! ```
pub mod p2pkh;
pub mod sighash;

use crate::messages::{Tx, TxOut};
use crate::util::{Error, Hash256, Result};
use log::debug;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sighash::{SigHashCache, sighash_with_cache};

/// Generates a DER-encoded ECDSA signature over a precomputed sighash, with the flag appended.
///
/// Signing is deterministic (RFC 6979) and the signature is normalized to low S.
///
/// # Errors
/// `Error::BadArgument` for an invalid private key.
pub fn generate_signature(private_key: &[u8; 32], sighash: &Hash256, sighash_type: u8) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let secret_key =
        SecretKey::from_slice(private_key).map_err(|e| Error::BadArgument(format!("Invalid private key: {}", e)))?;
    let message = Message::from_digest(sighash.0);
    let mut signature = secp.sign_ecdsa(&message, &secret_key);
    signature.normalize_s();
    let mut der = signature.serialize_der().to_vec();
    der.push(sighash_type);
    Ok(der)
}

/// Signs input `n_input`, which spends `spent_output`.
///
/// # Errors
/// Any error from [`sighash::sighash`], or an invalid private key.
pub fn sign(
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    private_key: &[u8; 32],
    sighash_type: u8,
) -> Result<Vec<u8>> {
    sign_with_cache(tx, n_input, spent_output, private_key, sighash_type, &mut SigHashCache::new())
}

/// Same as [`sign`], reusing fork-id intermediates from `cache` across inputs of one transaction.
pub fn sign_with_cache(
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    private_key: &[u8; 32],
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Vec<u8>> {
    let digest = sighash_with_cache(tx, n_input, spent_output, sighash_type, cache)?;
    generate_signature(private_key, &digest, sighash_type)
}

/// Verifies a signature (DER plus trailing flag byte) for input `n_input` against a serialized
/// compressed or uncompressed public key.
///
/// Returns `Ok(false)` when the signature is well formed but does not match. High-S signatures
/// are accepted.
///
/// # Errors
/// `Error::BadData` for an empty or non-DER signature, `Error::Secp256k1Error` for an invalid
/// public key, or any error from [`sighash::sighash`] for the recovered flag.
pub fn verify(signature: &[u8], tx: &Tx, n_input: usize, spent_output: &TxOut, public_key: &[u8]) -> Result<bool> {
    verify_with_cache(signature, tx, n_input, spent_output, public_key, &mut SigHashCache::new())
}

/// Same as [`verify`], reusing fork-id intermediates from `cache`.
pub fn verify_with_cache(
    signature: &[u8],
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    public_key: &[u8],
    cache: &mut SigHashCache,
) -> Result<bool> {
    let (&sighash_type, der) = signature
        .split_last()
        .ok_or_else(|| Error::BadData("Empty signature".to_string()))?;
    let mut sig = Signature::from_der(der).map_err(|e| Error::BadData(format!("Invalid DER signature: {}", e)))?;
    sig.normalize_s();
    let public_key = PublicKey::from_slice(public_key)?;
    let digest = sighash_with_cache(tx, n_input, spent_output, sighash_type, cache)?;
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(digest.0);
    match secp.verify_ecdsa(&message, &sig, &public_key) {
        Ok(()) => Ok(true),
        Err(e) => {
            debug!("signature for input {} does not verify: {}", n_input, e);
            Ok(false)
        }
    }
}
