#![deny(missing_docs)]
#![deny(unsafe_code)]

/*! # bsvtx

Bitcoin SV transaction primitives: the consensus wire format for transactions and scripts,
signature-hash preimages in both the fork-id (BIP-143 style) and legacy algorithms, and ECDSA
signing and verification of transaction inputs.

## Usage
```
use bsvtx::messages::{Tx, TxIn, TxOut};
use bsvtx::transaction::sighash::{sighash, SIGHASH_DEFAULT};
use bsvtx::transaction::p2pkh;
use bsvtx::util::{Hash160, Serializable};

let tx = Tx { version: 1, inputs: vec![TxIn::default()], ..Default::default() };
let spent = TxOut { satoshis: 1000, lock_script: p2pkh::create_lock_script(&Hash160([1; 20])) };
let digest = sighash(&tx, 0, &spent, SIGHASH_DEFAULT).unwrap();
assert_eq!(Tx::from_bytes(&tx.to_bytes()).unwrap().0, tx);
# let _ = digest;
```

## Security
- No private key material is logged or retained beyond the signing call.
- Not a script interpreter; signature checks here do not replace consensus validation.
*/

pub mod messages;
pub mod script;
pub mod transaction;
pub mod util;

#[cfg(test)]
mod arbitrary;
