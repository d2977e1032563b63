//! Transaction sighash computation for signing.
//!
//! Supports the legacy algorithm and the BIP-143 style algorithm selected by `SIGHASH_FORKID`.
//! The two deliberately differ on SIGHASH_SINGLE when the signed input has no matching output:
//! legacy fails with [`Error::SingleOutputOutOfRange`] while fork-id hashes every output as
//! SIGHASH_ALL would. Both behaviors are relied on downstream and must not be unified.
use crate::messages::{OutPoint, Tx, TxIn, TxOut};
use crate::script::op_codes::OP_CODESEPARATOR;
use crate::script::Script;
use crate::util::{Error, Hash256, Result, Serializable, sha256d};
use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, trace};

/// 24-bit fork identifier placed above the flag byte in the fork-id trailer. Zero for BSV.
pub const FORK_ID: u32 = 0;

/// Signs all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs.
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only the output at the signed input's index.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Selects the BIP-143 style algorithm.
pub const SIGHASH_FORKID: u8 = 0x40;
/// Signs only the signed input, letting anyone add others.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;
/// Flag used when a caller has no reason to pick another.
pub const SIGHASH_DEFAULT: u8 = SIGHASH_ALL | SIGHASH_FORKID;

const BASE_TYPE_MASK: u8 = 0x1f;
const ZERO_HASH: [u8; 32] = [0; 32];

/// Which outputs a signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Every output.
    All,
    /// No outputs.
    None,
    /// The output at the signed input's index.
    Single,
}

/// A sighash flag byte decomposed once into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SigHashType {
    raw: u8,
    base: BaseType,
    fork_id: bool,
    anyone_can_pay: bool,
}

impl SigHashType {
    /// Decomposes a flag byte.
    ///
    /// # Errors
    /// `Error::InvalidSigHashType` if the low five bits are not ALL, NONE or SINGLE.
    pub fn from_u8(flag: u8) -> Result<SigHashType> {
        let base = match flag & BASE_TYPE_MASK {
            SIGHASH_ALL => BaseType::All,
            SIGHASH_NONE => BaseType::None,
            SIGHASH_SINGLE => BaseType::Single,
            _ => return Err(Error::InvalidSigHashType(flag)),
        };
        Ok(SigHashType {
            raw: flag,
            base,
            fork_id: flag & SIGHASH_FORKID != 0,
            anyone_can_pay: flag & SIGHASH_ANYONECANPAY != 0,
        })
    }

    /// Returns the original flag byte, including any bits not interpreted here.
    #[must_use]
    #[inline]
    pub fn to_u8(self) -> u8 {
        self.raw
    }

    /// Returns the base type.
    #[must_use]
    #[inline]
    pub fn base(self) -> BaseType {
        self.base
    }

    /// Returns whether the fork-id algorithm is selected.
    #[must_use]
    #[inline]
    pub fn fork_id(self) -> bool {
        self.fork_id
    }

    /// Returns whether only the signed input is covered.
    #[must_use]
    #[inline]
    pub fn anyone_can_pay(self) -> bool {
        self.anyone_can_pay
    }
}

impl TryFrom<u8> for SigHashType {
    type Error = Error;

    fn try_from(flag: u8) -> Result<Self> {
        SigHashType::from_u8(flag)
    }
}

/// Cache for fork-id sighash intermediates of one transaction.
///
/// The prevouts, sequence and all-outputs hashes depend only on the transaction, so one cache
/// reused while signing every input turns O(n^2) hashing into O(n). A cache must not be shared
/// between different transactions.
#[derive(Default, Debug, Clone)]
pub struct SigHashCache {
    hash_prevouts: Option<Hash256>,
    hash_sequence: Option<Hash256>,
    hash_outputs: Option<Hash256>,
}

impl SigHashCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_prevouts(&mut self, tx: &Tx) -> Result<Hash256> {
        if let Some(h) = self.hash_prevouts {
            return Ok(h);
        }
        let mut prevouts = Vec::with_capacity(OutPoint::SIZE * tx.inputs.len());
        for input in &tx.inputs {
            input.prev_output.write(&mut prevouts)?;
        }
        let h = sha256d(&prevouts);
        self.hash_prevouts = Some(h);
        Ok(h)
    }

    fn hash_sequence(&mut self, tx: &Tx) -> Result<Hash256> {
        if let Some(h) = self.hash_sequence {
            return Ok(h);
        }
        let mut sequences = Vec::with_capacity(4 * tx.inputs.len());
        for input in &tx.inputs {
            sequences.write_u32::<LittleEndian>(input.sequence)?;
        }
        let h = sha256d(&sequences);
        self.hash_sequence = Some(h);
        Ok(h)
    }

    fn hash_outputs(&mut self, tx: &Tx) -> Result<Hash256> {
        if let Some(h) = self.hash_outputs {
            return Ok(h);
        }
        let mut outputs = Vec::with_capacity(tx.outputs.iter().map(TxOut::size).sum());
        for output in &tx.outputs {
            output.write(&mut outputs)?;
        }
        let h = sha256d(&outputs);
        self.hash_outputs = Some(h);
        Ok(h)
    }
}

/// Builds the bytes hashed to produce the sighash for input `n_input`.
///
/// # Errors
/// `Error::InputOutOfRange`, `Error::InvalidSigHashType`, or, on the legacy path,
/// `Error::SingleOutputOutOfRange`.
pub fn preimage(tx: &Tx, n_input: usize, spent_output: &TxOut, sighash_type: u8) -> Result<Vec<u8>> {
    preimage_with_cache(tx, n_input, spent_output, sighash_type, &mut SigHashCache::new())
}

/// Same as [`preimage`], reusing fork-id intermediates from `cache`.
pub fn preimage_with_cache(
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Vec<u8>> {
    if n_input >= tx.inputs.len() {
        return Err(Error::InputOutOfRange {
            index: n_input,
            inputs: tx.inputs.len(),
        });
    }
    let flag = SigHashType::from_u8(sighash_type)?;
    let s = if flag.fork_id() {
        debug!("fork-id preimage for input {} with {:?}", n_input, flag);
        bip143_preimage(tx, n_input, spent_output, flag, cache)?
    } else {
        debug!("legacy preimage for input {} with {:?}", n_input, flag);
        legacy_preimage(tx, n_input, spent_output, flag)?
    };
    trace!("preimage is {} bytes", s.len());
    Ok(s)
}

/// Computes the sighash digest for input `n_input` spending `spent_output`.
///
/// Uses the fork-id algorithm if `SIGHASH_FORKID` is set, legacy otherwise.
///
/// # Errors
/// Same as [`preimage`].
///
/// # Examples
/// ```
/// use bsvtx::messages::{Tx, TxIn, TxOut};
/// use bsvtx::transaction::sighash::{sighash, SIGHASH_ALL, SIGHASH_FORKID};
///
/// let tx = Tx { inputs: vec![TxIn::default()], ..Default::default() };
/// let spent = TxOut { satoshis: 1000, ..Default::default() };
/// let digest = sighash(&tx, 0, &spent, SIGHASH_ALL | SIGHASH_FORKID).unwrap();
/// assert_eq!(digest, sighash(&tx, 0, &spent, SIGHASH_ALL | SIGHASH_FORKID).unwrap());
/// ```
pub fn sighash(tx: &Tx, n_input: usize, spent_output: &TxOut, sighash_type: u8) -> Result<Hash256> {
    sighash_with_cache(tx, n_input, spent_output, sighash_type, &mut SigHashCache::new())
}

/// Same as [`sighash`], reusing fork-id intermediates from `cache`.
pub fn sighash_with_cache(
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    let s = preimage_with_cache(tx, n_input, spent_output, sighash_type, cache)?;
    let h = sha256d(&s);
    trace!("sighash for input {} is {:?}", n_input, h);
    Ok(h)
}

/// BIP-143 style preimage.
///
/// version | hash_prevouts | hash_sequence | outpoint | script | value | sequence | hash_outputs | locktime | type
fn bip143_preimage(
    tx: &Tx,
    n_input: usize,
    spent_output: &TxOut,
    flag: SigHashType,
    cache: &mut SigHashCache,
) -> Result<Vec<u8>> {
    let input = &tx.inputs[n_input];
    let mut s = Vec::with_capacity(156 + spent_output.lock_script.size());
    s.write_i32::<LittleEndian>(tx.version)?;

    if flag.anyone_can_pay() {
        s.extend_from_slice(&ZERO_HASH);
    } else {
        s.extend_from_slice(&cache.hash_prevouts(tx)?.0);
    }

    if !flag.anyone_can_pay() && flag.base() == BaseType::All {
        s.extend_from_slice(&cache.hash_sequence(tx)?.0);
    } else {
        s.extend_from_slice(&ZERO_HASH);
    }

    input.prev_output.write(&mut s)?;
    spent_output.lock_script.write(&mut s)?;
    s.write_i64::<LittleEndian>(spent_output.satoshis)?;
    s.write_u32::<LittleEndian>(input.sequence)?;

    match flag.base() {
        BaseType::Single if n_input < tx.outputs.len() => {
            s.extend_from_slice(&sha256d(&tx.outputs[n_input].to_bytes()).0);
        }
        BaseType::None => s.extend_from_slice(&ZERO_HASH),
        // ALL, and SINGLE without a matching output.
        _ => s.extend_from_slice(&cache.hash_outputs(tx)?.0),
    }

    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>((FORK_ID << 8) | u32::from(flag.to_u8()))?;
    Ok(s)
}

/// Legacy preimage: a derived copy of the transaction followed by the flag as 4 bytes.
fn legacy_preimage(tx: &Tx, n_input: usize, spent_output: &TxOut, flag: SigHashType) -> Result<Vec<u8>> {
    let outputs = match flag.base() {
        BaseType::None => Vec::new(),
        BaseType::Single => {
            if n_input >= tx.outputs.len() {
                return Err(Error::SingleOutputOutOfRange {
                    index: n_input,
                    outputs: tx.outputs.len(),
                });
            }
            let mut outputs = vec![TxOut::sighash_single_placeholder(); n_input];
            outputs.push(tx.outputs[n_input].clone());
            outputs
        }
        BaseType::All => tx.outputs.clone(),
    };

    let sub_script = spent_output.lock_script.remove_op(OP_CODESEPARATOR);
    let zero_other_sequences = matches!(flag.base(), BaseType::None | BaseType::Single);
    let inputs = tx
        .inputs
        .iter()
        .enumerate()
        .filter(|(i, _)| !flag.anyone_can_pay() || *i == n_input)
        .map(|(i, input)| {
            let signed = i == n_input;
            TxIn {
                prev_output: input.prev_output.clone(),
                unlock_script: if signed { sub_script.clone() } else { Script::new() },
                sequence: if !signed && zero_other_sequences { 0 } else { input.sequence },
            }
        })
        .collect();

    let derived = Tx {
        version: tx.version,
        inputs,
        outputs,
        lock_time: tx.lock_time,
    };
    let mut s = Vec::with_capacity(derived.size() + 4);
    derived.write(&mut s)?;
    s.write_u32::<LittleEndian>(u32::from(flag.to_u8()))?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::arb_tx;
    use crate::script::op_codes::*;
    use crate::script::Chunk;
    use crate::transaction::p2pkh;
    use crate::util::Hash160;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn p2pkh_out(satoshis: i64, hash: [u8; 20]) -> TxOut {
        TxOut {
            satoshis,
            lock_script: p2pkh::create_lock_script(&Hash160(hash)),
        }
    }

    /// Three inputs, two outputs; the third input has no matching output.
    fn sample_tx() -> Tx {
        Tx {
            version: 2,
            inputs: vec![
                TxIn {
                    prev_output: OutPoint {
                        hash: Hash256([1; 32]),
                        index: 0,
                    },
                    unlock_script: Script(vec![Chunk::Push(vec![0xaa; 3])]),
                    sequence: 0xfffffffe,
                },
                TxIn {
                    prev_output: OutPoint {
                        hash: Hash256([2; 32]),
                        index: 5,
                    },
                    unlock_script: Script::new(),
                    sequence: 7,
                },
                TxIn {
                    prev_output: OutPoint {
                        hash: Hash256([3; 32]),
                        index: 1,
                    },
                    unlock_script: Script::new(),
                    sequence: 0xffffffff,
                },
            ],
            outputs: vec![
                p2pkh_out(1000, [0x11; 20]),
                TxOut {
                    satoshis: 2500,
                    lock_script: Script(vec![Chunk::Op(OP_RETURN), Chunk::Push(b"hi".to_vec())]),
                },
            ],
            lock_time: 500,
        }
    }

    fn spent() -> TxOut {
        p2pkh_out(5000, [0x22; 20])
    }

    fn digest(tx: &Tx, n_input: usize, flag: u8) -> String {
        hex::encode(sighash(tx, n_input, &spent(), flag).unwrap().0)
    }

    #[test]
    fn bip143_sighash_test() -> Result<()> {
        let lock_script = Script::decode(&hex!("76a91402b74813b047606b4b3fbdfb1a6e8e053fdb8dab88ac"))?;
        let tx = Tx {
            version: 2,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256::decode("f671dc000ad12795e86b59b27e0c367d9b026bbd4141c227b9285867a53bb6f7")?,
                    index: 0,
                },
                unlock_script: Script::new(),
                sequence: 0,
            }],
            outputs: vec![
                TxOut {
                    satoshis: 100,
                    lock_script: lock_script.clone(),
                },
                TxOut {
                    satoshis: 259899900,
                    lock_script: lock_script.clone(),
                },
            ],
            lock_time: 0,
        };
        let spent = TxOut {
            satoshis: 260000000,
            lock_script,
        };
        let mut cache = SigHashCache::new();
        let sighash = sighash_with_cache(&tx, 0, &spent, SIGHASH_ALL | SIGHASH_FORKID, &mut cache)?;
        let expected = "1e2121837829018daf3aeadab76f1a542c49a3600ded7bd74323ee74ce0d840c";
        assert_eq!(hex::encode(sighash.0), expected);
        assert!(cache.hash_prevouts.is_some());
        assert!(cache.hash_sequence.is_some());
        assert!(cache.hash_outputs.is_some());
        Ok(())
    }

    #[test]
    fn legacy_sighash_test() -> Result<()> {
        let tx = Tx {
            version: 1,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256::decode("bf6c1139ea01ca054b8d00aa0a088daaeab4f3b8e111626c6be7d603a9dd8dff")?,
                    index: 0,
                },
                unlock_script: Script::new(),
                sequence: 0xffffffff,
            }],
            outputs: vec![TxOut {
                satoshis: 49990000,
                lock_script: Script::decode(&hex!("76a9147865b0b301119fc3eadc7f3406ff1339908e46d488ac"))?,
            }],
            lock_time: 0,
        };
        let spent = TxOut {
            satoshis: 50000000,
            lock_script: Script::decode(&hex!("76a914d951eb562f1ff26b6cbe89f04eda365ea6bd95ce88ac"))?,
        };
        let sighash = sighash(&tx, 0, &spent, SIGHASH_ALL)?;
        let expected = "ad16084eccf26464a84c5ee2f8b96b4daff9a3154ac3c1b320346aed042abe57";
        assert_eq!(hex::encode(sighash.0), expected);
        Ok(())
    }

    #[test]
    fn legacy_flag_variants() {
        let tx = sample_tx();
        assert_eq!(digest(&tx, 0, SIGHASH_ALL), "a117d8106ba208ea0b575350b9b24c97cac677df253336ff1ded8f8330aa7b22");
        assert_eq!(digest(&tx, 1, SIGHASH_SINGLE), "0d887f2b58d6c43d191a97af17bb5ff3ac323bb2c01caf3a9d47ed5402c9e59d");
        assert_eq!(
            digest(&tx, 0, SIGHASH_NONE | SIGHASH_ANYONECANPAY),
            "70f8c1a2496d8dcefe62ea038b31c977f26d03d75f5feb9e3dcdb266110041cc"
        );
        assert_eq!(
            digest(&tx, 0, SIGHASH_SINGLE | SIGHASH_ANYONECANPAY),
            "8394afbcd3d2cd7681a3e83e8a07b1a7a4b3ecc393227cde2e30f5909c6ca1e6"
        );
    }

    #[test]
    fn fork_id_flag_variants() {
        let tx = sample_tx();
        assert_eq!(digest(&tx, 0, SIGHASH_DEFAULT), "38728f686b4278999a84ec1ad1d2544222ac706dab6e0506a25cf45854218f87");
        assert_eq!(
            digest(&tx, 1, SIGHASH_SINGLE | SIGHASH_FORKID | SIGHASH_ANYONECANPAY),
            "f4289810810d443a4d84c2777402b3af3e45c57a43a164412f472763030e7064"
        );
        assert_eq!(
            digest(&tx, 0, SIGHASH_NONE | SIGHASH_FORKID),
            "1695840ca89c5f2c2634ddfb0a6678b313a88092b2ee10fbe932fab846fa0b35"
        );
        assert_eq!(
            digest(&tx, 1, SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY),
            "198d90668934e15faa94817ff0d3ff96b676c7af18463ef36d13edc43eea90cc"
        );
    }

    #[test]
    fn fork_id_preimage_layout() {
        let tx = sample_tx();
        let s = preimage(&tx, 1, &spent(), SIGHASH_DEFAULT).unwrap();
        // 4 + 32 + 32 + 36 + (1 + 25) + 8 + 4 + 32 + 4 + 4
        assert_eq!(s.len(), 182);
        assert_eq!(&s[..4], &[2, 0, 0, 0]);
        assert_eq!(&s[68..104], &tx.inputs[1].prev_output.to_bytes()[..]);
        assert_eq!(&s[104..130], &spent().lock_script.to_bytes()[..]);
        assert_eq!(&s[130..138], &5000i64.to_le_bytes());
        assert_eq!(&s[138..142], &[7, 0, 0, 0]);
        assert_eq!(&s[174..178], &500u32.to_le_bytes());
        assert_eq!(&s[178..], &[0x41, 0, 0, 0]);
    }

    #[test]
    fn anyone_can_pay_zeroes_prevouts_and_sequence() {
        let tx = sample_tx();
        let s = preimage(&tx, 0, &spent(), SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY).unwrap();
        assert_eq!(&s[4..36], &ZERO_HASH);
        assert_eq!(&s[36..68], &ZERO_HASH);
        let mut other = tx.clone();
        other.inputs[1].prev_output.index = 99;
        other.inputs[2].sequence = 1;
        let flag = SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY;
        assert_eq!(sighash(&tx, 0, &spent(), flag).unwrap(), sighash(&other, 0, &spent(), flag).unwrap());
    }

    #[test]
    fn none_zeroes_outputs_hash() {
        let tx = sample_tx();
        let s = preimage(&tx, 0, &spent(), SIGHASH_NONE | SIGHASH_FORKID).unwrap();
        let n = s.len();
        assert_eq!(&s[n - 40..n - 8], &ZERO_HASH);
        assert_eq!(&s[36..68], &ZERO_HASH);
        assert_ne!(&s[4..36], &ZERO_HASH);
    }

    #[test]
    fn single_out_of_range_diverges() {
        let tx = sample_tx();
        // Legacy refuses to sign input 2: there is no output 2.
        let err = sighash(&tx, 2, &spent(), SIGHASH_SINGLE).unwrap_err();
        assert_eq!(err.to_string(), "SIGHASH_SINGLE input 2 has no matching output (2 outputs)");
        assert!(!err.is_decode_error());
        // Fork-id falls back to hashing every output, as SIGHASH_ALL does.
        let single = preimage(&tx, 2, &spent(), SIGHASH_SINGLE | SIGHASH_FORKID).unwrap();
        let all = preimage(&tx, 2, &spent(), SIGHASH_ALL | SIGHASH_FORKID).unwrap();
        let n = single.len();
        assert_eq!(&single[n - 40..n - 8], &all[n - 40..n - 8]);
        assert_eq!(&single[36..68], &ZERO_HASH);
        assert_eq!(digest(&tx, 2, SIGHASH_SINGLE | SIGHASH_FORKID), "f9482670a35b46f126341e228b7bd9b357cd955f2a3e162f9be32cc7da1a87f9");
    }

    #[test]
    fn legacy_single_blanks_earlier_outputs() {
        let tx = sample_tx();
        let s = preimage(&tx, 1, &spent(), SIGHASH_SINGLE).unwrap();
        let (derived, rest) = Tx::from_bytes(&s).unwrap();
        assert_eq!(rest, &[SIGHASH_SINGLE, 0, 0, 0]);
        assert_eq!(derived.outputs, vec![TxOut::sighash_single_placeholder(), tx.outputs[1].clone()]);
        assert_eq!(derived.inputs[0].sequence, 0);
        assert_eq!(derived.inputs[1].sequence, 7);
        assert_eq!(derived.inputs[2].sequence, 0);
        assert!(derived.inputs[0].unlock_script.is_empty());
        assert_eq!(derived.inputs[1].unlock_script, spent().lock_script);
    }

    #[test]
    fn legacy_anyone_can_pay_keeps_only_signed_input() {
        let tx = sample_tx();
        let s = preimage(&tx, 2, &spent(), SIGHASH_ALL | SIGHASH_ANYONECANPAY).unwrap();
        let (derived, _) = Tx::from_bytes(&s).unwrap();
        assert_eq!(derived.inputs.len(), 1);
        assert_eq!(derived.inputs[0].prev_output, tx.inputs[2].prev_output);
        assert_eq!(derived.inputs[0].sequence, 0xffffffff);
        assert_eq!(derived.outputs, tx.outputs);
    }

    #[test]
    fn other_unlock_scripts_do_not_matter() {
        let tx = sample_tx();
        let mut other = tx.clone();
        other.inputs[1].unlock_script = Script(vec![Chunk::Push(vec![9; 72]), Chunk::Push(vec![2; 33])]);
        for flag in [SIGHASH_ALL, SIGHASH_NONE, SIGHASH_SINGLE, SIGHASH_DEFAULT, SIGHASH_SINGLE | SIGHASH_FORKID] {
            assert_eq!(
                sighash(&tx, 0, &spent(), flag).unwrap(),
                sighash(&other, 0, &spent(), flag).unwrap(),
                "flag {:#04x}",
                flag
            );
        }
    }

    #[test]
    fn code_separator_stripped_only_in_legacy() {
        let tx = sample_tx();
        let mut with_separator = spent();
        with_separator.lock_script.0.insert(2, Chunk::Op(OP_CODESEPARATOR));
        assert_eq!(
            sighash(&tx, 0, &spent(), SIGHASH_ALL).unwrap(),
            sighash(&tx, 0, &with_separator, SIGHASH_ALL).unwrap()
        );
        assert_ne!(
            sighash(&tx, 0, &spent(), SIGHASH_DEFAULT).unwrap(),
            sighash(&tx, 0, &with_separator, SIGHASH_DEFAULT).unwrap()
        );
    }

    #[test]
    fn spent_value_only_matters_for_fork_id() {
        let tx = sample_tx();
        let mut richer = spent();
        richer.satoshis += 1;
        assert_eq!(sighash(&tx, 0, &spent(), SIGHASH_ALL).unwrap(), sighash(&tx, 0, &richer, SIGHASH_ALL).unwrap());
        assert_ne!(sighash(&tx, 0, &spent(), SIGHASH_DEFAULT).unwrap(), sighash(&tx, 0, &richer, SIGHASH_DEFAULT).unwrap());
    }

    #[test]
    fn input_out_of_range() {
        let tx = sample_tx();
        for flag in [SIGHASH_ALL, SIGHASH_DEFAULT] {
            let err = sighash(&tx, 3, &spent(), flag).unwrap_err();
            assert_eq!(err.to_string(), "Input index 3 out of range for 3 inputs");
        }
    }

    #[test]
    fn invalid_flags_rejected() {
        let tx = sample_tx();
        for flag in [0x00, 0x04, 0x1f, SIGHASH_FORKID, SIGHASH_ANYONECANPAY | 0x05] {
            match sighash(&tx, 0, &spent(), flag) {
                Err(Error::InvalidSigHashType(f)) => assert_eq!(f, flag),
                other => panic!("flag {:#04x} gave {:?}", flag, other),
            }
        }
    }

    #[test]
    fn flag_decomposition() {
        let t = SigHashType::from_u8(SIGHASH_SINGLE | SIGHASH_FORKID | SIGHASH_ANYONECANPAY).unwrap();
        assert_eq!(t.base(), BaseType::Single);
        assert!(t.fork_id());
        assert!(t.anyone_can_pay());
        assert_eq!(t.to_u8(), 0xc3);
        // Bit 5 is outside the base mask and kept verbatim.
        let t = SigHashType::try_from(0x21).unwrap();
        assert_eq!(t.base(), BaseType::All);
        assert!(!t.fork_id());
        assert_eq!(t.to_u8(), 0x21);
        assert_eq!(SIGHASH_DEFAULT, 0x41);
    }

    #[test]
    fn unknown_bits_reach_the_trailer() {
        let tx = sample_tx();
        let s = preimage(&tx, 0, &spent(), 0x61).unwrap();
        assert_eq!(&s[s.len() - 4..], &[0x61, 0, 0, 0]);
        let s = preimage(&tx, 0, &spent(), 0x21).unwrap();
        assert_eq!(&s[s.len() - 4..], &[0x21, 0, 0, 0]);
    }

    #[test]
    fn cache_matches_fresh_computation() {
        let tx = sample_tx();
        let mut cache = SigHashCache::new();
        for n_input in 0..tx.inputs.len() {
            for flag in [SIGHASH_DEFAULT, SIGHASH_NONE | SIGHASH_FORKID, SIGHASH_SINGLE | SIGHASH_FORKID] {
                assert_eq!(
                    sighash_with_cache(&tx, n_input, &spent(), flag, &mut cache).unwrap(),
                    sighash(&tx, n_input, &spent(), flag).unwrap()
                );
            }
        }
    }

    proptest! {
        #[test]
        fn deterministic(tx in arb_tx(), flag in prop::sample::select(vec![0x01u8, 0x02, 0x41, 0x42, 0x43, 0x81, 0xc1, 0xc2, 0xc3])) {
            prop_assume!(!tx.inputs.is_empty());
            let first = sighash(&tx, 0, &spent(), flag);
            let second = sighash(&tx, 0, &spent(), flag);
            prop_assert_eq!(first.unwrap(), second.unwrap());
        }
    }
}
