//! Proptest strategies for the transaction records.

use crate::messages::{OutPoint, Tx, TxIn, TxOut};
use crate::script::{op_codes, Chunk, Script};
use crate::util::Hash256;
use proptest::prelude::*;

pub(crate) fn arb_chunk() -> impl Strategy<Value = Chunk> {
    prop_oneof![
        3 => any::<u8>().prop_filter("push prefix", |op| !op_codes::is_push(*op)).prop_map(Chunk::Op),
        2 => prop::collection::vec(any::<u8>(), 1..80).prop_map(Chunk::Push),
        1 => prop::collection::vec(any::<u8>(), 200..300).prop_map(Chunk::Push),
        1 => (
            prop::sample::select(vec![op_codes::OP_PUSHDATA1, op_codes::OP_PUSHDATA2, op_codes::OP_PUSHDATA4]),
            prop::collection::vec(any::<u8>(), 0..76),
        )
            .prop_map(|(prefix, data)| Chunk::PushData(prefix, data)),
    ]
}

pub(crate) fn arb_script() -> impl Strategy<Value = Script> {
    prop::collection::vec(arb_chunk(), 0..12).prop_map(Script)
}

pub(crate) fn arb_out_point() -> impl Strategy<Value = OutPoint> {
    (any::<[u8; 32]>(), any::<u32>()).prop_map(|(hash, index)| OutPoint {
        hash: Hash256(hash),
        index,
    })
}

pub(crate) fn arb_tx_in() -> impl Strategy<Value = TxIn> {
    (arb_out_point(), arb_script(), any::<u32>()).prop_map(|(prev_output, unlock_script, sequence)| TxIn {
        prev_output,
        unlock_script,
        sequence,
    })
}

pub(crate) fn arb_tx_out() -> impl Strategy<Value = TxOut> {
    (any::<i64>(), arb_script()).prop_map(|(satoshis, lock_script)| TxOut {
        satoshis,
        lock_script,
    })
}

pub(crate) fn arb_tx() -> impl Strategy<Value = Tx> {
    (
        any::<i32>(),
        prop::collection::vec(arb_tx_in(), 0..5),
        prop::collection::vec(arb_tx_out(), 0..5),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
}
