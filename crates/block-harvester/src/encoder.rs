// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use alloy_consensus::{Block as ConsensusBlock, BlockBody, TxEnvelope};
use alloy_rlp::Encodable;
use alloy_rpc_types_eth::{Block, BlockTransactions};

use crate::error::EncodeError;

/// Turns one block into one output record.
///
/// Implementations must hand the whole record to the sink in a single
/// write call. The blob sink only rolls files between writes, so one
/// write per record is what keeps records from straddling two files.
pub trait BlockEncoder {
    /// Encodes `block` and writes the record to `sink`.
    fn encode_into<W: Write>(&self, block: Block, sink: &mut W) -> Result<(), EncodeError>;
}

/// Encodes a block as a length-prefixed RLP record.
///
/// The record is a 4-byte big-endian length followed by the RLP
/// encoding of the consensus block, so a reader can skip from record
/// to record without parsing RLP. Encoding is deterministic: the same
/// block always yields the same bytes.
///
/// The RPC response must carry full transaction bodies. Ommer bodies
/// are not observable over JSON-RPC and are encoded as the empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlpBlockEncoder;

impl BlockEncoder for RlpBlockEncoder {
    fn encode_into<W: Write>(&self, block: Block, sink: &mut W) -> Result<(), EncodeError> {
        let number = block.header.inner.number;
        let transactions: Vec<TxEnvelope> = match block.transactions {
            BlockTransactions::Full(txs) => txs
                .into_iter()
                .map(|tx| {
                    let (envelope, _signer) = tx.inner.into_parts();
                    envelope
                })
                .collect(),
            _ => return Err(EncodeError::TransactionsNotFull { number }),
        };
        let consensus = ConsensusBlock {
            header: block.header.inner,
            body: BlockBody {
                transactions,
                ommers: Vec::new(),
                withdrawals: block.withdrawals,
            },
        };

        let body_len = consensus.length();
        let prefix = u32::try_from(body_len)
            .map_err(|_| EncodeError::RecordTooLarge { number })?
            .to_be_bytes();

        // One buffer, one write: the sink may roll files after this
        // record but never inside it.
        let mut record = Vec::with_capacity(4 + body_len);
        record.extend_from_slice(&prefix);
        consensus.encode(&mut record);
        sink.write_all(&record)?;
        Ok(())
    }
}
