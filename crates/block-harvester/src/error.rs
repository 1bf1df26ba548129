// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Date expression that matches none of the accepted forms.
///
/// Accepted forms are `now`, an absolute `YYYY-MM-DD`, and a relative
/// offset like `-12h` or `-30d`.
#[derive(Debug, Error)]
#[error("invalid date expression: {input:?}")]
pub struct DateFormatError {
    /// The expression that failed to parse.
    pub input: String,
}

/// Rejected flag values and inconsistent resolved ranges.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The end date resolved to a height below the start date.
    #[error("block range is inverted: start {start} is above end {end}")]
    RangeInverted {
        /// First height of the range.
        start: u64,
        /// Past-the-end height of the range.
        end: u64,
    },

    /// A blob size of zero can never absorb a record.
    #[error("blob size must be at least one byte")]
    ZeroBlobSize,
}

/// Chain probe failures. All of them end the run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The node has no block at a height it advertised.
    #[error("block {number} not found on the node")]
    BlockNotFound {
        /// Block number.
        number: u64,
    },

    /// [alloy_transport] library error.
    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy_transport::TransportError),
}

/// Failures while turning a block into an output record.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// [std::io] library error while writing a record to the sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoded block does not fit the u32 record length prefix.
    #[error("block {number} encodes past the record size limit")]
    RecordTooLarge {
        /// Block number.
        number: u64,
    },

    /// The block was fetched with transaction hashes instead of full
    /// transaction bodies.
    #[error("block {number} carries no full transaction bodies")]
    TransactionsNotFull {
        /// Block number.
        number: u64,
    },
}

/// Everything that can end a harvest run early.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Invalid flag value or resolved block range.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid date expression.
    #[error("date error: {0}")]
    Date(#[from] DateFormatError),

    /// Block could not be encoded or written.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// [std::io] library error on the output sink itself.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chain probe call failed.
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),
}
