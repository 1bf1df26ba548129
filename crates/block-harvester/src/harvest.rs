// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::ops::Range;

use blob_sink::CountingWrite;
use rand::Rng;
use tracing::{debug, info};

use crate::{
    bisect::ceiling,
    encoder::BlockEncoder,
    error::{ConfigError, HarvestError, ProbeError},
    probe::ChainProbe,
    progress::ProgressReporter,
};

/// How the driver walks the resolved block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every block of the range, in ascending order.
    Sequential,
    /// Heights drawn uniformly at random, with replacement, until the
    /// sink has absorbed the byte budget.
    Sampled {
        /// Byte budget for the output stream.
        max_bytes: u64,
    },
}

/// Maps a date window to the half-open block range `[start, end)`.
///
/// Each bound resolves to the lowest height whose header timestamp is
/// at or above it. A bound before the chain's first block resolves to
/// height 0 and one past the head resolves to the head, so the head
/// block itself is never part of the range. The head is read once and
/// both searches run against it, costing O(log head) header fetches
/// each.
pub async fn resolve_range<P: ChainProbe>(
    probe: &P,
    start_ts: u64,
    end_ts: u64,
) -> Result<Range<u64>, HarvestError> {
    let head = probe.head_number().await?;
    let start = block_above(probe, head, start_ts).await?;
    let end = block_above(probe, head, end_ts).await?;
    debug!(head, start, end, "resolved date window to block heights");
    Ok(start..end)
}

async fn block_above<P: ChainProbe>(
    probe: &P,
    head: u64,
    target: u64,
) -> Result<u64, ProbeError> {
    ceiling(0, head, |number| async move {
        probe
            .header_timestamp(number)
            .await
            .map(|timestamp| timestamp.cmp(&target))
    })
    .await
}

/// Streams encoded blocks from a probe into a counting sink.
#[derive(Debug)]
pub struct Harvester<P, E> {
    probe: P,
    encoder: E,
}

impl<P: ChainProbe, E: BlockEncoder> Harvester<P, E> {
    /// Pairs a chain probe with a block encoder.
    pub fn new(probe: P, encoder: E) -> Self {
        Self { probe, encoder }
    }

    /// Runs the harvest over `range` in the given mode.
    ///
    /// The range must be well ordered; an inverted one is refused
    /// before the first fetch. Fetching is strictly one block at a
    /// time and the first failure of any kind ends the run with the
    /// sink holding every record completed so far.
    pub async fn harvest<W, R>(
        &self,
        range: Range<u64>,
        mode: Mode,
        sink: &mut W,
        rng: &mut R,
    ) -> Result<(), HarvestError>
    where
        W: CountingWrite,
        R: Rng,
    {
        if range.start > range.end {
            return Err(ConfigError::RangeInverted {
                start: range.start,
                end: range.end,
            }
            .into());
        }
        match mode {
            Mode::Sequential => self.sequential(range, sink).await,
            Mode::Sampled { max_bytes } => self.sampled(range, max_bytes, sink, rng).await,
        }
    }

    async fn sequential<W: CountingWrite>(
        &self,
        range: Range<u64>,
        sink: &mut W,
    ) -> Result<(), HarvestError> {
        let start = range.start;
        let total = range.end - range.start;
        info!(start, end = range.end, total, "harvesting block range");
        let mut progress = ProgressReporter::new(total, "blocks");
        for number in range {
            let block = self.probe.block_by_number(number).await?;
            self.encoder.encode_into(block, sink)?;
            progress.update(number - start);
        }
        Ok(())
    }

    async fn sampled<W, R>(
        &self,
        range: Range<u64>,
        max_bytes: u64,
        sink: &mut W,
        rng: &mut R,
    ) -> Result<(), HarvestError>
    where
        W: CountingWrite,
        R: Rng,
    {
        let span = range.end - range.start;
        if span == 0 {
            // Nothing to draw from; the rng is never consulted.
            return Ok(());
        }
        info!(
            start = range.start,
            end = range.end,
            max_bytes,
            "sampling blocks until the byte budget is met"
        );
        let mut progress = ProgressReporter::new(max_bytes, "bytes");
        while sink.written() < max_bytes {
            let number = range.start + rng.random_range(0..span);
            let block = self.probe.block_by_number(number).await?;
            self.encoder.encode_into(block, sink)?;
            progress.update(sink.written());
        }
        Ok(())
    }
}
