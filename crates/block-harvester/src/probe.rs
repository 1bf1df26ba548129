// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_eips::BlockNumberOrTag;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::ClientBuilder;
use alloy_rpc_types_eth::Block;
use async_trait::async_trait;
use url::Url;

use crate::error::ProbeError;

/// Read-only view of an execution-layer chain.
///
/// The driver and the range resolver go through this seam, so tests
/// can stand in an in-memory chain. Implementations do not retry:
/// every failure surfaces to the caller and ends the run.
#[async_trait]
pub trait ChainProbe {
    /// Number of the latest block the node knows about.
    async fn head_number(&self) -> Result<u64, ProbeError>;

    /// Timestamp of the header at `number`, without the block body.
    async fn header_timestamp(&self, number: u64) -> Result<u64, ProbeError>;

    /// The block at `number` with full transaction bodies.
    async fn block_by_number(&self, number: u64) -> Result<Block, ProbeError>;
}

/// [`ChainProbe`] over a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcProbe {
    provider: RootProvider,
}

impl RpcProbe {
    /// Connects to the node at `url`.
    ///
    /// No request leaves before the first probe call, so this cannot
    /// fail; an unreachable node shows up as a transport error there.
    pub fn connect(url: Url) -> Self {
        let client = ClientBuilder::default().http(url);
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_client(client);
        Self { provider }
    }
}

#[async_trait]
impl ChainProbe for RpcProbe {
    async fn head_number(&self) -> Result<u64, ProbeError> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn header_timestamp(&self, number: u64) -> Result<u64, ProbeError> {
        // Hashes-only call: the header is all the search compares.
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?
            .ok_or(ProbeError::BlockNotFound { number })?;
        Ok(block.header.inner.timestamp)
    }

    async fn block_by_number(&self, number: u64) -> Result<Block, ProbeError> {
        self.provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await?
            .ok_or(ProbeError::BlockNotFound { number })
    }
}
