// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Flag surface and wiring for the `block-harvester` binary.

use blob_sink::BlobWriter;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use url::Url;

use crate::{
    date::parse_date,
    encoder::RlpBlockEncoder,
    error::{ConfigError, HarvestError},
    harvest::{resolve_range, Harvester, Mode},
    probe::RpcProbe,
};

const MIB: u64 = 1 << 20;

/// Harvests a date range of blocks into fixed-size blob files.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Harvest blocks from this date on: `YYYY-MM-DD`, `now`, or a
    /// relative offset like `-12h`, `-30d`, `-2m`, `-1y`
    #[clap(long, default_value = "-30d", allow_hyphen_values = true)]
    pub start_date: String,

    /// Harvest blocks up to, but not including, this date
    #[clap(long, default_value = "now", allow_hyphen_values = true)]
    pub end_date: String,

    /// JSON-RPC endpoint of the execution-layer node
    #[clap(long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub url: Url,

    /// Sample random blocks from the range until this many MiB are
    /// written; 0 harvests the whole range in order instead
    #[clap(long, default_value_t = 0)]
    pub max: u64,

    /// Path prefix for the output files `{prefix}{index}.blob`
    #[clap(long, default_value = "blocks/")]
    pub out: String,

    /// Bytes per blob file
    #[clap(long, default_value_t = 131_072)]
    pub blobsize: u64,
}

/// Parses the command line and runs the harvest to completion.
///
/// Both dates and the blob size are checked before anything touches
/// the disk or the network; the index-0 blob file only appears once
/// the block range has resolved.
pub async fn run() -> Result<(), HarvestError> {
    // A missing .env file is fine; flags and the environment remain.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let now = Utc::now().timestamp().max(0) as u64;
    let start_ts = parse_date(&cli.start_date, now)?;
    let end_ts = parse_date(&cli.end_date, now)?;
    if cli.blobsize == 0 {
        return Err(ConfigError::ZeroBlobSize.into());
    }

    let probe = RpcProbe::connect(cli.url.clone());
    let range = resolve_range(&probe, start_ts, end_ts).await?;
    info!(
        url = %cli.url,
        start = range.start,
        end = range.end,
        "resolved the date window to a block range"
    );

    let mode = match cli.max {
        0 => Mode::Sequential,
        mib => Mode::Sampled {
            max_bytes: mib * MIB,
        },
    };
    let mut sink = BlobWriter::create(cli.out, cli.blobsize)?;
    let harvester = Harvester::new(probe, RlpBlockEncoder);
    harvester
        .harvest(range, mode, &mut sink, &mut rand::rng())
        .await?;
    sink.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn surface_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_flag_table() {
        let cli = Cli::try_parse_from(["block-harvester"]).unwrap();
        assert_eq!(cli.start_date, "-30d");
        assert_eq!(cli.end_date, "now");
        assert_eq!(cli.url.as_str(), "http://localhost:8545/");
        assert_eq!(cli.max, 0);
        assert_eq!(cli.out, "blocks/");
        assert_eq!(cli.blobsize, 131_072);
    }

    #[test]
    fn relative_dates_survive_the_leading_hyphen() {
        let cli = Cli::try_parse_from([
            "block-harvester",
            "--start-date",
            "-12h",
            "--end-date",
            "-1d",
        ])
        .unwrap();
        assert_eq!(cli.start_date, "-12h");
        assert_eq!(cli.end_date, "-1d");
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["block-harvester", "--frobnicate"]).is_err());
        assert!(Cli::try_parse_from(["block-harvester", "--max-size", "1"]).is_err());
    }

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(Cli::try_parse_from(["block-harvester", "--url", "not a url"]).is_err());
    }
}
