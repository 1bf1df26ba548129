// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt,
    io::{self, Write},
    time::{Duration, Instant},
};

use chrono::Local;

/// A quiet stretch longer than this forces a line out even when the
/// percentage has not moved.
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Emits `{timestamp} {pct}% of {unit} ({current}/{total})` lines on
/// stdout as a long harvest advances.
///
/// A line goes out when the integer percentage changes, or when more
/// than thirty seconds have passed since the last one went out. With a
/// `total` of zero the reporter stays silent. Progress is cosmetic:
/// stdout write failures are swallowed and never end the run.
#[derive(Debug)]
pub struct ProgressReporter {
    total: u64,
    unit: &'static str,
    last_pct: Option<u64>,
    last_emit: Option<Instant>,
}

impl ProgressReporter {
    /// Reporter for a run that totals `total` of `unit`.
    pub fn new(total: u64, unit: &'static str) -> Self {
        Self {
            total,
            unit,
            last_pct: None,
            last_emit: None,
        }
    }

    /// Records that `current` of the total is done, emitting a line if
    /// it is due.
    pub fn update(&mut self, current: u64) {
        if self.total == 0 {
            return;
        }
        let pct = 100 * current / self.total;
        let now = Instant::now();
        if !self.should_emit(pct, now) {
            return;
        }
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(
            io::stdout(),
            "{}",
            line(stamp, pct, self.unit, current, self.total)
        );
        self.last_pct = Some(pct);
        self.last_emit = Some(now);
    }

    fn should_emit(&self, pct: u64, now: Instant) -> bool {
        if self.last_pct != Some(pct) {
            return true;
        }
        match self.last_emit {
            Some(at) => now.duration_since(at) > REPORT_INTERVAL,
            None => true,
        }
    }
}

fn line(timestamp: impl fmt::Display, pct: u64, unit: &str, current: u64, total: u64) -> String {
    format!("{timestamp} {pct}% of {unit} ({current}/{total})")
}
