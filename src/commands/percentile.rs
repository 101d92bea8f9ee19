//! Signal intensity percentile of a track.
//!
//! Values are counted on a quarter-unit histogram: each signal is scaled
//! by 4, rounded up, and clamped to `[0, MAX_INTENSITY * 4)`. The result is
//! the lowest histogram bin whose cumulative count reaches
//! `floor(records * percentile)`, divided back by 4.
//!
//! Typical use is picking a window cutoff from the track itself.

use crate::config::ConfigError;
use crate::wig::{open_input, Result, WigReader};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::io::Read;
use std::path::Path;

/// Histogram bins per signal unit.
pub const FINE_BIN_COUNT: u32 = 4;

/// Highest signal intensity the histogram resolves.
pub const MAX_INTENSITY: u32 = 1_000_000;

const MAX_FINE_BIN: u32 = MAX_INTENSITY * FINE_BIN_COUNT - 1;

/// Percentile command.
#[derive(Debug, Clone, Copy)]
pub struct PercentileCommand {
    percentile: f64,
}

impl PercentileCommand {
    /// `percentile` is a fraction in `[0, 1]`.
    pub fn new(percentile: f64) -> std::result::Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&percentile) {
            return Err(ConfigError::InvalidPercentile(percentile));
        }
        Ok(Self { percentile })
    }

    pub fn run<P: AsRef<Path>>(&self, input: P) -> Result<PercentileResult> {
        self.run_reader(open_input(input)?)
    }

    pub fn run_reader<R: Read>(&self, input: R) -> Result<PercentileResult> {
        let mut reader = WigReader::new(input);
        let mut histogram = IntensityHistogram::default();
        for record in reader.records() {
            histogram.add(record?.signal);
        }
        if let Some(line) = reader.truncated_at() {
            warn!("percentile: malformed line {} ended the input early", line);
        }
        debug!(
            "percentile: {} values in {} histogram bins",
            histogram.total,
            histogram.counts.len()
        );

        Ok(PercentileResult {
            percentile: self.percentile,
            value: histogram.percentile(self.percentile),
            records: histogram.total,
        })
    }
}

/// Result of a percentile run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileResult {
    pub percentile: f64,
    pub value: f32,
    pub records: u64,
}

impl std::fmt::Display for PercentileResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "p{} = {} over {} records",
            self.percentile, self.value, self.records
        )
    }
}

/// Sparse quarter-unit histogram of signal values.
#[derive(Debug, Default)]
struct IntensityHistogram {
    counts: FxHashMap<u32, u64>,
    total: u64,
}

impl IntensityHistogram {
    fn add(&mut self, signal: f32) {
        if signal.is_nan() {
            return;
        }
        let scaled = (signal as f64 * FINE_BIN_COUNT as f64).ceil();
        let bin = scaled.clamp(0.0, MAX_FINE_BIN as f64) as u32;
        *self.counts.entry(bin).or_insert(0) += 1;
        self.total += 1;
    }

    fn percentile(&self, percentile: f64) -> f32 {
        let target = (self.total as f64 * percentile) as u64;
        if target == 0 {
            return 0.0;
        }

        let mut bins: Vec<(u32, u64)> = self.counts.iter().map(|(&b, &c)| (b, c)).collect();
        bins.sort_unstable_by_key(|&(b, _)| b);

        let mut running = 0u64;
        for (bin, count) in bins {
            running += count;
            if running >= target {
                return bin as f32 / FINE_BIN_COUNT as f32;
            }
        }
        0.0
    }
}
