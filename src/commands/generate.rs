//! Generate synthetic WIG tracks.
//!
//! Produces a two-line header followed by evenly spaced
//! `<position>\t<signal>` records: low uniform background noise with
//! triangular peaks at random places, and optionally dropped records to
//! create coverage gaps. Output is fully determined by the seed.

use crate::config::ConfigError;
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use crate::wig::Result;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::{BufWriter, Write};

/// Configuration for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub chrom: String,
    /// Number of positions visited (dropped ones included).
    pub records: u64,
    pub start: u64,
    /// Distance between consecutive positions; normally the bin size.
    pub step: u64,
    pub seed: u64,
    /// Background noise is uniform in `[0, baseline)`.
    pub baseline: f32,
    /// Chance that a peak starts at any position outside a peak.
    pub peak_rate: f64,
    pub peak_height: f32,
    /// Peak width in records.
    pub peak_width: u32,
    /// Chance that a position is left out of the track.
    pub gap_rate: f64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            chrom: "chr1".to_string(),
            records: 100_000,
            start: 0,
            step: 10,
            seed: 42,
            baseline: 0.5,
            peak_rate: 0.01,
            peak_height: 10.0,
            peak_width: 20,
            gap_rate: 0.0,
        }
    }
}

impl GenerateConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.chrom.is_empty() {
            return Err(ConfigError::EmptyChromosome);
        }
        if self.step == 0 {
            return Err(ConfigError::ZeroBinSize);
        }
        for (name, value) in [("peak rate", self.peak_rate), ("gap rate", self.gap_rate)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        if self.records > 0 {
            self.position(self.records - 1)?;
        }
        Ok(())
    }

    /// Position of the `index`-th record.
    fn position(&self, index: u64) -> std::result::Result<u64, ConfigError> {
        index
            .checked_mul(self.step)
            .and_then(|offset| offset.checked_add(self.start))
            .ok_or(ConfigError::PositionOverflow {
                start: self.start,
                step: self.step,
                records: self.records,
            })
    }
}

/// Statistics from a generate run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateStats {
    pub records_written: u64,
    pub records_dropped: u64,
    pub peaks: u64,
}

impl std::fmt::Display for GenerateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records written, {} dropped, {} peaks",
            self.records_written, self.records_dropped, self.peaks
        )
    }
}

/// Generate command.
pub struct GenerateCommand {
    config: GenerateConfig,
}

impl GenerateCommand {
    pub fn new(config: GenerateConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Write the track to `output`.
    pub fn run<W: Write>(&self, output: W) -> Result<GenerateStats> {
        let cfg = &self.config;
        let mut out = BufWriter::with_capacity(DEFAULT_OUTPUT_BUFFER, output);
        let mut rng = SmallRng::seed_from_u64(cfg.seed);
        let mut itoa_buf = itoa::Buffer::new();
        let mut ryu_buf = ryu::Buffer::new();
        let mut stats = GenerateStats::default();

        writeln!(out, "track type=wiggle_0 name=\"synthetic\"")?;
        writeln!(out, "variableStep chrom={} span={}", cfg.chrom, cfg.step)?;

        let width = cfg.peak_width.max(1);
        let half = width as f32 / 2.0;
        // (records left in the current peak, its height)
        let mut peak: Option<(u32, f32)> = None;

        for i in 0..cfg.records {
            let position = cfg.position(i)?;

            if peak.is_none() && cfg.peak_rate > 0.0 && rng.gen_bool(cfg.peak_rate) {
                let height = cfg.peak_height * rng.gen_range(0.5f32..1.5);
                peak = Some((width, height));
                stats.peaks += 1;
            }

            let mut signal = if cfg.baseline > 0.0 {
                rng.gen_range(0.0..cfg.baseline)
            } else {
                0.0
            };
            if let Some((left, height)) = peak {
                let offset = (width - left) as f32;
                signal += height * (1.0 - (offset - half).abs() / half).max(0.0);
                peak = (left > 1).then_some((left - 1, height));
            }

            if cfg.gap_rate > 0.0 && rng.gen_bool(cfg.gap_rate) {
                stats.records_dropped += 1;
                continue;
            }

            out.write_all(itoa_buf.format(position).as_bytes())?;
            out.write_all(b"\t")?;
            out.write_all(ryu_buf.format(signal).as_bytes())?;
            out.write_all(b"\n")?;
            stats.records_written += 1;
        }

        out.flush()?;
        info!("generate {}: {}", cfg.chrom, stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wig::parse_records;

    fn generate(config: GenerateConfig) -> (String, GenerateStats) {
        let mut output = Vec::new();
        let stats = GenerateCommand::new(config)
            .unwrap()
            .run(&mut output)
            .unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    #[test]
    fn test_regular_track_round_trips() {
        let (text, stats) = generate(GenerateConfig {
            records: 500,
            start: 1000,
            ..Default::default()
        });
        assert_eq!(stats.records_written, 500);
        assert_eq!(stats.records_dropped, 0);

        let records = parse_records(&text).unwrap();
        assert_eq!(records.len(), 500);
        assert_eq!(records[0].position, 1000);
        for pair in records.windows(2) {
            assert_eq!(pair[1].position - pair[0].position, 10);
        }
        assert!(records.iter().all(|r| r.signal >= 0.0));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let config = GenerateConfig {
            records: 200,
            gap_rate: 0.05,
            ..Default::default()
        };
        let (a, _) = generate(config.clone());
        let (b, _) = generate(config.clone());
        let (c, _) = generate(GenerateConfig { seed: 7, ..config });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_gaps_drop_records() {
        let (text, stats) = generate(GenerateConfig {
            records: 1000,
            gap_rate: 0.2,
            ..Default::default()
        });
        assert!(stats.records_dropped > 0);
        assert_eq!(stats.records_written + stats.records_dropped, 1000);
        assert_eq!(
            parse_records(&text).unwrap().len() as u64,
            stats.records_written
        );
    }

    #[test]
    fn test_peaks_raise_signal() {
        let (text, stats) = generate(GenerateConfig {
            records: 1000,
            baseline: 0.0,
            peak_rate: 0.05,
            ..Default::default()
        });
        assert!(stats.peaks > 0);
        let records = parse_records(&text).unwrap();
        assert!(records.iter().any(|r| r.signal > 1.0));
        assert!(records.iter().any(|r| r.signal == 0.0));
    }

    #[test]
    fn test_invalid_config() {
        let bad_rate = GenerateConfig {
            gap_rate: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            GenerateCommand::new(bad_rate),
            Err(ConfigError::InvalidRate { .. })
        ));
        let zero_step = GenerateConfig {
            step: 0,
            ..Default::default()
        };
        assert!(matches!(
            GenerateCommand::new(zero_step),
            Err(ConfigError::ZeroBinSize)
        ));
    }

    #[test]
    fn test_position_overflow_rejected() {
        let err = GenerateCommand::new(GenerateConfig {
            records: 3,
            start: u64::MAX - 10,
            step: 10,
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::PositionOverflow { records: 3, .. }));

        assert!(GenerateCommand::new(GenerateConfig {
            records: 2,
            start: 0,
            step: u64::MAX,
            ..Default::default()
        })
        .is_ok());

        assert!(matches!(
            GenerateCommand::new(GenerateConfig {
                records: 3,
                step: u64::MAX,
                ..Default::default()
            }),
            Err(ConfigError::PositionOverflow { .. })
        ));
    }

    #[test]
    fn test_last_position_at_limit() {
        let (text, stats) = generate(GenerateConfig {
            records: 2,
            start: u64::MAX - 10,
            step: 10,
            peak_rate: 0.0,
            ..Default::default()
        });
        assert_eq!(stats.records_written, 2);
        let records = parse_records(&text).unwrap();
        assert_eq!(records[1].position, u64::MAX);
    }
}
