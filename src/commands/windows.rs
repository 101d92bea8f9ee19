//! Window extraction: scan a track twice and write accepted windows as CSV.
//!
//! Pass 0 places windows from the first record onward; pass 1 repeats the
//! scan phase-shifted by the mode's step size. Both passes write to the same
//! output, pass 1 directly after pass 0.
//!
//! Memory use is one window of bins plus I/O buffers, regardless of track
//! length.

use crate::config::ScanConfig;
use crate::scan::{PassParams, WindowScanner};
use crate::streaming::output::WindowWriter;
use crate::wig::{open_input, Result, WigError, WigReader};
use crate::window::Verdict;
use log::{debug, info, warn};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// Window extraction command.
#[derive(Debug, Clone)]
pub struct WindowsCommand {
    config: ScanConfig,
}

impl WindowsCommand {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run both passes over a track file.
    pub fn run<P: AsRef<Path>, W: Write>(&self, input: P, output: W) -> Result<WindowsStats> {
        let file = open_input(input)?;
        self.run_reader(file, output)
    }

    /// Run both passes over a rewindable track.
    pub fn run_reader<R: Read + Seek, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<WindowsStats> {
        let mut reader = WigReader::new(input);
        let mut writer = WindowWriter::new(output);
        let mut stats = WindowsStats::default();
        let mut truncated_at: Option<usize> = None;

        for (pass, params) in self.config.passes().into_iter().enumerate() {
            reader.rewind()?;
            debug!(
                "pass {}: window {} step {} spacing {} offset {}",
                pass,
                params.window_size(),
                params.stride(),
                params.spacing(),
                params.offset()
            );

            let pass_stats = self.run_pass(params, &mut reader, &mut writer)?;
            info!("pass {} on {}: {}", pass, self.config.chrom(), pass_stats);
            stats.merge(&pass_stats);

            // Every pass rereads the same track, so a bad line usually
            // truncates both; report and count it once.
            if let Some(line) = reader.truncated_at() {
                if truncated_at != Some(line) {
                    warn!(
                        "{}: malformed line {} ended the scan early",
                        self.config.chrom(),
                        line
                    );
                    stats.malformed_lines += 1;
                    truncated_at = Some(line);
                }
                stats.truncated_passes += 1;
            }
        }

        writer.flush()?;
        Ok(stats)
    }

    fn run_pass<R: Read, W: Write>(
        &self,
        params: PassParams,
        reader: &mut WigReader<R>,
        writer: &mut WindowWriter<W>,
    ) -> Result<WindowsStats> {
        let chrom = self.config.chrom().as_bytes();
        let cutoff = self.config.cutoff();
        let mut stats = WindowsStats::default();
        let mut read_error: Option<WigError> = None;

        let records = reader.records().map_while(|r| match r {
            Ok(record) => Some(record),
            Err(e) => {
                read_error = Some(e);
                None
            }
        });

        for window in WindowScanner::new(records, params) {
            stats.windows_scanned += 1;
            match window.verdict(cutoff) {
                Verdict::Accepted => {
                    writer.write_window(chrom, window.start, window.end, window.values())?;
                    stats.windows_emitted += 1;
                }
                Verdict::Gapped => stats.rejected_gap += 1,
                Verdict::BelowCutoff => stats.rejected_cutoff += 1,
            }
        }

        if let Some(e) = read_error {
            return Err(e);
        }

        stats.records_read = reader.records_read();
        stats.nul_bytes_stripped = reader.nul_bytes_stripped() as u64;
        Ok(stats)
    }
}

/// Counters from a window extraction run, summed over both passes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WindowsStats {
    pub records_read: u64,
    pub windows_scanned: u64,
    pub windows_emitted: u64,
    pub rejected_gap: u64,
    pub rejected_cutoff: u64,
    /// Distinct malformed lines that ended a pass.
    pub malformed_lines: u64,
    /// Passes cut short by a malformed line.
    pub truncated_passes: u64,
    pub nul_bytes_stripped: u64,
}

impl WindowsStats {
    fn merge(&mut self, other: &WindowsStats) {
        self.records_read += other.records_read;
        self.windows_scanned += other.windows_scanned;
        self.windows_emitted += other.windows_emitted;
        self.rejected_gap += other.rejected_gap;
        self.rejected_cutoff += other.rejected_cutoff;
        self.malformed_lines += other.malformed_lines;
        self.truncated_passes += other.truncated_passes;
        self.nul_bytes_stripped += other.nul_bytes_stripped;
    }
}

impl std::fmt::Display for WindowsStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "records={} windows={} emitted={} gapped={} below_cutoff={} malformed={}",
            self.records_read,
            self.windows_scanned,
            self.windows_emitted,
            self.rejected_gap,
            self.rejected_cutoff,
            self.malformed_lines
        )
    }
}
