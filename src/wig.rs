//! Streaming WIG signal track reader.
//!
//! Each pass over a track discards the two header lines and then decodes
//! `<position>\t<signal>` lines in order. The first malformed line ends the
//! stream for that pass; the reader remembers where it stopped so callers
//! can report it.

use crate::config::ConfigError;
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{decode_line, strip_nul, trim_terminator};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of leading lines treated as header/metadata in every pass.
pub const HEADER_LINES: usize = 2;

/// Errors that can occur while reading tracks or running commands.
#[derive(Error, Debug)]
pub enum WigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, WigError>;

/// One decoded track line: a genomic position and its signal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRecord {
    pub position: u64,
    pub signal: f32,
}

impl SignalRecord {
    #[inline]
    pub fn new(position: u64, signal: f32) -> Self {
        Self { position, signal }
    }
}

/// A streaming WIG reader.
pub struct WigReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
    header_skipped: bool,
    /// Line number of the malformed line that truncated this pass.
    truncated_at: Option<usize>,
    records_read: u64,
    nul_bytes: usize,
}

/// Open an input file, naming the path on failure.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|source| WigError::Open {
        path: path.to_path_buf(),
        source,
    })
}

impl WigReader<File> {
    /// Open a WIG file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_input(path)?))
    }
}

impl<R: Read> WigReader<R> {
    /// Create a new reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_INPUT_BUFFER)
    }

    /// Create a reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: Vec::with_capacity(DEFAULT_LINE_BUFFER),
            header_skipped: false,
            truncated_at: None,
            records_read: 0,
            nul_bytes: 0,
        }
    }

    /// Line number of the malformed line that ended this pass, if any.
    pub fn truncated_at(&self) -> Option<usize> {
        self.truncated_at
    }

    /// Records decoded so far in this pass.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Embedded NUL bytes removed so far in this pass.
    pub fn nul_bytes_stripped(&self) -> usize {
        self.nul_bytes
    }

    fn read_raw_line(&mut self) -> Result<bool> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn skip_header(&mut self) -> Result<()> {
        for _ in 0..HEADER_LINES {
            if !self.read_raw_line()? {
                break;
            }
        }
        self.header_skipped = true;
        Ok(())
    }

    /// Read the next signal record.
    ///
    /// Returns `Ok(None)` at end of input and after a malformed line.
    /// Blank lines are skipped.
    pub fn read_record(&mut self) -> Result<Option<SignalRecord>> {
        if self.truncated_at.is_some() {
            return Ok(None);
        }
        if !self.header_skipped {
            self.skip_header()?;
        }

        loop {
            if !self.read_raw_line()? {
                return Ok(None);
            }
            self.nul_bytes += strip_nul(&mut self.buffer);

            if let Some((position, signal)) = decode_line(&self.buffer) {
                self.records_read += 1;
                return Ok(Some(SignalRecord::new(position, signal)));
            }

            if trim_terminator(&self.buffer).trim_ascii().is_empty() {
                continue;
            }

            debug!(
                "line {}: expected <position>\\t<signal>, stopping pass here",
                self.line_number
            );
            self.truncated_at = Some(self.line_number);
            return Ok(None);
        }
    }

    /// Iterate over the remaining records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }
}

impl<R: Read + Seek> WigReader<R> {
    /// Seek back to the start of the track and reset per-pass state.
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.header_skipped = false;
        self.truncated_at = None;
        self.records_read = 0;
        self.nul_bytes = 0;
        Ok(())
    }
}

/// Iterator over records of a [`WigReader`].
pub struct Records<'a, R: Read> {
    reader: &'a mut WigReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<SignalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Decode every record of an in-memory track (header lines included).
pub fn parse_records(content: &str) -> Result<Vec<SignalRecord>> {
    let mut reader = WigReader::new(content.as_bytes());
    reader.records().collect()
}
