//! CSV output for accepted windows.
//!
//! Uses itoa for coordinates and fixed six-decimal formatting for bin
//! values, matching the layout classifiers downstream expect:
//! `chrom,start,end,bin_0,...,bin_{n-1}`.

use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use crate::wig::WigError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Decimal places written for each bin value.
pub const BIN_DECIMALS: usize = 6;

/// Create (or truncate) an output file, naming the path on failure.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File, WigError> {
    let path = path.as_ref();
    File::create(path).map_err(|source| WigError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Buffered CSV writer for windows.
pub struct WindowWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
    lines_written: u64,
}

impl<W: Write> WindowWriter<W> {
    /// Create a new WindowWriter with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new WindowWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
            lines_written: 0,
        }
    }

    /// Number of window lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Write one window line.
    pub fn write_window<I>(
        &mut self,
        chrom: &[u8],
        start: u64,
        end: u64,
        values: I,
    ) -> Result<(), WigError>
    where
        I: IntoIterator<Item = f32>,
    {
        self.writer.write_all(chrom)?;
        self.writer.write_all(b",")?;
        self.write_int(start)?;
        self.writer.write_all(b",")?;
        self.write_int(end)?;
        for value in values {
            self.writer.write_all(b",")?;
            write!(self.writer, "{:.*}", BIN_DECIMALS, value)?;
        }
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write an integer using itoa.
    #[inline]
    pub fn write_int<I: itoa::Integer>(&mut self, n: I) -> Result<(), WigError> {
        self.writer.write_all(self.itoa_buf.format(n).as_bytes())?;
        Ok(())
    }

    /// Write a float in shortest round-trip form using ryu.
    #[inline]
    pub fn write_float(&mut self, f: f64) -> Result<(), WigError> {
        self.writer.write_all(self.ryu_buf.format(f).as_bytes())?;
        Ok(())
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WigError> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), WigError> {
        self.writer.flush()?;
        Ok(())
    }
}
