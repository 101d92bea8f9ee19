//! Windowed scan over a sorted signal stream.
//!
//! A scan pass walks `(position, signal)` records once, front to back, and
//! lazily yields one [`Window`] per interval it visits. Intervals are
//! `window_size` wide and placed `window_size + spacing` apart, starting at
//! the first record's position plus the pass offset.
//!
//! For each interval the scanner:
//! 1. skips records at or before the interval start,
//! 2. refuses to start filling if the first record is more than one bin
//!    past the start,
//! 3. fills bins in arrival order (bin index = records placed so far) while
//!    records stay within the interval end,
//! 4. stops early when two consecutive records are more than one bin apart.
//!
//! Rejected windows still occupy their interval; the next window always
//! starts one stride later.
//!
//! # Requirements
//!
//! Records MUST be non-decreasing by position. Out-of-order input is not
//! detected and produces meaningless windows.

use crate::config::{ConfigError, MAX_BINS};
use crate::wig::SignalRecord;
use crate::window::Window;
use std::iter::FusedIterator;

/// Window geometry for one pass.
///
/// Built with [`PassParams::new`] or [`ScanConfig::pass_params`]; either
/// way the bin count is known to be in `1..=MAX_BINS` before a scanner
/// allocates a window.
///
/// [`ScanConfig::pass_params`]: crate::config::ScanConfig::pass_params
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassParams {
    bin_size: u64,
    window_size: u64,
    /// Coordinates skipped between the end of one window and the next start.
    spacing: u64,
    /// Added to the first record's position to place the first window.
    offset: u64,
}

impl PassParams {
    /// Validate pass geometry.
    ///
    /// The window must be a positive multiple of the bin size, hold at most
    /// [`MAX_BINS`] bins, and `window_size + spacing` must fit in a `u64`.
    pub fn new(
        bin_size: u64,
        window_size: u64,
        spacing: u64,
        offset: u64,
    ) -> Result<Self, ConfigError> {
        if bin_size == 0 {
            return Err(ConfigError::ZeroBinSize);
        }
        if window_size == 0 || window_size % bin_size != 0 {
            return Err(ConfigError::MisalignedWindow {
                window_size,
                bin_size,
            });
        }
        let bins = window_size / bin_size;
        if bins > MAX_BINS as u64 {
            return Err(ConfigError::TooManyBins {
                bins,
                max: MAX_BINS,
            });
        }
        if window_size.checked_add(spacing).is_none() {
            return Err(ConfigError::StrideOverflow {
                window_size,
                spacing,
            });
        }
        Ok(Self::from_validated(bin_size, window_size, spacing, offset))
    }

    /// Geometry already checked by [`crate::config::ScanConfig::new`].
    pub(crate) fn from_validated(
        bin_size: u64,
        window_size: u64,
        spacing: u64,
        offset: u64,
    ) -> Self {
        Self {
            bin_size,
            window_size,
            spacing,
            offset,
        }
    }

    pub fn bin_size(&self) -> u64 {
        self.bin_size
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    pub fn spacing(&self) -> u64 {
        self.spacing
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bins per window.
    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.window_size / self.bin_size) as usize
    }

    /// Distance between consecutive window starts.
    #[inline]
    pub fn stride(&self) -> u64 {
        self.window_size + self.spacing
    }

    /// Whole bins between two positions (0 if `to` is not past `from`).
    #[inline(always)]
    fn bins_between(&self, from: u64, to: u64) -> u64 {
        to.saturating_sub(from) / self.bin_size
    }
}

/// Lazy scan pass over a record stream.
pub struct WindowScanner<I>
where
    I: Iterator<Item = SignalRecord>,
{
    records: I,
    params: PassParams,
    /// Record under the cursor, not yet placed. None once the stream ends.
    current: Option<SignalRecord>,
    next_start: u64,
    seeded: bool,
}

impl<I> WindowScanner<I>
where
    I: Iterator<Item = SignalRecord>,
{
    pub fn new<T>(records: T, params: PassParams) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            records: records.into_iter(),
            params,
            current: None,
            next_start: 0,
            seeded: false,
        }
    }

    pub fn params(&self) -> &PassParams {
        &self.params
    }

    #[inline]
    fn advance(&mut self) {
        self.current = self.records.next();
    }

    /// Read the first record and place the first interval after it.
    fn seed(&mut self) {
        self.seeded = true;
        self.advance();
        if let Some(first) = self.current {
            self.next_start = first.position.saturating_add(self.params.offset);
        }
    }

    fn fill(&mut self, start: u64) -> Window {
        let params = self.params;
        let end = start.saturating_add(params.window_size);
        let mut window = Window::empty(start, end, params.bin_count());

        while matches!(self.current, Some(rec) if rec.position <= start) {
            self.advance();
        }

        let mut filled = 0;
        while let Some(rec) = self.current {
            if rec.position > end || filled == window.bins.len() {
                break;
            }
            if filled == 0 && params.bins_between(start, rec.position) > 1 {
                window.gap_detected = true;
                break;
            }

            // Non-finite signals count as missing coverage.
            window.bins[filled] = rec.signal.is_finite().then_some(rec.signal);
            filled += 1;

            self.advance();
            if let Some(next) = self.current {
                if params.bins_between(rec.position, next.position) > 1 {
                    window.gap_detected = true;
                    break;
                }
            }
        }

        window
    }
}

impl<I> Iterator for WindowScanner<I>
where
    I: Iterator<Item = SignalRecord>,
{
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if !self.seeded {
            self.seed();
        }
        // The window in which the stream ran out is still yielded; the
        // stream being empty at the start of a window ends the pass.
        self.current?;

        let start = self.next_start;
        let window = self.fill(start);
        self.next_start = start.saturating_add(self.params.stride());
        Some(window)
    }
}

impl<I> FusedIterator for WindowScanner<I> where I: Iterator<Item = SignalRecord> {}

/// Start a scan pass over `records`.
pub fn scan<T>(records: T, params: PassParams) -> WindowScanner<T::IntoIter>
where
    T: IntoIterator<Item = SignalRecord>,
{
    WindowScanner::new(records, params)
}
