//! Scanned windows and the gap/cutoff filter.

/// Outcome of filtering a finished window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every bin is filled and at least one value exceeds the cutoff.
    Accepted,
    /// Coverage is missing somewhere in the window.
    Gapped,
    /// Fully covered, but nothing rises above the cutoff.
    BelowCutoff,
}

impl Verdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// One window produced by a scan pass.
///
/// The interval is `start..end` in track coordinates. Bins are filled in
/// arrival order; `None` marks a bin that received no value. The chromosome
/// label is constant for a run and is supplied when the window is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub start: u64,
    pub end: u64,
    pub bins: Vec<Option<f32>>,
    /// Set when filling stopped on a gap between consecutive records or
    /// before the first bin.
    pub gap_detected: bool,
}

impl Window {
    /// A window with every bin unfilled.
    pub fn empty(start: u64, end: u64, bin_count: usize) -> Self {
        Self {
            start,
            end,
            bins: vec![None; bin_count],
            gap_detected: false,
        }
    }

    /// Number of bins holding a value.
    pub fn filled(&self) -> usize {
        self.bins.iter().filter(|b| b.is_some()).count()
    }

    /// True if filling hit a gap or any bin is still unfilled.
    #[inline]
    pub fn is_gapped(&self) -> bool {
        self.gap_detected || self.bins.iter().any(Option::is_none)
    }

    /// Filled bin values in order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.bins.iter().flatten().copied()
    }

    /// Decide whether the window is worth emitting.
    pub fn verdict(&self, cutoff: f32) -> Verdict {
        if self.is_gapped() {
            Verdict::Gapped
        } else if self.values().any(|v| v > cutoff) {
            Verdict::Accepted
        } else {
            Verdict::BelowCutoff
        }
    }
}
