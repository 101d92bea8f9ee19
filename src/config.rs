//! Scan configuration for one invocation.
//!
//! A [`ScanConfig`] is validated once at construction and is immutable
//! afterwards. Window geometry for each pass is derived from it as
//! [`PassParams`].

use crate::scan::PassParams;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on bins per window. Keeps a single window's buffer small
/// even for careless region/bin combinations.
pub const MAX_BINS: usize = 1 << 20;

/// Number of passes per run. Pass 1 is phase-shifted by the step size.
pub const PASS_COUNT: usize = 2;

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("bin size must be a positive integer")]
    ZeroBinSize,

    #[error("region size must be a positive integer")]
    ZeroRegionSize,

    #[error("region size {region_size} is not a multiple of bin size {bin_size}")]
    MisalignedRegion { region_size: u64, bin_size: u64 },

    #[error("window size {window_size} is not a positive multiple of bin size {bin_size}")]
    MisalignedWindow { window_size: u64, bin_size: u64 },

    #[error("window size {window_size} plus spacing {spacing} overflows")]
    StrideOverflow { window_size: u64, spacing: u64 },

    #[error("window would need {bins} bins (maximum {max})")]
    TooManyBins { bins: u64, max: usize },

    #[error("unsupported mode '{0}' (expected Y for training or N for annotation)")]
    UnsupportedMode(String),

    #[error("chromosome label must not be empty")]
    EmptyChromosome,

    #[error("cutoff must be a finite number, got {0}")]
    NonFiniteCutoff(f32),

    #[error("percentile must be between 0 and 1, got {0}")]
    InvalidPercentile(f64),

    #[error("either a cutoff or a cutoff percentile is required")]
    MissingCutoff,

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("{records} records from {start} every {step} overflow the coordinate range")]
    PositionOverflow { start: u64, step: u64, records: u64 },
}

/// Run mode: padded, spaced windows for training samples or contiguous
/// double-width windows for annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Training,
    Annotation,
}

impl Mode {
    /// Parse the mode flag. Accepts `Y`/`N` and the long names.
    pub fn from_flag(flag: &str) -> Result<Self, ConfigError> {
        match flag.trim() {
            "Y" | "y" | "training" => Ok(Self::Training),
            "N" | "n" | "annotation" => Ok(Self::Annotation),
            other => Err(ConfigError::UnsupportedMode(other.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_flag(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Training => write!(f, "training"),
            Self::Annotation => write!(f, "annotation"),
        }
    }
}

/// Validated scan configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    chrom: String,
    bin_size: u64,
    region_size: u64,
    cutoff: f32,
    mode: Mode,
}

impl ScanConfig {
    /// Validate and build a configuration.
    ///
    /// The region size must be a positive multiple of the bin size, and the
    /// resulting window may hold at most [`MAX_BINS`] bins.
    pub fn new(
        chrom: impl Into<String>,
        bin_size: u64,
        region_size: u64,
        cutoff: f32,
        mode: Mode,
    ) -> Result<Self, ConfigError> {
        let chrom = chrom.into();
        if chrom.is_empty() {
            return Err(ConfigError::EmptyChromosome);
        }
        if bin_size == 0 {
            return Err(ConfigError::ZeroBinSize);
        }
        if region_size == 0 {
            return Err(ConfigError::ZeroRegionSize);
        }
        if region_size % bin_size != 0 {
            return Err(ConfigError::MisalignedRegion {
                region_size,
                bin_size,
            });
        }
        if !cutoff.is_finite() {
            return Err(ConfigError::NonFiniteCutoff(cutoff));
        }

        let config = Self {
            chrom,
            bin_size,
            region_size,
            cutoff,
            mode,
        };

        // Annotation windows are the widest at 2x region; strides stay below 3x.
        if region_size > u64::MAX / 3 {
            return Err(ConfigError::TooManyBins {
                bins: u64::MAX,
                max: MAX_BINS,
            });
        }
        let bins = config.window_size() / bin_size;
        if bins > MAX_BINS as u64 {
            return Err(ConfigError::TooManyBins {
                bins,
                max: MAX_BINS,
            });
        }

        Ok(config)
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn bin_size(&self) -> u64 {
        self.bin_size
    }

    pub fn region_size(&self) -> u64 {
        self.region_size
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// One quarter of the region, rounded down to a whole number of bins.
    pub fn margin(&self) -> u64 {
        self.region_size / self.bin_size / 4 * self.bin_size
    }

    /// Width of every emitted window.
    pub fn window_size(&self) -> u64 {
        match self.mode {
            Mode::Training => self.region_size + 2 * self.margin(),
            Mode::Annotation => 2 * self.region_size,
        }
    }

    /// Phase shift applied to pass 1.
    pub fn step_size(&self) -> u64 {
        match self.mode {
            Mode::Training => self.region_size + self.margin(),
            Mode::Annotation => self.region_size,
        }
    }

    /// Coordinate space left between consecutive windows of one pass.
    pub fn spacing(&self) -> u64 {
        match self.mode {
            Mode::Training => self.region_size,
            Mode::Annotation => 0,
        }
    }

    /// Bins per window.
    pub fn bin_count(&self) -> usize {
        (self.window_size() / self.bin_size) as usize
    }

    /// Window geometry for the given pass (0 or 1).
    pub fn pass_params(&self, pass: usize) -> PassParams {
        PassParams::from_validated(
            self.bin_size,
            self.window_size(),
            self.spacing(),
            if pass == 0 { 0 } else { self.step_size() },
        )
    }

    /// Geometry for every pass, in execution order.
    pub fn passes(&self) -> [PassParams; PASS_COUNT] {
        [self.pass_params(0), self.pass_params(1)]
    }
}
