//! Buffer size constants for streaming operations.
//!
//! WIG tracks are long and narrow (two short columns per line), so input
//! buffers are sized for throughput while line buffers stay small.

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB).
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity.
/// A data line is a position, a tab and a signal value.
pub const DEFAULT_LINE_BUFFER: usize = 128;
