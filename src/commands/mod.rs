//! Command implementations for wigwin.

pub mod generate;
pub mod percentile;
pub mod windows;

pub use generate::{GenerateCommand, GenerateConfig, GenerateStats};
pub use percentile::{PercentileCommand, PercentileResult};
pub use windows::{WindowsCommand, WindowsStats};
