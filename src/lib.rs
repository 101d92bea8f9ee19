//! wigwin: fixed-width signal windows from WIG tracks
//!
//! Turns a sorted `<position>\t<signal>` track for one chromosome into CSV
//! rows of equal-width bins, ready as classifier input.
//!
//! # Features
//!
//! - **Streaming scan**: one window of bins in memory at a time
//! - **Two phase-shifted passes**: overlapping training samples or
//!   contiguous annotation windows
//! - **Gap and cutoff filtering**: windows with missing coverage or only
//!   flat signal are dropped
//!
//! # Example
//!
//! ```rust,no_run
//! use wigwin::{commands::WindowsCommand, config::{Mode, ScanConfig}};
//!
//! let config = ScanConfig::new("chr1", 10, 1000, 2.0, Mode::Training).unwrap();
//! let output = std::fs::File::create("chr1.csv").unwrap();
//! let stats = WindowsCommand::new(config).run("chr1.wig", output).unwrap();
//! println!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod scan;
pub mod streaming;
pub mod wig;
pub mod window;

// Re-export commonly used types
pub use config::{Mode, ScanConfig};
pub use scan::{scan, PassParams, WindowScanner};
pub use wig::{parse_records, SignalRecord, WigError, WigReader};
pub use window::{Verdict, Window};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{PercentileCommand, WindowsCommand};
    pub use crate::config::{Mode, ScanConfig};
    pub use crate::scan::{scan, PassParams};
    pub use crate::wig::{parse_records, SignalRecord, WigReader};
    pub use crate::window::{Verdict, Window};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::config::{Mode, ScanConfig};
        use crate::scan::scan;
        use crate::wig::parse_records;

        let mut content = String::from("track\nvariableStep chrom=chr1\n");
        for i in 0..=8 {
            content.push_str(&format!("{}\t{}\n", i * 10, i % 2 * 5));
        }
        let records = parse_records(&content).unwrap();

        let config = ScanConfig::new("chr1", 10, 20, 2.0, Mode::Annotation).unwrap();
        let accepted: Vec<_> = scan(records, config.pass_params(0))
            .filter(|w| w.verdict(config.cutoff()).is_accepted())
            .collect();

        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].start, 0);
        assert_eq!(accepted[0].end, 40);
    }
}
