//! End-to-end scan scenarios on synthetic tracks.
//!
//! Each test builds a small track in memory, runs the library API and checks
//! which windows survive the gap and cutoff filters.

use std::io::Cursor;
use wigwin::commands::{WindowsCommand, WindowsStats};
use wigwin::config::{Mode, ScanConfig};
use wigwin::scan::scan;
use wigwin::wig::{parse_records, SignalRecord};
use wigwin::window::Verdict;

const HEADER: &str = "track type=wiggle_0\nvariableStep chrom=chr1 span=10\n";

// =============================================================================
// Helper functions
// =============================================================================

fn track(records: impl IntoIterator<Item = (u64, f32)>) -> String {
    let mut out = String::from(HEADER);
    for (pos, sig) in records {
        out.push_str(&format!("{}\t{}\n", pos, sig));
    }
    out
}

fn run_windows(content: &str, config: ScanConfig) -> (Vec<Row>, WindowsStats) {
    let mut output = Vec::new();
    let stats = WindowsCommand::new(config)
        .run_reader(Cursor::new(content.as_bytes().to_vec()), &mut output)
        .unwrap();
    let text = String::from_utf8(output).unwrap();
    (text.lines().map(Row::parse).collect(), stats)
}

#[derive(Debug)]
struct Row {
    chrom: String,
    start: u64,
    end: u64,
    values: Vec<f32>,
}

impl Row {
    fn parse(line: &str) -> Self {
        let mut fields = line.split(',');
        let chrom = fields.next().unwrap().to_string();
        let start = fields.next().unwrap().parse().unwrap();
        let end = fields.next().unwrap().parse().unwrap();
        let values = fields.map(|v| v.parse().unwrap()).collect();
        Self {
            chrom,
            start,
            end,
            values,
        }
    }
}

// =============================================================================
// Round trip: alternating 0/5 signal, training mode
// =============================================================================

#[test]
fn test_alternating_signal_training_round_trip() {
    let content = track((0..1000u64).map(|i| (i * 10, if i % 2 == 1 { 5.0 } else { 0.0 })));
    let config = ScanConfig::new("chr1", 10, 100, 2.0, Mode::Training).unwrap();
    assert_eq!(config.window_size(), 140);
    assert_eq!(config.step_size(), 120);

    let (rows, stats) = run_windows(&content, config);

    // Pass 0 fits 42 complete windows in 0..=9990, pass 1 fits 41.
    assert_eq!(rows.len(), 83);
    assert_eq!(stats.windows_emitted, 83);
    assert_eq!(stats.rejected_cutoff, 0);

    for row in &rows {
        assert_eq!(row.chrom, "chr1");
        assert_eq!(row.end - row.start, 140);
        assert_eq!(row.values.len(), 14);
        assert!(row.values.iter().any(|&v| v == 5.0));
        assert!(row.values.iter().all(|&v| v == 0.0 || v == 5.0));
    }

    // Pass 0 rows, then pass 1 rows phase-shifted by the step size.
    assert_eq!(rows[0].start, 0);
    assert_eq!(rows[42].start, rows[0].start + 120);
    for pair in rows[..42].windows(2) {
        assert_eq!(pair[1].start - pair[0].start, 240);
    }
    for pair in rows[42..].windows(2) {
        assert_eq!(pair[1].start - pair[0].start, 240);
    }
}

#[test]
fn test_flat_windows_rejected_by_cutoff() {
    // Signal only between positions 500 and 600.
    let content = track((0..100u64).map(|i| {
        let pos = i * 10;
        (pos, if (500..600).contains(&pos) { 5.0 } else { 0.0 })
    }));
    let config = ScanConfig::new("chr1", 10, 100, 2.0, Mode::Training).unwrap();
    let (rows, stats) = run_windows(&content, config);

    assert!(!rows.is_empty());
    assert!(stats.rejected_cutoff > 0);
    for row in &rows {
        assert!(row.start < 590 && row.end >= 500, "unexpected row {:?}", row);
        assert!(row.values.iter().any(|&v| v > 2.0));
    }
}

// =============================================================================
// Gap: a missing record rejects the window it falls in, and the window
// before it when the record would open a window
// =============================================================================

#[test]
fn test_missing_record_rejects_one_window() {
    let records: Vec<_> = (0..=40u64)
        .map(|i| i * 10)
        .filter(|&pos| pos != 200)
        .map(|pos| SignalRecord::new(pos, 3.0))
        .collect();
    let config = ScanConfig::new("chr1", 10, 20, 1.0, Mode::Annotation).unwrap();

    let verdicts: Vec<_> = scan(records, config.pass_params(0))
        .map(|w| (w.start, w.verdict(config.cutoff())))
        .collect();

    assert_eq!(verdicts.len(), 10);
    let gapped: Vec<_> = verdicts
        .iter()
        .filter(|(_, v)| *v == Verdict::Gapped)
        .collect();
    assert_eq!(gapped, vec![&(160, Verdict::Gapped)]);
    // Neighbours on both sides are untouched.
    assert_eq!(verdicts[3], (120, Verdict::Accepted));
    assert_eq!(verdicts[5], (200, Verdict::Accepted));
}

#[test]
fn test_missing_first_bin_rejects_both_neighbours() {
    // 210 would fill the first bin of (200, 240]. The hole 200 -> 220 is
    // seen right after (160, 200] fills its last bin, so that window is
    // rejected too.
    let records: Vec<_> = (0..=40u64)
        .map(|i| i * 10)
        .filter(|&pos| pos != 210)
        .map(|pos| SignalRecord::new(pos, 3.0))
        .collect();
    let config = ScanConfig::new("chr1", 10, 20, 1.0, Mode::Annotation).unwrap();

    let verdicts: Vec<_> = scan(records, config.pass_params(0))
        .map(|w| (w.start, w.verdict(config.cutoff())))
        .collect();

    assert_eq!(verdicts.len(), 10);
    let gapped: Vec<_> = verdicts
        .iter()
        .filter(|(_, v)| *v == Verdict::Gapped)
        .map(|(start, _)| *start)
        .collect();
    assert_eq!(gapped, vec![160, 200]);
    assert_eq!(verdicts[3], (120, Verdict::Accepted));
    assert_eq!(verdicts[6], (240, Verdict::Accepted));
}

#[test]
fn test_gapped_windows_never_emitted() {
    let content = track(
        (0..300u64)
            .filter(|i| i % 37 != 0)
            .map(|i| (i * 10, 4.0)),
    );
    let config = ScanConfig::new("chr1", 10, 40, 1.0, Mode::Annotation).unwrap();
    let (rows, stats) = run_windows(&content, config);

    assert!(stats.rejected_gap > 0);
    for row in &rows {
        assert_eq!(row.values.len(), 8);
        assert!(row.values.iter().all(|v| v.is_finite()));
    }
}

// =============================================================================
// Empty and malformed input
// =============================================================================

#[test]
fn test_header_only_track_is_not_an_error() {
    let config = ScanConfig::new("chr1", 10, 100, 2.0, Mode::Training).unwrap();
    let (rows, stats) = run_windows(HEADER, config);
    assert!(rows.is_empty());
    assert_eq!(stats.windows_scanned, 0);
}

#[test]
fn test_malformed_line_truncates_both_passes() {
    let mut content = track((0..=25u64).map(|i| (i * 10, 2.0)));
    content.push_str("260 2.0\n");
    content.push_str(&track((27..=40u64).map(|i| (i * 10, 2.0)))[HEADER.len()..]);

    let config = ScanConfig::new("chr1", 10, 20, 1.0, Mode::Annotation).unwrap();
    let (rows, stats) = run_windows(&content, config);

    // One bad line, reported once, though it cuts short both passes.
    assert_eq!(stats.malformed_lines, 1);
    assert_eq!(stats.truncated_passes, 2);
    // Pass 0 ends at 240, pass 1 at 220.
    assert_eq!(rows.len(), 11);
    assert!(rows.iter().all(|r| r.end <= 250));
}

#[test]
fn test_parse_records_stops_at_malformed_line() {
    let content = format!("{}10\t1.0\n20\n30\t3.0\n", HEADER);
    let records = parse_records(&content).unwrap();
    assert_eq!(records, vec![SignalRecord::new(10, 1.0)]);
}

// =============================================================================
// Interval arithmetic
// =============================================================================

#[test]
fn test_pass_intervals_strictly_increasing() {
    let records: Vec<_> = (0..500u64)
        .map(|i| SignalRecord::new(1_000 + i * 25, 1.0))
        .collect();
    for mode in [Mode::Training, Mode::Annotation] {
        let config = ScanConfig::new("chr2", 25, 500, 0.0, mode).unwrap();
        for params in config.passes() {
            let windows: Vec<_> = scan(records.clone(), params).collect();
            assert_eq!(windows[0].start, 1_000 + params.offset());
            for pair in windows.windows(2) {
                assert_eq!(pair[1].start - pair[0].start, params.stride());
                assert!(pair[0].end <= pair[1].start);
            }
            for w in &windows {
                assert_eq!(w.end - w.start, config.window_size());
                assert_eq!(w.bins.len(), config.bin_count());
            }
        }
    }
}
