//! Streaming utilities shared by the commands.
//!
//! - Zero-allocation WIG line decoding
//! - Buffered CSV output
//! - Buffer sizing
//!
//! Nothing here holds more than one line or one window at a time.

pub mod buffers;
pub mod output;
pub mod parsing;

pub use output::{create_output, WindowWriter};
pub use parsing::{decode_line, parse_signal, parse_u64_fast, strip_nul};
