//! # Generator output protocol.
//!
//! The viewer core's only wire protocol: tagged lines interleaved with free
//! text on the generator's standard output.
//!
//! - [`parse`] — bytes in, [`RunResult`] out; pure and tolerant
//! - [`CONTROL_PREFIX`] — the literal tag marking control lines

mod parser;
mod result;

pub use parser::{parse, CONTROL_PREFIX};
pub use result::RunResult;
