//! Type definitions for acctdash

mod error;
mod records;

pub use error::*;
pub use records::*;
