//! Encodings of integers and counting constraints into [`Formula`]s.
//!
//! [`Formula`]: crate::formula::Formula

mod bit_vector;
pub mod cardinality;
mod time_sequence;

pub use bit_vector::*;
pub use time_sequence::*;
