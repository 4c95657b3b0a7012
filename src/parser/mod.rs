//! Two-pass pipeline: document → sections of four zones → feature records.
//!
//! [`segment`] only finds zone boundaries; [`section`] and [`codes`] turn zone
//! text into values.

pub mod codes;
pub mod lines;
pub mod section;
pub mod segment;
