//! Merging scored outputs into one answer.

pub mod assembler;
pub mod unit;
