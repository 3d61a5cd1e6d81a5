//! Output scoring: axis heuristics, credibility, status and weighting.

pub mod axes;
pub mod scorer;
