//! Request routing: classify, weight, select, fit to budget.

pub mod budget;
pub mod classifier;
pub mod selector;
pub mod weights;
