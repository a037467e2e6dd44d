//! Imputation module for handling missing values.
//!
//! Provides statistical imputation (mean, median, mode) for single columns.
//! Which columns get filled, and with what, is decided by the resolver.

mod statistical;

pub use statistical::StatisticalImputer;
