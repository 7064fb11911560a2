//! speedup-stats - statistical significance testing for benchmark speedups
//!
//! Given execution times of a reference and an optimized program, decide
//! whether the optimized one is significantly faster, estimate the speedup,
//! and report confidence intervals for both samples.
//!
//! - [`speedup`]: the mean and median analyses, their configuration and the
//!   outcome/report types
//! - [`hypothesis`]: the underlying tests (normality, dispersion, location,
//!   shape, contingency) and interval estimators

pub mod hypothesis;
pub mod speedup;
